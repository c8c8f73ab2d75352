//! Player commands typed at the prompt.

use std::path::PathBuf;
use std::str::FromStr;

/// Where to load a save from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadTarget {
    /// 1-based position in the save listing.
    Listed(usize),
    /// A file path.
    File(PathBuf),
}

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Follow the path with this 1-based number.
    Path(usize),
    /// Fight one combat round.
    Fight,
    /// Roll the current skill test.
    TestSkill,
    /// Save the session.
    Save,
    /// Replace the session with a saved one.
    Load(LoadTarget),
    /// Show saves, newest first.
    ListSaves,
    /// Start the adventure over.
    Restart,
    /// Show the command list.
    Help,
    /// Leave.
    Quit,
}

/// Shown for `h`.
pub const HELP: &str = "\
Commands:
  <number>     follow a path
  f            fight one round
  t            test your skill
  s            save
  ls           list saves
  l <n|file>   load a listed save or a save file
  r            restart
  h            help
  q            quit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word {
            "f" | "fight" => Ok(Self::Fight),
            "t" | "test" => Ok(Self::TestSkill),
            "s" | "save" => Ok(Self::Save),
            "ls" | "saves" => Ok(Self::ListSaves),
            "r" | "restart" => Ok(Self::Restart),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "l" | "load" => match (rest, rest.parse::<usize>()) {
                ("", _) => Err("load needs a save number or a file".to_owned()),
                (_, Ok(0)) => Err("saves are numbered from 1".to_owned()),
                (_, Ok(number)) => Ok(Self::Load(LoadTarget::Listed(number))),
                (_, Err(_)) => Ok(Self::Load(LoadTarget::File(PathBuf::from(rest)))),
            },
            "" => Err("type h for help".to_owned()),
            _ => match word.parse::<usize>() {
                Ok(number) if number >= 1 => Ok(Self::Path(number)),
                _ => Err(format!("unknown command {word:?}; type h for help")),
            },
        }
    }
}
