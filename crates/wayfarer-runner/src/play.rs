//! The read-eval loop.
//!
//! Engine events are collected into a message buffer by handlers and
//! printed after each command, so handlers never need the output stream.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use tracing::warn;
use wayfarer_character::domain::events::{AttackResult, RoundEnded, StatChanged};
use wayfarer_content::application::loader::FileWorkspaceLoader;
use wayfarer_content::domain::scene::Gate;
use wayfarer_core::clock::SystemClock;
use wayfarer_core::event::Handler;
use wayfarer_savegame::application::manager::SaveGameManager;
use wayfarer_savegame::application::opened::Opened;
use wayfarer_savegame::domain::save_game::{SaveGame, SaveGameHandle};
use wayfarer_session::domain::events::{CombatEnded, SkillTestResolved};
use wayfarer_session::domain::game::{Game, GameState};

use crate::command::{Command, HELP, LoadTarget};
use crate::config::Config;
use crate::error::AppError;

type Messages = Rc<RefCell<Vec<String>>>;

/// The handlers the runner keeps attached. Each is created once, so
/// re-subscribing after a restart or an opponent spawn is a no-op when
/// already attached.
struct Handlers {
    stat: Handler<StatChanged>,
    player_attack: Handler<AttackResult>,
    opponent_attack: Handler<AttackResult>,
    round_ended: Handler<RoundEnded>,
    combat_ended: Handler<CombatEnded>,
    skill_test: Handler<SkillTestResolved>,
}

impl Handlers {
    fn new(messages: &Messages) -> Self {
        Self {
            stat: collect(messages, |e: &StatChanged| e.message.clone()),
            player_attack: collect(messages, |r: &AttackResult| describe_roll("You", r)),
            opponent_attack: collect(messages, |r: &AttackResult| describe_roll("Your foe", r)),
            round_ended: collect(messages, |_: &RoundEnded| "-- round over --".to_owned()),
            combat_ended: collect(messages, |e: &CombatEnded| {
                if e.player_survived {
                    "You are victorious!".to_owned()
                } else {
                    "You have been slain.".to_owned()
                }
            }),
            skill_test: collect(messages, |e: &SkillTestResolved| {
                let verdict = if e.skillful { "success" } else { "failure" };
                format!("Test of {}: {verdict}.", e.skill)
            }),
        }
    }
}

fn collect<E: 'static>(messages: &Messages, render: impl Fn(&E) -> String + 'static) -> Handler<E> {
    let messages = Rc::clone(messages);
    Rc::new(move |event: &E| messages.borrow_mut().push(render(event)))
}

fn describe_roll(who: &str, result: &AttackResult) -> String {
    let kill = if result.instant_kill { " INSTANT KILL!" } else { "" };
    format!(
        "{who} rolled {}+{} (force {}): {:?}.{kill}",
        result.die1, result.die2, result.force, result.outcome
    )
}

/// Plays one adventure over a line-oriented input and output.
pub struct Runner<R, W> {
    config: Config,
    game: Game,
    manager: SaveGameManager,
    messages: Messages,
    handlers: Handlers,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Runner<R, W> {
    /// Opens the configured adventure (or save file) and prepares a session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the content or save cannot be opened.
    pub fn new(config: Config, input: R, output: W) -> Result<Self, AppError> {
        let messages: Messages = Rc::default();
        let handlers = Handlers::new(&messages);

        let mut manager = SaveGameManager::new(config.save_dir.clone(), Box::new(SystemClock));
        manager.subscribe_save_created(collect(&messages, |h: &SaveGameHandle| {
            format!("Saved to {}.", h.path.display())
        }));
        manager.subscribe_save_opened(collect(&messages, |s: &SaveGame| {
            format!("Restored save from {}.", s.created_at.format("%Y-%m-%d %H:%M:%S"))
        }));

        let game = match manager.open_entity(
            &config.adventure,
            &FileWorkspaceLoader,
            config.session_options(),
            Rc::clone(&handlers.stat),
        )? {
            Opened::Adventure(workspace) => Game::new(workspace, config.session_options()),
            Opened::SaveGame(restored) => restored.game,
        };

        let mut runner = Self {
            config,
            game,
            manager,
            messages,
            handlers,
            input,
            output,
        };
        runner.attach_handlers();
        Ok(runner)
    }

    /// Runs until `q` or end of input.
    ///
    /// Engine refusals are shown to the player and the loop goes on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the terminal fails.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.render()?;
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => command,
                Err(hint) => {
                    writeln!(self.output, "{hint}")?;
                    continue;
                }
            };

            match self.execute(command) {
                Ok(()) => {}
                Err(AppError::Domain(e)) => {
                    warn!(session_id = %self.game.id(), error = %e, "command refused");
                    self.flush_messages()?;
                    writeln!(self.output, "{e}")?;
                    continue;
                }
                Err(other) => return Err(other),
            }
            self.attach_handlers();
            self.flush_messages()?;
            self.render()?;
        }
        writeln!(self.output, "Farewell.")?;
        Ok(())
    }

    /// The session being played.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Consumes the runner, returning the output stream.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    fn execute(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Path(number) => {
                if self.game.select_path(number - 1)?.is_none() {
                    self.say("That way leads nowhere.");
                }
            }
            Command::Fight => {
                self.game.fight_round()?;
            }
            Command::TestSkill => {
                let roll = self.game.test_skill()?;
                self.say(format!(
                    "You rolled {}+{} against {}.",
                    roll.die1, roll.die2, roll.level
                ));
            }
            Command::Save => {
                self.manager.save(&self.game)?;
            }
            Command::Load(target) => self.load(target)?,
            Command::ListSaves => {
                let saves = self.manager.list_saves()?;
                if saves.is_empty() {
                    self.say("No saves yet.");
                }
                for (number, save) in saves.iter().enumerate() {
                    self.say(format!("  {}) {}", number + 1, save.path.display()));
                }
            }
            Command::Restart => self.game.restart(),
            Command::Help => self.say(HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    fn load(&mut self, target: LoadTarget) -> Result<(), AppError> {
        let path: PathBuf = match target {
            LoadTarget::File(path) => path,
            LoadTarget::Listed(number) => {
                let saves = self.manager.list_saves()?;
                match number.checked_sub(1).and_then(|i| saves.into_iter().nth(i)) {
                    Some(save) => save.path,
                    None => {
                        self.say(format!("There is no save {number}."));
                        return Ok(());
                    }
                }
            }
        };

        // The current session is replaced only once the restore succeeded.
        let restored = self.manager.open(
            &path,
            &FileWorkspaceLoader,
            self.config.session_options(),
            Rc::clone(&self.handlers.stat),
        )?;
        self.game = restored.game;
        Ok(())
    }

    fn attach_handlers(&mut self) {
        let handlers = &self.handlers;
        self.game.subscribe_combat_ended(Rc::clone(&handlers.combat_ended));
        self.game
            .subscribe_skill_test_resolved(Rc::clone(&handlers.skill_test));

        let player = self.game.player_mut();
        player.subscribe_stat_changes(Rc::clone(&handlers.stat));
        player.subscribe_attack_results(Rc::clone(&handlers.player_attack));
        player.subscribe_round_ended(Rc::clone(&handlers.round_ended));

        if let Some(opponent) = self.game.opponent_mut() {
            opponent.subscribe_attack_results(Rc::clone(&handlers.opponent_attack));
        }
    }

    fn say(&self, message: impl Into<String>) {
        self.messages.borrow_mut().push(message.into());
    }

    fn flush_messages(&mut self) -> Result<(), AppError> {
        let messages: Vec<String> = self.messages.borrow_mut().drain(..).collect();
        for message in messages {
            writeln!(self.output, "{message}")?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), AppError> {
        let scene = self.game.current_scene();
        writeln!(self.output)?;
        writeln!(self.output, "== {} | scene {} ==", self.game.adventure().name(), scene.id())?;
        writeln!(self.output, "{}", scene.text())?;
        if let Some(image) = scene.image() {
            writeln!(self.output, "[image: {image}]")?;
        }

        let player = self.game.player();
        writeln!(
            self.output,
            "{}: stamina {}, skill {}, damage {}",
            player.name(),
            player.stamina(),
            player.skill_level(),
            player.damage()
        )?;

        match self.game.state() {
            GameState::Normal => {
                for path in self.game.render_paths() {
                    let suffix = if path.is_dead_end() { " (dead end)" } else { "" };
                    writeln!(self.output, "  {}) {}{suffix}", path.index + 1, path.text)?;
                }
            }
            GameState::CombatGate => {
                if let Some(opponent) = self.game.opponent() {
                    writeln!(
                        self.output,
                        "You face {} (skill {}, stamina {}). Type f to fight.",
                        opponent.name(),
                        opponent.skill_level(),
                        opponent.stamina()
                    )?;
                }
            }
            GameState::SkillTestGate => {
                if let Some(Gate::SkillTest(gate)) = scene.gate() {
                    writeln!(self.output, "Test your {}. Type t to roll.", gate.skill.name())?;
                }
            }
            GameState::Terminal => {
                writeln!(self.output, "The End. Type r to restart or q to quit.")?;
            }
        }
        Ok(())
    }
}
