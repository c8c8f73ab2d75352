//! Adventure documents shared by tests.
//!
//! The scene graph of `DARK_TOWER`:
//!
//! ```text
//! 1 crossroads --north--> 2 goblin (combat) --> 3 ledge (Luck test) --ok--> 4 tower (end)
//!   \--south (dead end)                                              \--fail--> 5 chasm (end)
//!   \--east (hidden by entry action) --> 6 well (stamina -2) --> 1
//! ```

/// A small adventure exercising every scene shape.
pub const DARK_TOWER: &str = r"
name: The Dark Tower
start: 1
player:
  name: Wanderer
  skill: 10
  stamina: 20
  damage: 2
  skills:
    Luck: 9
scenes:
  - id: 1
    text: You stand at a crossroads under a grey sky.
    image: crossroads.png
    paths:
      - text: Walk north toward the tower
        to: 2
      - text: Walk south into the marsh
      - text: Climb down the old well
        to: 6
  - id: 2
    text: A goblin leaps from behind a rock!
    combat:
      opponent:
        name: Goblin
        skill: 5
        stamina: 4
        damage: 2
    paths:
      - text: Step over the goblin
        to: 3
  - id: 3
    text: The path narrows to a crumbling ledge.
    skill_test:
      skill: Luck
      level: 7
    paths:
      - text: You keep your footing
        to: 4
      - text: The ledge gives way
        to: 5
  - id: 4
    text: The tower door swings open. Your quest is complete.
    end: true
  - id: 5
    text: You fall into darkness.
    end: true
  - id: 6
    text: The well water is foul and you retch.
    actions:
      - kind: adjust_stamina
        delta: -2
      - kind: hide_path
        path: 1
    paths:
      - text: Climb back up
        to: 1
      - text: Drink again
        to: 6
";

/// An adventure with a path pointing at a scene that does not exist.
pub const BROKEN_REFERENCE: &str = r"
name: Broken
start: 1
player:
  name: Nobody
  skill: 5
  stamina: 5
scenes:
  - id: 1
    text: Start
    paths:
      - text: Into the void
        to: 99
";
