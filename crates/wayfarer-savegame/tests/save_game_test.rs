//! Integration tests for saving and restoring sessions.

mod common;

use std::fs;
use std::rc::Rc;

use chrono::Duration;
use wayfarer_character::domain::events::StatChanged;
use wayfarer_content::application::loader::FileWorkspaceLoader;
use wayfarer_content::domain::scene::SceneId;
use wayfarer_core::error::DomainError;
use wayfarer_savegame::application::manager::SaveGameManager;
use wayfarer_savegame::application::opened::Opened;
use wayfarer_savegame::domain::save_game::{SaveGame, SaveGameHandle};
use wayfarer_session::domain::game::GameState;
use wayfarer_test_support::fixtures::DARK_TOWER;
use wayfarer_test_support::{FixedClock, Recorder, fixed_time};

use common::{CountingEntryActions, FixtureResolver};

#[test]
fn test_save_then_open_round_trips_player_and_scene() {
    // Arrange: walk to the well (stamina 20 -> 18) and sharpen the blade.
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let mut game = common::new_game(Rc::clone(&workspace));
    game.select_path(2).unwrap();
    game.player_mut().set_damage(4);
    let manager = common::manager(dir.path());
    let handle = manager.save(&game).unwrap();

    // Act
    let restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    // Assert
    let player = restored.game.player();
    assert_eq!(player.name(), "Wanderer");
    assert_eq!(player.stamina(), 18);
    assert_eq!(player.damage(), 4);
    assert_eq!(player.skill_level(), 10);
    assert_eq!(player.skill("Luck").map(|s| s.level()), Some(9));
    assert_eq!(restored.game.current_scene_id(), SceneId(6));
    assert_eq!(restored.save_game.scene_id, SceneId(6));
}

#[test]
fn test_restored_skills_point_at_the_restored_player() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let game = common::new_game(Rc::clone(&workspace));
    let manager = common::manager(dir.path());
    let handle = manager.save(&game).unwrap();

    let restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    let player = restored.game.player();
    assert_ne!(player.id(), game.player().id());
    for skill in player.skills() {
        assert_eq!(skill.owner(), Some(player.id()), "skill {}", skill.name());
    }
}

#[test]
fn test_open_reattaches_only_the_supplied_listener() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let mut game = common::new_game(Rc::clone(&workspace));
    let old_a = Recorder::<StatChanged>::new();
    let old_b = Recorder::<StatChanged>::new();
    game.player_mut().subscribe_stat_changes(old_a.handler());
    game.player_mut().subscribe_stat_changes(old_b.handler());
    let manager = common::manager(dir.path());
    let handle = manager.save(&game).unwrap();
    let live = Recorder::<StatChanged>::new();

    // Act
    let mut restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options(),
            live.handler(),
        )
        .unwrap();
    restored.game.player_mut().set_stamina(7);

    // Assert
    assert_eq!(restored.game.player().stat_listener_count(), 1);
    assert_eq!(live.len(), 1);
    assert!(old_a.is_empty());
    assert!(old_b.is_empty());
    assert_eq!(game.player().stat_listener_count(), 2);
}

#[test]
fn test_open_does_not_replay_entry_actions() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let mut game = common::new_game(Rc::clone(&workspace));
    game.select_path(2).unwrap();
    let manager = common::manager(dir.path());
    let handle = manager.save(&game).unwrap();
    let counter = CountingEntryActions::default();

    let restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options().with_entry_actions(counter.clone()),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    assert!(counter.entered.borrow().is_empty());
    assert_eq!(restored.game.player().stamina(), 18);
}

#[test]
fn test_save_notifies_after_writing_and_leaves_session_alone() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut game = common::new_game(common::dark_tower());
    game.select_path(0).unwrap();
    let mut manager = common::manager(&dir.path().join("saves"));
    let created = Recorder::<SaveGameHandle>::new();
    manager.subscribe_save_created(created.handler());

    // Act
    let handle = manager.save(&game).unwrap();

    // Assert
    assert_eq!(created.events(), vec![handle.clone()]);
    assert!(handle.path.is_file());
    assert_eq!(
        handle.path.file_name().and_then(|n| n.to_str()),
        Some("TheDarkTower#2026-01-15_10-00-00-000.saveGame.json")
    );
    assert_eq!(handle.created_at, fixed_time());
    assert_eq!(game.current_scene_id(), SceneId(2));
    assert_eq!(game.state(), GameState::CombatGate);
    assert_eq!(game.player().stamina(), 20);
}

#[test]
fn test_failed_save_notifies_nobody() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("saves");
    fs::write(&blocked, "a file where the directory should be").unwrap();
    let game = common::new_game(common::dark_tower());
    let mut manager = common::manager(&blocked);
    let created = Recorder::<SaveGameHandle>::new();
    manager.subscribe_save_created(created.handler());

    let result = manager.save(&game);

    match result.unwrap_err() {
        DomainError::Persistence { source, .. } => assert!(source.is_some()),
        other => panic!("expected Persistence, got {other:?}"),
    }
    assert!(created.is_empty());
}

#[test]
fn test_malformed_document_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Broken#2026-01-15_10-00-00.saveGame.json");
    fs::write(&path, "{ \"workspace_id\": \"dark-tower.yaml\" }").unwrap();
    let mut manager = common::manager(dir.path());
    let opened = Recorder::<SaveGame>::new();
    manager.subscribe_save_opened(opened.handler());

    let result = manager.open(
        &path,
        &FixtureResolver(common::dark_tower()),
        common::options(),
        Recorder::<StatChanged>::new().handler(),
    );

    match result.unwrap_err() {
        DomainError::Persistence { message, source } => {
            assert!(message.contains("parsing"));
            assert!(source.is_some());
        }
        other => panic!("expected Persistence, got {other:?}"),
    }
    assert!(opened.is_empty());
}

#[test]
fn test_missing_file_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let manager = common::manager(dir.path());

    let result = manager.open(
        &dir.path().join("gone.saveGame.json"),
        &FixtureResolver(common::dark_tower()),
        common::options(),
        Recorder::<StatChanged>::new().handler(),
    );

    assert!(matches!(result, Err(DomainError::Persistence { .. })));
}

#[test]
fn test_snapshot_without_combat_skill_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.saveGame.json");
    let document = serde_json::json!({
        "workspace_id": common::WORKSPACE_ID,
        "content_hash": "",
        "player": { "name": "Ghost", "stamina": 3, "damage": 2, "skills": [] },
        "scene_id": 1,
        "created_at": "2026-01-15T10:00:00Z"
    });
    fs::write(&path, document.to_string()).unwrap();
    let manager = common::manager(dir.path());

    let result = manager.open(
        &path,
        &FixtureResolver(common::dark_tower()),
        common::options(),
        Recorder::<StatChanged>::new().handler(),
    );

    match result.unwrap_err() {
        DomainError::Persistence { message, .. } => assert!(message.contains("restoring player")),
        other => panic!("expected Persistence, got {other:?}"),
    }
}

#[test]
fn test_saved_scene_missing_from_content_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let manager = common::manager(dir.path());
    let handle = manager.save(&common::new_game(Rc::clone(&workspace))).unwrap();
    let text = fs::read_to_string(&handle.path).unwrap();
    let mut document: serde_json::Value = serde_json::from_str(&text).unwrap();
    document["scene_id"] = serde_json::json!(404);
    fs::write(&handle.path, document.to_string()).unwrap();

    let result = manager.open(
        &handle.path,
        &FixtureResolver(workspace),
        common::options(),
        Recorder::<StatChanged>::new().handler(),
    );

    assert!(matches!(result, Err(DomainError::Persistence { message, .. }) if message.contains("404")));
}

#[test]
fn test_save_opened_event_carries_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let mut manager = common::manager(dir.path());
    let opened = Recorder::<SaveGame>::new();
    manager.subscribe_save_opened(opened.handler());
    let handle = manager.save(&common::new_game(Rc::clone(&workspace))).unwrap();

    let restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    assert_eq!(opened.events(), vec![restored.save_game.clone()]);
    assert_eq!(restored.save_game.workspace_id, common::WORKSPACE_ID);
}

#[test]
fn test_restore_on_combat_gate_can_keep_fighting() {
    // Arrange: save while facing the goblin.
    let dir = tempfile::tempdir().unwrap();
    let workspace = common::dark_tower();
    let mut game = common::new_game(Rc::clone(&workspace));
    game.select_path(0).unwrap();
    let manager = common::manager(dir.path());
    let handle = manager.save(&game).unwrap();

    // Act
    let mut restored = manager
        .open(
            &handle.path,
            &FixtureResolver(workspace),
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    // Assert: MockRng rolls 1s for both sides, so the player's skill wins.
    assert_eq!(restored.game.state(), GameState::CombatGate);
    assert_eq!(restored.game.opponent().map(|o| o.stamina()), Some(4));
    restored.game.fight_round().unwrap();
    assert_eq!(restored.game.opponent().map(|o| o.stamina()), Some(2));
}

#[test]
fn test_list_saves_returns_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let game = common::new_game(common::dark_tower());
    let earlier = SaveGameManager::new(dir.path(), Box::new(FixedClock(fixed_time())));
    let later = SaveGameManager::new(
        dir.path(),
        Box::new(FixedClock(fixed_time() + Duration::hours(2))),
    );
    let first = earlier.save(&game).unwrap();
    let second = later.save(&game).unwrap();

    let saves = earlier.list_saves().unwrap();

    assert_eq!(saves, vec![second, first]);
}

#[test]
fn test_saves_in_the_same_instant_never_overwrite() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut game = common::new_game(common::dark_tower());
    let manager = common::manager(dir.path());
    let first = manager.save(&game).unwrap();
    game.player_mut().set_stamina(5);

    // Act
    let second = manager.save(&game).unwrap();

    // Assert
    assert_ne!(first.path, second.path);
    assert_eq!(second.created_at, fixed_time() + Duration::milliseconds(1));
    assert_eq!(manager.list_saves().unwrap(), vec![second.clone(), first.clone()]);
    let earlier: SaveGame =
        serde_json::from_str(&fs::read_to_string(&first.path).unwrap()).unwrap();
    let later: SaveGame =
        serde_json::from_str(&fs::read_to_string(&second.path).unwrap()).unwrap();
    assert_eq!(earlier.player.stamina, 20);
    assert_eq!(later.player.stamina, 5);
    assert_eq!(later.created_at, second.created_at);
}

#[test]
fn test_open_entity_dispatches_on_file_name() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let adventure_path = dir.path().join("tower.yaml");
    fs::write(&adventure_path, DARK_TOWER).unwrap();
    let manager = common::manager(&dir.path().join("saves"));

    // Act
    let adventure = manager
        .open_entity(
            &adventure_path,
            &FileWorkspaceLoader,
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();
    let Opened::Adventure(workspace) = adventure else {
        panic!("expected an adventure");
    };
    let handle = manager.save(&common::new_game(workspace)).unwrap();
    let save = manager
        .open_entity(
            &handle.path,
            &FileWorkspaceLoader,
            common::options(),
            Recorder::<StatChanged>::new().handler(),
        )
        .unwrap();

    // Assert
    match save {
        Opened::SaveGame(restored) => {
            assert_eq!(restored.game.current_scene_id(), SceneId(1));
            assert_eq!(restored.save_game.workspace_id, adventure_path.display().to_string());
        }
        Opened::Adventure(_) => panic!("expected a save game"),
    }
}
