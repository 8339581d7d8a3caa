use std::sync::Arc;

use class_content::ScriptLoader;
use class_core::{CharacterId, ClassId, EffectKey, ProgressionConfig, RemovalReason};
use class_runtime::{
    FileProgressRepo, LoadStatus, ProgressRepository, RuntimeConfig, Session, replay,
};

const ASSASSIN_SCRIPT: &str =
    include_str!("../../game/content/data/scripts/assassin_poison.ron");

const HERO: CharacterId = CharacterId(1);
const WOLF: CharacterId = CharacterId(2);

fn file_session(dir: &std::path::Path) -> Session {
    let repo = FileProgressRepo::new(dir).expect("repository should open");
    Session::with_repository(ProgressionConfig::default(), Arc::new(repo))
}

/// Poison slows the wolf, expires, and the original speed is handed back to
/// the host exactly once. Progress then survives a save/reload cycle.
#[test]
fn assassin_script_restores_speed_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let script = ScriptLoader::parse(ASSASSIN_SCRIPT).unwrap();

    let mut session = file_session(dir.path());
    let report = replay(&mut session, &script);

    assert_eq!(report.steps.len(), script.events.len());
    let restores: Vec<_> = report
        .steps
        .iter()
        .flat_map(|step| step.handled.restores.iter())
        .collect();
    assert_eq!(restores.len(), 1);
    assert_eq!(restores[0].character, WOLF);
    assert_eq!(restores[0].key, EffectKey::POISON);
    assert_eq!(restores[0].baseline, 6.0);
    assert_eq!(restores[0].reason, RemovalReason::Expired);

    assert_eq!(session.engine().level(HERO, ClassId::Assassin), 30);
    assert!(session.save_character(HERO).unwrap());

    let mut reopened = file_session(dir.path());
    assert_eq!(
        reopened.load_character(HERO).unwrap(),
        LoadStatus::Restored { dropped: vec![] }
    );
    assert_eq!(reopened.engine().level(HERO, ClassId::Assassin), 30);
    assert_eq!(reopened.engine().active_classes(HERO), &[ClassId::Assassin]);
    assert!(
        (reopened.engine().xp(HERO, ClassId::Assassin)
            - session.engine().xp(HERO, ClassId::Assassin))
        .abs()
            < 1e-9
    );
}

#[test]
fn corrupt_file_resets_and_next_save_repairs_it() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileProgressRepo::new(dir.path()).unwrap();
    repo.save(HERO, b"CLSP but not really").unwrap();

    let mut session = file_session(dir.path());
    assert!(matches!(
        session.load_character(HERO).unwrap(),
        LoadStatus::Corrupted(_)
    ));
    assert_eq!(session.engine().level(HERO, ClassId::Archer), 0);

    session.add_xp(HERO, ClassId::Archer, 5_106.0);
    session.set_active_class(HERO, ClassId::Archer);
    session.save_character(HERO).unwrap();

    let mut reopened = file_session(dir.path());
    assert!(matches!(
        reopened.load_character(HERO).unwrap(),
        LoadStatus::Restored { .. }
    ));
    assert_eq!(reopened.engine().level(HERO, ClassId::Archer), 10);
}

#[test]
fn open_respects_persistence_flag() {
    let dir = tempfile::tempdir().unwrap();

    let disabled = RuntimeConfig {
        save_data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(Session::open(&disabled).unwrap().repository().is_none());

    let enabled = RuntimeConfig {
        enable_persistence: true,
        save_data_dir: Some(dir.path().join("characters")),
        ..Default::default()
    };
    let mut session = Session::open(&enabled).unwrap();
    session.add_xp(HERO, ClassId::Bulwark, 61.0);
    assert_eq!(session.save_all().unwrap(), 1);
    assert!(dir.path().join("characters").join("character_1.bin").exists());
}
