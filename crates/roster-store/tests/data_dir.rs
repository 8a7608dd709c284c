use std::sync::Arc;

use roster_core::{
    AuditLog, ImportError, ImportOptions, ImportService, RecordStore, RecordingNotifier,
};
use roster_map::LearnedMappingStore;
use roster_model::{ImportStatus, TargetField, parse_confirmed};
use roster_store::{DataDir, JsonRecordStore};
use tempfile::tempdir;

const FILE: &str = "Имя,Трек,Скорость,X,Y,Герой\nИван,Song,10,1,1,да\n";

fn service(dir: &DataDir) -> (ImportService<JsonRecordStore>, Arc<LearnedMappingStore>) {
    let learned = Arc::new(LearnedMappingStore::load(Arc::new(dir.mappings())).unwrap());
    let service = ImportService::new(
        Arc::new(dir.records()),
        learned.clone(),
        Arc::new(dir.audit()),
        Arc::new(RecordingNotifier::new()),
        ImportOptions::default(),
    );
    (service, learned)
}

fn confirmed() -> roster_model::ConfirmedMappings {
    parse_confirmed([
        ("Имя", "name"),
        ("Трек", "soundtrackName"),
        ("Скорость", "impactSpeed"),
        ("X", "coordinates.x"),
        ("Y", "coordinates.y"),
        ("Герой", "realHero"),
    ])
    .unwrap()
}

#[test]
fn import_state_survives_restart() {
    let tmp = tempdir().unwrap();
    let dir = DataDir::new(tmp.path());

    let (first, _) = service(&dir);
    let outcome = first.import_reader(FILE.as_bytes(), &confirmed()).unwrap();
    assert_eq!(outcome.added.len(), 1);

    let (second, learned) = service(&dir);
    assert_eq!(
        learned.lookup("Трек").map(|m| m.target_field),
        Some(TargetField::SoundtrackName)
    );
    assert_eq!(second.store().find_all().unwrap(), outcome.added);

    let failure = second
        .import_reader(FILE.as_bytes(), &confirmed())
        .unwrap_err();
    assert!(matches!(failure.error, ImportError::UniquenessConflict { .. }));
    assert_eq!(learned.lookup("Трек").map(|m| m.usage_count), Some(2));

    let jobs = second.audit().list().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].status, ImportStatus::Failed);
    assert_eq!(jobs[1].status, ImportStatus::Success);
    assert_eq!(second.store().find_all().unwrap().len(), 1);
}
