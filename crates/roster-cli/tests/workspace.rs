//! Integration tests for the workspace wiring over a temp data directory.

use std::fs;
use std::path::{Path, PathBuf};

use roster_cli::config::RosterConfig;
use roster_cli::workspace::{Workspace, parse_map_args};
use roster_core::{ImportError, ImportFailure};
use roster_model::{ImportStatus, MappingTarget, SuggestionSource, TargetField};
use tempfile::{TempDir, tempdir};

const ROSTER: &str = "\
Водитель,Трек,Скорость,X,Y,Герой,Настроение
Иван,Song A,10,12.5,-5,да,гнев
Мария,Song B,99,3.0,0,нет,грусть
Олег,Song C,42,1.0,7,да,
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn open(root: &Path) -> Workspace {
    Workspace::open(root, RosterConfig::default()).unwrap()
}

#[test]
fn accepted_suggestions_import_and_are_learned() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    let file = write(&tmp, "roster.csv", ROSTER);
    let workspace = open(&data);

    let reports = workspace.suggest_file(&file).unwrap();
    assert_eq!(reports.len(), 7);
    assert_eq!(
        reports[0].suggestion.target,
        MappingTarget::Field(TargetField::Name)
    );
    assert_eq!(reports[0].ranking.len(), 12);

    let explicit = parse_map_args(&[
        "Трек=soundtrackName".to_string(),
        "Скорость=impactSpeed".to_string(),
        "X=coordinates.x".to_string(),
        "Y=coordinates.y".to_string(),
        "Герой=realHero".to_string(),
        "Настроение=mood".to_string(),
    ])
    .unwrap();
    let confirmed = workspace.confirm(&file, explicit, true).unwrap();
    assert_eq!(
        confirmed.get("Водитель"),
        Some(&MappingTarget::Field(TargetField::Name))
    );

    let outcome = workspace.import_file(&file, &confirmed).unwrap();
    assert_eq!(outcome.added.len(), 3);

    let reopened = open(&data);
    let again = reopened.suggest_file(&file).unwrap();
    let track = again
        .iter()
        .find(|report| report.suggestion.header == "Трек")
        .unwrap();
    assert_eq!(track.suggestion.source, SuggestionSource::Learned);
    assert_eq!(
        track.suggestion.target,
        MappingTarget::Field(TargetField::SoundtrackName)
    );
    assert_eq!(reopened.learned().len(), 7);
    assert_eq!(reopened.history().unwrap()[0].status, ImportStatus::Success);
}

#[test]
fn nothing_confirmed_is_rejected_before_any_job() {
    let tmp = tempdir().unwrap();
    let file = write(&tmp, "roster.csv", ROSTER);
    let workspace = open(&tmp.path().join("data"));
    let explicit = parse_map_args(&["Трек=none".to_string()]).unwrap();
    assert!(workspace.confirm(&file, explicit, false).is_err());
    assert!(workspace.history().unwrap().is_empty());
}

#[test]
fn failed_import_is_recorded_with_its_reason() {
    let tmp = tempdir().unwrap();
    let file = write(&tmp, "bad.csv", "Имя,Трек,Скорость\nИван,Song,fast\n");
    let workspace = open(&tmp.path().join("data"));
    let confirmed = parse_map_args(&[
        "Имя=name".to_string(),
        "Трек=soundtrackName".to_string(),
        "Скорость=impactSpeed".to_string(),
    ])
    .unwrap();

    let err = workspace.import_file(&file, &confirmed).unwrap_err();
    let failure = err.downcast_ref::<ImportFailure>().unwrap();
    assert!(matches!(failure.error, ImportError::RowFormat { row: 2, .. }));

    let jobs = workspace.history().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, ImportStatus::Failed);
    assert!(jobs[0].error_detail.as_deref().unwrap().contains("column 'Скорость'"));
}

#[test]
fn missing_file_fails_without_a_job() {
    let tmp = tempdir().unwrap();
    let workspace = open(&tmp.path().join("data"));
    let confirmed = parse_map_args(&["Имя=name".to_string()]).unwrap();
    let err = workspace
        .import_file(&tmp.path().join("absent.csv"), &confirmed)
        .unwrap_err();
    assert!(err.to_string().starts_with("open "));
    assert!(workspace.history().unwrap().is_empty());
}
