use std::collections::BTreeSet;
use std::thread;

use chrono::NaiveDate;
use roster_core::{AuditLog, RecordStore, RecordTransaction, StoreError};
use roster_map::MappingRepository;
use roster_model::{Coordinates, HumanRecord, LearnedMapping, TargetField};
use roster_store::DataDir;
use tempfile::tempdir;

const THREADS: usize = 4;
const ROUNDS: usize = 40;

fn record(name: String) -> HumanRecord {
    HumanRecord {
        name,
        coordinates: Coordinates { x: 1.0, y: 2 },
        creation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        real_hero: false,
        has_toothpick: false,
        car: None,
        mood: None,
        impact_speed: 1,
        soundtrack_name: "s".into(),
        minutes_of_waiting: 1.0,
        weapon_type: None,
    }
}

#[test]
fn record_commits_from_separate_handles_are_never_lost() {
    let tmp = tempdir().unwrap();
    let dir = DataDir::new(tmp.path());

    let results: Vec<(usize, usize)> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = dir.records();
                scope.spawn(move || {
                    let (mut committed, mut conflicts) = (0, 0);
                    for round in 0..ROUNDS {
                        let mut tx = store.begin().unwrap();
                        tx.save_all(vec![record(format!("t{t}-{round}"))]).unwrap();
                        match tx.commit() {
                            Ok(()) => committed += 1,
                            Err(StoreError::Conflict) => conflicts += 1,
                            Err(other) => panic!("unexpected commit error: {other:?}"),
                        }
                    }
                    (committed, conflicts)
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let committed: usize = results.iter().map(|(ok, _)| ok).sum();
    let conflicts: usize = results.iter().map(|(_, c)| c).sum();
    assert_eq!(committed + conflicts, THREADS * ROUNDS);
    assert!(committed > 0);

    let stored = dir.records().find_all().unwrap();
    assert_eq!(stored.len(), committed);
    let ids: BTreeSet<_> = stored.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), committed);
}

#[test]
fn mapping_upserts_from_separate_handles_all_land() {
    let tmp = tempdir().unwrap();
    let dir = DataDir::new(tmp.path());
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    thread::scope(|scope| {
        for t in 0..THREADS {
            let repo = dir.mappings();
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let header = format!("h{t}-{round}");
                    repo.upsert(&LearnedMapping::new(&header, TargetField::Name, day))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(dir.mappings().find_all().unwrap().len(), THREADS * ROUNDS);
}

#[test]
fn jobs_created_from_separate_handles_get_distinct_ids() {
    let tmp = tempdir().unwrap();
    let dir = DataDir::new(tmp.path());

    let ids: Vec<_> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let log = dir.audit();
                scope.spawn(move || {
                    (0..ROUNDS)
                        .map(|_| log.create().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect()
    });

    let distinct: BTreeSet<_> = ids.iter().map(|id| id.0).collect();
    assert_eq!(distinct.len(), THREADS * ROUNDS);
    assert_eq!(dir.audit().list().unwrap().len(), THREADS * ROUNDS);
}
