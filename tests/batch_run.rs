use artbot::{BatchRequest, ProcedureRunner, RunOutcome, SubmissionStatus};
use artbot_core::{ArtEncoding, Artpiece, ArtpieceId, BacterialColor};
use artbot_planner::{
    LabwareSelection, LabwareSpec, PlannerError, PlannerResult, ProcedureAssembler, ProcedurePlan,
    ProcedureRenderer, PythonTemplateRenderer,
};
use artbot_store::{
    ArtpieceStore, MemoryStore, MemoryTransaction, NewArtpiece, PrintableQuery, SqliteStore,
    StoreError, StoreResult, StoreTransaction,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::path::Path;
use tempfile::TempDir;

const ART: &str = r#"{"1": [[0, 0], [1, 0], [0, 1]], "2": [5, 5]}"#;

fn assembler() -> ProcedureAssembler {
    ProcedureAssembler::new(LabwareSpec::resolve(&LabwareSelection::default()).unwrap())
}

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 4, 1)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn runner(dir: &Path) -> ProcedureRunner<PythonTemplateRenderer> {
    ProcedureRunner::new(assembler(), PythonTemplateRenderer::new(), dir).with_timestamp(fixed_time())
}

fn submission(slug: &str, minutes: i64, art: &str) -> NewArtpiece {
    let start = Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap();
    NewArtpiece::confirmed(
        format!("Art {}", slug),
        slug,
        start + Duration::minutes(minutes),
        ArtEncoding::from_json(art).unwrap(),
    )
}

fn sqlite_store(dir: &Path, pieces: usize) -> (SqliteStore, Vec<ArtpieceId>) {
    let store = SqliteStore::open(&dir.join("artbot.db")).unwrap();
    store.insert_color(&BacterialColor::new(1, "Orange")).unwrap();
    store.insert_color(&BacterialColor::new(2, "Violet")).unwrap();
    // Inserted newest first so that id order and queue order differ
    let mut ids: Vec<ArtpieceId> = (0..pieces)
        .rev()
        .map(|i| {
            store
                .insert_artpiece(&submission(&format!("piece-{}", i), i as i64, ART))
                .unwrap()
        })
        .collect();
    ids.reverse();
    (store, ids)
}

fn memory_store(slugs: &[&str]) -> (MemoryStore, Vec<ArtpieceId>) {
    let mut store = MemoryStore::new();
    store.insert_color(BacterialColor::new(1, "Orange"));
    store.insert_color(BacterialColor::new(2, "Violet"));
    let ids = slugs
        .iter()
        .enumerate()
        .map(|(i, slug)| store.insert_artpiece(submission(slug, i as i64, ART)))
        .collect();
    (store, ids)
}

fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("ARTISTIC_PROCEDURE_") || name.starts_with(".tmp"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

struct FailingRenderer;

impl ProcedureRenderer for FailingRenderer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, _plan: &ProcedurePlan) -> PlannerResult<String> {
        Err(PlannerError::InvalidParameters("renderer offline".to_string()))
    }
}

/// Memory store whose transactions never manage to commit
struct CommitFailingStore(MemoryStore);

struct CommitFailingTransaction<'a>(MemoryTransaction<'a>);

impl ArtpieceStore for CommitFailingStore {
    type Transaction<'a> = CommitFailingTransaction<'a>;

    fn transaction(&mut self) -> StoreResult<CommitFailingTransaction<'_>> {
        Ok(CommitFailingTransaction(self.0.transaction()?))
    }
}

impl StoreTransaction for CommitFailingTransaction<'_> {
    fn select_printable(&mut self, query: &PrintableQuery) -> StoreResult<Vec<Artpiece>> {
        self.0.select_printable(query)
    }

    fn colors(&mut self) -> StoreResult<Vec<BacterialColor>> {
        self.0.colors()
    }

    fn mark_processed(&mut self, ids: &[ArtpieceId]) -> StoreResult<()> {
        self.0.mark_processed(ids)
    }

    fn commit(self) -> StoreResult<()> {
        Err(StoreError::InvalidRecord {
            id: ArtpieceId(0),
            reason: "disk full".to_string(),
        })
    }
}

#[test]
fn test_batch_takes_nine_oldest_of_ten() {
    let db_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let (mut store, ids) = sqlite_store(db_dir.path(), 10);

    let outcome = runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(9))
        .unwrap();

    let RunOutcome::Generated {
        path,
        canvas_locations,
        report,
    } = outcome
    else {
        panic!("expected a procedure");
    };

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "ARTISTIC_PROCEDURE_20240401-103000.py"
    );
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("'piece-0': '1'"));
    assert!(text.contains("'piece-8': '9'"));
    assert!(!text.contains("piece-9"));

    assert_eq!(canvas_locations.len(), 9);
    assert_eq!(canvas_locations["piece-0"], "1");

    let lines = report.lines();
    assert_eq!(lines[0], "Loaded 9 pieces of art");
    assert!(lines[1].starts_with(&format!("{}: Art piece-0, 2024-03-30 12:00:00", ids[0])));
    assert!(lines.contains(&"Successfully generated artistic procedure".to_string()));
    assert!(lines.contains(&"Slot 3: \"piece-2\"".to_string()));
    assert!(lines.contains(&"Orange -> A1".to_string()));
    assert!(lines.contains(&"Violet -> B1".to_string()));

    for id in &ids[..9] {
        assert_eq!(store.get(*id).unwrap().status, SubmissionStatus::Processed);
    }
    assert_eq!(store.get(ids[9]).unwrap().status, SubmissionStatus::Submitted);
    assert_eq!(files_in(out_dir.path()).len(), 1);
}

#[test]
fn test_empty_queue_is_nothing_to_do() {
    let out_dir = TempDir::new().unwrap();
    let target = out_dir.path().join("procedures");
    let mut store = MemoryStore::new();

    let outcome = runner(&target)
        .run(&mut store, &BatchRequest::new(9))
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NothingToDo { .. }));
    assert_eq!(outcome.report().lines(), ["No new art found. All done."]);
    assert!(outcome.path().is_none());
    assert!(!target.exists());
}

#[test]
fn test_three_artpieces_get_first_three_slots() {
    let out_dir = TempDir::new().unwrap();
    let (mut store, _) = memory_store(&["abc", "tree", "sun"]);

    let outcome = runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(9))
        .unwrap();

    let RunOutcome::Generated {
        canvas_locations, ..
    } = outcome
    else {
        panic!("expected a procedure");
    };
    let slots: Vec<(&str, &str)> = canvas_locations
        .iter()
        .map(|(slug, slot)| (slug.as_str(), slot.as_str()))
        .collect();
    assert_eq!(slots, vec![("abc", "1"), ("tree", "2"), ("sun", "3")]);
}

#[test]
fn test_render_failure_changes_nothing() {
    let db_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let (mut store, ids) = sqlite_store(db_dir.path(), 3);

    let runner = ProcedureRunner::new(assembler(), FailingRenderer, out_dir.path());
    let err = runner.run(&mut store, &BatchRequest::new(9)).unwrap_err();
    assert!(format!("{:#}", err).contains("renderer offline"));

    for id in ids {
        assert_eq!(store.get(id).unwrap().status, SubmissionStatus::Submitted);
    }
    assert!(files_in(out_dir.path()).is_empty());
}

#[test]
fn test_existing_procedure_file_aborts_batch() {
    let db_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let (mut store, ids) = sqlite_store(db_dir.path(), 4);

    let first = runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(2))
        .unwrap();
    let written = std::fs::read_to_string(first.path().unwrap()).unwrap();

    // Same timestamp, so the second run would overwrite the first file
    assert!(runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(2))
        .is_err());

    assert_eq!(std::fs::read_to_string(first.path().unwrap()).unwrap(), written);
    assert_eq!(files_in(out_dir.path()).len(), 1);
    assert_eq!(store.get(ids[2]).unwrap().status, SubmissionStatus::Submitted);
    assert_eq!(store.get(ids[3]).unwrap().status, SubmissionStatus::Submitted);
}

#[test]
fn test_duplicate_slugs_abort_batch() {
    let out_dir = TempDir::new().unwrap();
    let (mut store, ids) = memory_store(&["same", "other", "same"]);

    let err = runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(9))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PlannerError>(),
        Some(PlannerError::DuplicateSlug(slug)) if slug == "same"
    ));
    for id in ids {
        assert_eq!(store.get(id).unwrap().status, SubmissionStatus::Submitted);
    }
    assert!(files_in(out_dir.path()).is_empty());
}

#[test]
fn test_unknown_color_aborts_batch() {
    let out_dir = TempDir::new().unwrap();
    let mut store = MemoryStore::new();
    store.insert_color(BacterialColor::new(1, "Orange"));
    let id = store.insert_artpiece(submission("mystery", 0, r#"{"7": [[2, 2]]}"#));

    assert!(runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(9))
        .is_err());
    assert_eq!(store.get(id).unwrap().status, SubmissionStatus::Submitted);
}

#[test]
fn test_explicit_ids_restrict_batch() {
    let out_dir = TempDir::new().unwrap();
    let (mut store, ids) = memory_store(&["a", "b", "c", "d"]);

    let request = BatchRequest::new(9).with_ids(vec![ids[3], ids[1]]);
    let outcome = runner(out_dir.path()).run(&mut store, &request).unwrap();

    let RunOutcome::Generated {
        canvas_locations, ..
    } = outcome
    else {
        panic!("expected a procedure");
    };
    assert_eq!(
        canvas_locations.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["b", "d"]
    );
    assert_eq!(store.get(ids[0]).unwrap().status, SubmissionStatus::Submitted);
    assert_eq!(store.get(ids[1]).unwrap().status, SubmissionStatus::Processed);
    assert_eq!(store.get(ids[3]).unwrap().status, SubmissionStatus::Processed);
}

#[test]
fn test_oversized_batch_is_rejected() {
    let out_dir = TempDir::new().unwrap();
    let (mut store, _) = memory_store(&["a"]);
    assert!(runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(10))
        .is_err());
}

#[test]
fn test_failed_commit_removes_procedure_file() {
    let out_dir = TempDir::new().unwrap();
    let (memory, ids) = memory_store(&["abc", "tree"]);
    let mut store = CommitFailingStore(memory);

    let err = runner(out_dir.path())
        .run(&mut store, &BatchRequest::new(9))
        .unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to commit print run"));
    assert!(message.contains("disk full"));

    assert!(files_in(out_dir.path()).is_empty());
    for id in ids {
        assert_eq!(store.0.get(id).unwrap().status, SubmissionStatus::Submitted);
    }
}
