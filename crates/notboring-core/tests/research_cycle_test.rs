//! Integration test: full research cycles over the in-memory store and a
//! canned AI backend.
//!
//! ## Scenarios
//! A. Backend returns a well-formed fact: label set, fact spoken, level-2
//!    record appended.
//! B. Backend returns unparsable text: fallback spoken, no label, level-1
//!    record describing the parse failure.
//! C. Wrong credential: no backend call, no record, nothing presented but
//!    the fallback.
//! D. Busy guard: a second cycle launched mid-flight returns Busy with no
//!    side effects.
//! E. A sink that panics mid-cycle does not leave the engine stuck in the
//!    busy state; the next cycle runs normally.

use async_trait::async_trait;
use notboring_core::{
    ChatBackend, CycleOutcome, EngineConfig, MemoryStore, PlaceholderBackend, PresentationSink,
    ResearchEngine, ResearchResult, LOG_WORKSHEET, NOTHING_FOUND_MESSAGE, SUBJECT_WORKSHEET,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const CREDENTIAL: &str = "PASSWORD";

const HELPSTON_REPLY: &str = "```json\n{\
    \"subject_found\": true, \
    \"location_name\": \"Helpston\", \
    \"interesting_fact\": \"John Clare, the peasant poet, was born here in 1793.\", \
    \"distance_expanded\": 1.5, \
    \"is_test_mode\": true}\n```";

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingSink {
    labels: Mutex<Vec<String>>,
    spoken: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl PresentationSink for RecordingSink {
    fn set_location_text(&self, text: &str) {
        self.labels.lock().unwrap().push(text.to_string());
    }
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Counts round trips so tests can assert that no backend call was observed.
struct CountingBackend {
    calls: Arc<AtomicUsize>,
    inner: PlaceholderBackend,
}

#[async_trait]
impl ChatBackend for CountingBackend {
    async fn complete(&self, model: &str, system: &str, user: &str) -> ResearchResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.complete(model, system, user).await
    }
}

/// Blocks inside the round trip until released, to hold a cycle in flight.
struct GatedBackend {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ChatBackend for GatedBackend {
    async fn complete(&self, _model: &str, _system: &str, _user: &str) -> ResearchResult<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(HELPSTON_REPLY.to_string())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_config() -> EngineConfig {
    EngineConfig {
        debug_level: 2,
        ..EngineConfig::default()
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.seed_worksheet(
        LOG_WORKSHEET,
        vec![vec!["Timestamp".into(), "Level".into(), "Message".into()]],
    );
    store.seed_worksheet(
        SUBJECT_WORKSHEET,
        vec![
            vec!["Subject".into()],
            vec!["History".into()],
            vec!["Archaeology".into()],
        ],
    );
    store
}

fn engine_with_backend(
    cfg: &EngineConfig,
    store: &Arc<MemoryStore>,
    backend: Arc<dyn ChatBackend>,
) -> ResearchEngine {
    ResearchEngine::new(cfg, store.clone(), backend)
}

// ===========================================================================
// Scenario A: fact found and presented
// ===========================================================================

#[tokio::test]
async fn found_fact_is_presented_and_logged() {
    let cfg = test_config();
    let store = seeded_store();
    let engine = engine_with_backend(
        &cfg,
        &store,
        Arc::new(PlaceholderBackend::new(HELPSTON_REPLY)),
    );
    let sink = RecordingSink::default();

    let outcome = engine.run_cycle(&sink, CREDENTIAL).await;

    assert_eq!(
        outcome,
        CycleOutcome::Presented {
            location: "Helpston".to_string()
        }
    );
    assert_eq!(sink.labels(), vec!["Helpston"]);
    assert_eq!(
        sink.spoken(),
        vec!["John Clare, the peasant poet, was born here in 1793."]
    );

    let rows = store.rows(LOG_WORKSHEET);
    let last = rows.last().unwrap();
    assert_eq!(last[1], "Level 2");
    assert_eq!(last[2], "Rupert found: Helpston");
    // Cycle start was logged at level 1 before the research call.
    assert!(rows.iter().any(|r| r[2].contains("starting research cycle")));
}

// ===========================================================================
// Scenario B: malformed reply falls back cleanly
// ===========================================================================

#[tokio::test]
async fn malformed_reply_speaks_fallback_and_logs_failure() {
    let cfg = test_config();
    let store = seeded_store();
    let engine = engine_with_backend(
        &cfg,
        &store,
        Arc::new(PlaceholderBackend::new(
            "Rupert waxed lyrical instead of returning JSON.",
        )),
    );
    let sink = RecordingSink::default();

    let outcome = engine.run_cycle(&sink, CREDENTIAL).await;

    assert_eq!(outcome, CycleOutcome::NothingFound);
    assert!(sink.labels().is_empty(), "no visual update on failure");
    assert_eq!(sink.spoken(), vec![NOTHING_FOUND_MESSAGE]);

    let rows = store.rows(LOG_WORKSHEET);
    assert!(
        rows.iter()
            .any(|r| r[1] == "Level 1" && r[2].contains("Researcher error")),
        "parse failure must be logged at level 1"
    );
}

// ===========================================================================
// Scenario C: wrong credential performs no privileged work
// ===========================================================================

#[tokio::test]
async fn wrong_credential_is_a_complete_no_op() {
    let cfg = test_config();
    let store = seeded_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with_backend(
        &cfg,
        &store,
        Arc::new(CountingBackend {
            calls: Arc::clone(&calls),
            inner: PlaceholderBackend::new(HELPSTON_REPLY),
        }),
    );
    let sink = RecordingSink::default();

    let outcome = engine.run_cycle(&sink, "letmein").await;

    assert_eq!(outcome, CycleOutcome::NothingFound);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no backend call observed");
    assert_eq!(
        store.rows(LOG_WORKSHEET).len(),
        1,
        "no record appended, header only"
    );
    assert!(sink.labels().is_empty());
}

// ===========================================================================
// Scenario D: reject-if-busy
// ===========================================================================

#[tokio::test]
async fn second_cycle_in_flight_is_rejected() {
    let cfg = test_config();
    let store = seeded_store();
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let engine = Arc::new(engine_with_backend(
        &cfg,
        &store,
        Arc::new(GatedBackend {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        }),
    ));

    let first_sink: Arc<RecordingSink> = Arc::new(RecordingSink::default());
    let handle = Arc::clone(&engine).spawn_cycle(first_sink.clone(), CREDENTIAL.to_string());

    // Wait until the first cycle is inside the backend call.
    entered.notified().await;

    let second_sink = RecordingSink::default();
    let second = engine.run_cycle(&second_sink, CREDENTIAL).await;
    assert_eq!(second, CycleOutcome::Busy);
    assert!(second_sink.spoken().is_empty(), "rejected cycle has no side effects");

    release.notify_one();
    let first = handle.await.unwrap();
    assert_eq!(
        first,
        CycleOutcome::Presented {
            location: "Helpston".to_string()
        }
    );
    assert_eq!(first_sink.labels(), vec!["Helpston"]);
}

// ===========================================================================
// Scenario E: a panicking sink must not wedge the engine
// ===========================================================================

/// Panics on delivery, like a presentation layer whose output went away.
struct PanickingSink;

impl PresentationSink for PanickingSink {
    fn set_location_text(&self, _text: &str) {}
    fn speak(&self, _text: &str) {
        panic!("presentation layer went away");
    }
}

#[tokio::test]
async fn panicking_sink_does_not_wedge_the_engine() {
    let cfg = test_config();
    let store = seeded_store();
    let engine = Arc::new(engine_with_backend(
        &cfg,
        &store,
        Arc::new(PlaceholderBackend::new(HELPSTON_REPLY)),
    ));

    let handle = Arc::clone(&engine).spawn_cycle(Arc::new(PanickingSink), CREDENTIAL.to_string());
    let crashed = handle.await;
    assert!(crashed.is_err(), "the first cycle's task must have panicked");

    // The busy flag was released during unwinding; the next cycle runs.
    let sink = RecordingSink::default();
    let outcome = engine.run_cycle(&sink, CREDENTIAL).await;
    assert_eq!(
        outcome,
        CycleOutcome::Presented {
            location: "Helpston".to_string()
        }
    );
    assert_eq!(sink.labels(), vec!["Helpston"]);
}
