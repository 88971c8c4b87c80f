//! The research engine: sequences catalog → researcher → presentation → log.
//!
//! One cycle is one logical unit of work, meant to run off the interactive
//! thread of any UI host via [`ResearchEngine::spawn_cycle`]. Leaf components
//! swallow their own failures, so the worst outcome a host can observe is
//! [`CycleOutcome::NothingFound`]; nothing here panics or propagates errors.

use crate::backend::ChatBackend;
use crate::config::EngineConfig;
use crate::interests::InterestCatalog;
use crate::log_store::RollingLog;
use crate::presentation::PresentationSink;
use crate::researcher::FactResearcher;
use crate::store::TabularStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Spoken when the researcher comes back empty-handed or fails.
pub const NOTHING_FOUND_MESSAGE: &str = "Rupert found nothing but sheep and boredom here.";

/// Default coordinates (Helpston, Peterborough) until a GPS collaborator
/// supplies real ones.
pub const DEFAULT_COORDINATES: (f64, f64) = (52.628, -0.347);

/// Observable completion of one research cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A fact was found, presented, and logged at level 2.
    Presented { location: String },
    /// No usable fact; the fallback message was spoken and logged at level 1.
    NothingFound,
    /// A cycle was already in flight; nothing was done.
    Busy,
}

/// Clears the busy flag when dropped, including during unwinding.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Coordinates one research cycle end to end.
pub struct ResearchEngine {
    catalog: InterestCatalog,
    researcher: FactResearcher,
    log: Arc<RollingLog>,
    coordinates: (f64, f64),
    busy: AtomicBool,
}

impl ResearchEngine {
    /// Wire the full stack from one config, a tabular store, and an AI
    /// backend, at the default coordinates.
    pub fn new(
        cfg: &EngineConfig,
        store: Arc<dyn TabularStore>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let log = Arc::new(RollingLog::new(cfg, Arc::clone(&store)));
        let catalog = InterestCatalog::new(store, Arc::clone(&log), cfg.lock_password.clone());
        let researcher = FactResearcher::new(cfg, backend, Arc::clone(&log));
        Self {
            catalog,
            researcher,
            log,
            coordinates: DEFAULT_COORDINATES,
            busy: AtomicBool::new(false),
        }
    }

    /// Override the coordinate pair for this engine (GPS is an external
    /// collaborator; the engine only consumes coordinates).
    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.coordinates = (lat, lon);
        self
    }

    /// Run one research cycle. A second call while one is in flight returns
    /// [`CycleOutcome::Busy`] with no side effects.
    pub async fn run_cycle(&self, sink: &dyn PresentationSink, credential: &str) -> CycleOutcome {
        if self.busy.swap(true, Ordering::SeqCst) {
            return CycleOutcome::Busy;
        }
        // Released on drop, so a panicking sink or a cancelled task cannot
        // leave the engine wedged in the busy state.
        let _guard = BusyGuard(&self.busy);
        self.cycle_inner(sink, credential).await
    }

    /// Launch a cycle on a background task so the host's interactive thread
    /// stays responsive; completion is observable through the handle.
    pub fn spawn_cycle(
        self: Arc<Self>,
        sink: Arc<dyn PresentationSink>,
        credential: String,
    ) -> JoinHandle<CycleOutcome> {
        tokio::spawn(async move { self.run_cycle(sink.as_ref(), &credential).await })
    }

    async fn cycle_inner(&self, sink: &dyn PresentationSink, credential: &str) -> CycleOutcome {
        self.log
            .append("Engine: starting research cycle", 1, credential)
            .await;

        let interests = self.catalog.fetch_interests().await;
        let (lat, lon) = self.coordinates;

        match self
            .researcher
            .research(lat, lon, &interests, credential)
            .await
        {
            Some(fact) if fact.subject_found => {
                sink.set_location_text(&fact.location_name);
                sink.speak(&fact.interesting_fact);
                self.log
                    .append(&format!("Rupert found: {}", fact.location_name), 2, credential)
                    .await;
                CycleOutcome::Presented {
                    location: fact.location_name,
                }
            }
            _ => {
                sink.speak(NOTHING_FOUND_MESSAGE);
                self.log.append(NOTHING_FOUND_MESSAGE, 1, credential).await;
                CycleOutcome::NothingFound
            }
        }
    }
}
