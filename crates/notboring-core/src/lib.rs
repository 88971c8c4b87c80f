//! # Not Boring Core — Research Cycle Engine
//!
//! One research cycle: pull the subjects of interest from the backing sheet,
//! ask the AI researcher for a location fact, hand the result to the
//! presentation sinks, and record every significant step in the rolling log.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       ResearchEngine                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌───────────────┐  │
//! │  │ InterestCatalog│→ │ FactResearcher │→ │ Presentation  │  │
//! │  │ (sheet rows)   │  │ (Gemini bridge)│  │ Sink          │  │
//! │  └────────────────┘  └────────────────┘  └───────────────┘  │
//! │            ↓                  ↓                  ↓           │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │ RollingLog (bounded sheet log, batch eviction)         │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every privileged operation is wrapped by [`AccessGate`]; leaf components
//! swallow their own failures and report them through the log, so the engine
//! never surfaces an unhandled failure to its host.

pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod interests;
pub mod log_store;
pub mod presentation;
pub mod researcher;
pub mod store;

pub use backend::{ChatBackend, GeminiBridge, PlaceholderBackend};
pub use config::EngineConfig;
pub use engine::{CycleOutcome, ResearchEngine, DEFAULT_COORDINATES, NOTHING_FOUND_MESSAGE};
pub use error::{ResearchError, ResearchResult, StoreError, StoreResult};
pub use gate::AccessGate;
pub use interests::{InterestCatalog, SUBJECT_COLUMN, SUBJECT_WORKSHEET};
pub use log_store::{RollingLog, LOG_WORKSHEET};
pub use presentation::{ConsoleSink, PresentationSink};
pub use researcher::{Fact, FactResearcher};
pub use store::{MemoryStore, SheetsClient, TabularStore};
