//! Rolling log: bounded, append-only audit trail in the LOG worksheet.
//!
//! Logging is best-effort telemetry. Every failure here is reported to the
//! diagnostic channel and swallowed; it must never break the research cycle
//! it is instrumenting.

use crate::config::EngineConfig;
use crate::error::StoreResult;
use crate::gate::AccessGate;
use crate::store::TabularStore;
use std::sync::Arc;

/// Name of the log worksheet. Columns: Timestamp, Level, Message; the header
/// row is fixed at position 1 and survives eviction.
pub const LOG_WORKSHEET: &str = "LOG";

/// Append-only record store with a fixed capacity. Once the record count
/// reaches the configured maximum, the oldest `delete_count + 1` records are
/// evicted in a single batch before the new row is appended.
pub struct RollingLog {
    store: Arc<dyn TabularStore>,
    gate: AccessGate,
    debug_level: u8,
    max_records: usize,
    delete_count: usize,
}

impl RollingLog {
    pub fn new(cfg: &EngineConfig, store: Arc<dyn TabularStore>) -> Self {
        Self {
            store,
            gate: AccessGate::new(cfg.lock_password.clone()),
            debug_level: cfg.debug_level,
            max_records: cfg.log_max_records,
            delete_count: cfg.log_delete_count,
        }
    }

    /// Append `{now, "Level {level}", message}` as the newest record.
    ///
    /// No-op when the credential fails the gate or `level` exceeds the
    /// configured verbosity. Transport failures are reported via `tracing`
    /// and never propagated.
    pub async fn append(&self, message: &str, level: u8, credential: &str) {
        if !self.gate.authorize(credential) {
            return;
        }
        if level > self.debug_level {
            return;
        }
        if let Err(e) = self.try_append(message, level).await {
            tracing::warn!(error = %e, "log append failed");
        }
    }

    async fn try_append(&self, message: &str, level: u8) -> StoreResult<()> {
        // The count is re-read fresh on every call; nothing is cached locally.
        let rows = self.store.read_all(LOG_WORKSHEET).await?;
        let record_count = rows.len().saturating_sub(1);
        if record_count >= self.max_records {
            self.store
                .delete_rows(LOG_WORKSHEET, 0, self.delete_count + 1)
                .await?;
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.store
            .append_row(
                LOG_WORKSHEET,
                vec![timestamp, format!("Level {}", level), message.to_string()],
            )
            .await
    }
}
