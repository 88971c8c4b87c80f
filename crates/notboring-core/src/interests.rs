//! Interest catalog: the current subjects of interest from the backing sheet.

use crate::error::{StoreError, StoreResult};
use crate::log_store::RollingLog;
use crate::store::TabularStore;
use std::sync::Arc;

/// Name of the worksheet holding the subjects of interest.
pub const SUBJECT_WORKSHEET: &str = "SUBJECT_OF_INTEREST";

/// Header title of the column holding subject names.
pub const SUBJECT_COLUMN: &str = "Subject";

/// Reads the ordered list of topics the researcher should favor.
///
/// Duplicates are kept: repeated rows in the sheet act as weighting hints in
/// the prompt. Only empty cells are filtered.
pub struct InterestCatalog {
    store: Arc<dyn TabularStore>,
    log: Arc<RollingLog>,
    credential: String,
}

impl InterestCatalog {
    pub fn new(store: Arc<dyn TabularStore>, log: Arc<RollingLog>, credential: impl Into<String>) -> Self {
        Self {
            store,
            log,
            credential: credential.into(),
        }
    }

    /// All non-empty subjects in source row order. On any transport or
    /// parsing failure this returns an empty list after a level-1 log entry:
    /// absence of interests is a valid degraded mode, never an error signal.
    pub async fn fetch_interests(&self) -> Vec<String> {
        match self.try_fetch().await {
            Ok(subjects) => subjects,
            Err(e) => {
                self.log
                    .append(&format!("Failed to fetch subjects: {}", e), 1, &self.credential)
                    .await;
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> StoreResult<Vec<String>> {
        let rows = self.store.read_all(SUBJECT_WORKSHEET).await?;
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or_else(|| {
            StoreError::Malformed(format!("{} worksheet has no header row", SUBJECT_WORKSHEET))
        })?;
        let column = header
            .iter()
            .position(|h| h.trim() == SUBJECT_COLUMN)
            .ok_or_else(|| {
                StoreError::Malformed(format!("no {} column in header", SUBJECT_COLUMN))
            })?;
        Ok(rows
            .filter_map(|row| row.get(column).map(|cell| cell.trim().to_string()))
            .filter(|subject| !subject.is_empty())
            .collect())
    }
}
