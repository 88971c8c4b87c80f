//! Tabular backing store: the seam behind the rolling log and interest catalog.
//!
//! The production implementation is [`SheetsClient`], a thin REST client
//! opened by spreadsheet id with worksheets selected by name. [`MemoryStore`]
//! is the in-process stand-in for tests and offline diagnostics.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Row-oriented access to named worksheets. Row 0 of every worksheet is the
/// fixed header; record indices passed to `delete_rows` are 0-based and count
/// from the first row *after* the header.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// All rows of the worksheet, header included, in sheet order.
    async fn read_all(&self, worksheet: &str) -> StoreResult<Vec<Vec<String>>>;

    /// Append one row after the current last row.
    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> StoreResult<()>;

    /// Delete `count` records in one batch, starting at `first_record`
    /// (0 = oldest record, immediately after the header). Never row-by-row;
    /// one call bounds the transport round-trips.
    async fn delete_rows(&self, worksheet: &str, first_record: usize, count: usize)
        -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// SheetsClient: Google Sheets v4 REST
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

/// REST client for the backing spreadsheet. Opened by a stable spreadsheet id;
/// authenticated with a bearer token from the environment.
pub struct SheetsClient {
    spreadsheet_id: String,
    token: String,
    client: reqwest::Client,
}

impl SheetsClient {
    /// Build from environment: `NOTBORING_SHEETS_TOKEN` bearer token.
    /// Returns `None` when no token is configured.
    pub fn from_env(spreadsheet_id: &str) -> Option<Self> {
        let token = std::env::var("NOTBORING_SHEETS_TOKEN").ok()?;
        let token = token.trim().to_string();
        if token.is_empty() || spreadsheet_id.trim().is_empty() {
            return None;
        }
        Some(Self::new(spreadsheet_id, token))
    }

    pub fn new(spreadsheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
            client,
        }
    }

    async fn check(res: reqwest::Response) -> StoreResult<reqwest::Response> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(StoreError::Transport(format!(
            "Sheets API error {}: {}",
            status, body
        )))
    }

    /// Resolve a worksheet title to its numeric grid id (required by the
    /// batch delete call). Looked up fresh; sheet ids are stable but cheap.
    async fn sheet_id(&self, worksheet: &str) -> StoreResult<i64> {
        let url = format!(
            "{}/{}?fields=sheets.properties",
            SHEETS_API_BASE, self.spreadsheet_id
        );
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let meta: SpreadsheetMeta = Self::check(res).await?.json().await?;
        meta.sheets
            .into_iter()
            .find(|s| s.properties.title == worksheet)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| StoreError::Malformed(format!("worksheet {} not found", worksheet)))
    }
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn read_all(&self, worksheet: &str) -> StoreResult<Vec<Vec<String>>> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE, self.spreadsheet_id, worksheet
        );
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let range: ValueRange = Self::check(res).await?.json().await?;
        Ok(range.values)
    }

    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> StoreResult<()> {
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            SHEETS_API_BASE, self.spreadsheet_id, worksheet
        );
        let body = serde_json::json!({ "values": [row] });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    async fn delete_rows(
        &self,
        worksheet: &str,
        first_record: usize,
        count: usize,
    ) -> StoreResult<()> {
        if count == 0 {
            return Ok(());
        }
        let sheet_id = self.sheet_id(worksheet).await?;
        // Grid rows are 0-based with the header at row 0.
        let start = first_record + 1;
        let url = format!("{}/{}:batchUpdate", SHEETS_API_BASE, self.spreadsheet_id);
        let body = serde_json::json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": start + count,
                    }
                }
            }]
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore: in-process worksheets for tests and offline diagnostics
// ---------------------------------------------------------------------------

/// In-memory stand-in for the spreadsheet. Worksheets must be seeded (at
/// least with their header row) before use; reading a missing worksheet is a
/// transport error, matching the remote store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    worksheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a worksheet with the given rows, header first.
    pub fn seed_worksheet(&self, name: &str, rows: Vec<Vec<String>>) {
        self.worksheets
            .lock()
            .expect("worksheet lock poisoned")
            .insert(name.to_string(), rows);
    }

    /// Snapshot of a worksheet's rows, header included. Empty if missing.
    pub fn rows(&self, name: &str) -> Vec<Vec<String>> {
        self.worksheets
            .lock()
            .expect("worksheet lock poisoned")
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn read_all(&self, worksheet: &str) -> StoreResult<Vec<Vec<String>>> {
        self.worksheets
            .lock()
            .expect("worksheet lock poisoned")
            .get(worksheet)
            .cloned()
            .ok_or_else(|| StoreError::Transport(format!("worksheet {} not found", worksheet)))
    }

    async fn append_row(&self, worksheet: &str, row: Vec<String>) -> StoreResult<()> {
        let mut sheets = self.worksheets.lock().expect("worksheet lock poisoned");
        let rows = sheets
            .get_mut(worksheet)
            .ok_or_else(|| StoreError::Transport(format!("worksheet {} not found", worksheet)))?;
        rows.push(row);
        Ok(())
    }

    async fn delete_rows(
        &self,
        worksheet: &str,
        first_record: usize,
        count: usize,
    ) -> StoreResult<()> {
        let mut sheets = self.worksheets.lock().expect("worksheet lock poisoned");
        let rows = sheets
            .get_mut(worksheet)
            .ok_or_else(|| StoreError::Transport(format!("worksheet {} not found", worksheet)))?;
        let start = (first_record + 1).min(rows.len());
        let end = (start + count).min(rows.len());
        rows.drain(start..end);
        Ok(())
    }
}
