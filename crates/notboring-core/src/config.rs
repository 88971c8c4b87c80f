//! Engine configuration loaded from the environment.
//!
//! Constructed once at process start and passed by reference into each
//! component's constructor; `normalize()` runs at load time (clamping the
//! talk-time bounds and the debug level), never per call.

/// Engine configuration. Read-only after startup.
///
/// | Env | Default | Description |
/// |-----|---------|--------------|
/// | NOTBORING_LOCK_PASSWORD | PASSWORD | Shared secret for the access gate. |
/// | NOTBORING_SHEET_ID | (empty) | Backing spreadsheet identifier. |
/// | NOTBORING_DEBUG_LEVEL | 1 | 1 basic, 2 detailed, 3 full AI diagnostics. |
/// | NOTBORING_LOG_MAX_RECORDS | 1000 | Rolling-log capacity (records, header excluded). |
/// | NOTBORING_LOG_DELETE_COUNT | 250 | Eviction batch size. |
/// | NOTBORING_TEST_MODE | true | Cap AI replies to one short sentence. |
/// | NOTBORING_AI_MODEL | gemini-2.5-flash-lite | Backend model identifier. |
/// | NOTBORING_EXPAND_DISTANCE_KM | 2.0 | Search-radius expansion (kilometers, metric only). |
/// | NOTBORING_MIN_TALK_TIME | 30 | Lower speech bound, seconds. |
/// | NOTBORING_MAX_TALK_TIME | 180 | Upper speech bound, seconds. |
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Shared secret checked by [`crate::AccessGate`] before any privileged operation.
    pub lock_password: String,
    /// Identifier of the backing spreadsheet (LOG + SUBJECT_OF_INTEREST worksheets).
    pub spreadsheet_id: String,
    /// Verbosity threshold 1..=3. Log entries above this level are dropped.
    pub debug_level: u8,
    /// Rolling-log capacity, excluding the header row.
    pub log_max_records: usize,
    /// Number of oldest records evicted in one batch (plus one) when full.
    pub log_delete_count: usize,
    /// When true, the researcher persona demands single-sentence replies.
    pub test_mode: bool,
    /// AI backend model identifier.
    pub ai_model: String,
    /// Kilometers the AI may widen its search when nothing is nearby.
    pub expand_distance_km: f64,
    /// Lower bound on spoken-delivery time, seconds. Clamped to the upper bound.
    pub min_talk_time_secs: u32,
    /// Upper bound on spoken-delivery time, seconds.
    pub max_talk_time_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_password: "PASSWORD".to_string(),
            spreadsheet_id: String::new(),
            debug_level: 1,
            log_max_records: 1000,
            log_delete_count: 250,
            test_mode: true,
            ai_model: "gemini-2.5-flash-lite".to_string(),
            expand_distance_km: 2.0,
            min_talk_time_secs: 30,
            max_talk_time_secs: 180,
        }
    }
}

impl EngineConfig {
    /// Load from environment. Unset or invalid values fall back to defaults
    /// (see struct field docs). The result is already normalized.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut cfg = Self {
            lock_password: env_string("NOTBORING_LOCK_PASSWORD", &defaults.lock_password),
            spreadsheet_id: env_string("NOTBORING_SHEET_ID", &defaults.spreadsheet_id),
            debug_level: env_parse("NOTBORING_DEBUG_LEVEL", defaults.debug_level),
            log_max_records: env_parse("NOTBORING_LOG_MAX_RECORDS", defaults.log_max_records),
            log_delete_count: env_parse("NOTBORING_LOG_DELETE_COUNT", defaults.log_delete_count),
            test_mode: env_bool("NOTBORING_TEST_MODE", defaults.test_mode),
            ai_model: env_string("NOTBORING_AI_MODEL", &defaults.ai_model),
            expand_distance_km: env_parse("NOTBORING_EXPAND_DISTANCE_KM", defaults.expand_distance_km),
            min_talk_time_secs: env_parse("NOTBORING_MIN_TALK_TIME", defaults.min_talk_time_secs),
            max_talk_time_secs: env_parse("NOTBORING_MAX_TALK_TIME", defaults.max_talk_time_secs),
        };
        cfg.normalize();
        cfg
    }

    /// Restore logical consistency. Inconsistencies are auto-corrected here,
    /// once, rather than reported as errors or re-checked per call.
    pub fn normalize(&mut self) {
        self.debug_level = self.debug_level.clamp(1, 3);
        if self.min_talk_time_secs > self.max_talk_time_secs {
            self.min_talk_time_secs = self.max_talk_time_secs;
        }
        if self.expand_distance_km < 0.0 {
            self.expand_distance_km = 0.0;
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => v.trim().eq_ignore_ascii_case("true") || (v.trim().is_empty() && default),
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}
