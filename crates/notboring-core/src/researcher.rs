//! The researcher: builds the persona-conditioned query, submits it to the
//! AI backend, and validates the structured reply into a [`Fact`].
//!
//! Stateless request/response. Each call yields exactly one `Fact` or `None`;
//! every failure on the way is logged at level 1 and swallowed.

use crate::backend::ChatBackend;
use crate::config::EngineConfig;
use crate::error::{ResearchError, ResearchResult};
use crate::gate::AccessGate;
use crate::log_store::RollingLog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A validated research result. Produced at most once per backend call,
/// immutable, consumed immediately by the engine; never persisted as
/// structured data (only flattened into log text).
#[derive(Debug, Clone, Serialize)]
pub struct Fact {
    pub subject_found: bool,
    pub location_name: String,
    pub interesting_fact: String,
    /// Kilometers the search was widened. Never null: a missing or null
    /// value is coerced to `0.0` at construction.
    pub distance_expanded: f64,
    pub is_test_mode: bool,
}

/// Parsed shape of the raw reply, before validation. All fields optional so
/// the required-field check is explicit rather than hidden in serde errors.
#[derive(Deserialize)]
struct RawThought {
    subject_found: Option<bool>,
    location_name: Option<String>,
    interesting_fact: Option<String>,
    distance_expanded: Option<f64>,
    is_test_mode: Option<bool>,
}

impl Fact {
    /// Parse-then-validate a raw backend reply: strip Markdown fences, parse
    /// JSON, then check required fields and apply the null-coalescing rule
    /// for `distance_expanded`.
    pub fn parse(raw: &str, test_mode_default: bool) -> ResearchResult<Self> {
        let cleaned = strip_code_fences(raw);
        let thought: RawThought = serde_json::from_str(&cleaned)
            .map_err(|e| ResearchError::Validation(format!("reply is not valid JSON: {}", e)))?;
        let subject_found = thought
            .subject_found
            .ok_or_else(|| ResearchError::Validation("reply missing subject_found".to_string()))?;
        let location_name = thought
            .location_name
            .ok_or_else(|| ResearchError::Validation("reply missing location_name".to_string()))?;
        let interesting_fact = thought
            .interesting_fact
            .ok_or_else(|| ResearchError::Validation("reply missing interesting_fact".to_string()))?;
        Ok(Fact {
            subject_found,
            location_name,
            interesting_fact,
            distance_expanded: thought.distance_expanded.unwrap_or(0.0).max(0.0),
            is_test_mode: thought.is_test_mode.unwrap_or(test_mode_default),
        })
    }
}

/// Remove Markdown code-fence decoration the backend likes to wrap JSON in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Builds the persona and query, performs the single backend round trip, and
/// validates the reply. No retries, no backoff, no state across calls.
pub struct FactResearcher {
    backend: Arc<dyn ChatBackend>,
    log: Arc<RollingLog>,
    gate: AccessGate,
    model: String,
    test_mode: bool,
    expand_distance_km: f64,
    debug_level: u8,
}

impl FactResearcher {
    pub fn new(cfg: &EngineConfig, backend: Arc<dyn ChatBackend>, log: Arc<RollingLog>) -> Self {
        Self {
            backend,
            log,
            gate: AccessGate::new(cfg.lock_password.clone()),
            model: cfg.ai_model.clone(),
            test_mode: cfg.test_mode,
            expand_distance_km: cfg.expand_distance_km,
            debug_level: cfg.debug_level,
        }
    }

    /// Research one coordinate pair. Returns a validated [`Fact`], or `None`
    /// on authorization failure or any transport/validation failure (which is
    /// logged at level 1, never raised to the caller).
    pub async fn research(
        &self,
        lat: f64,
        lon: f64,
        interests: &[String],
        credential: &str,
    ) -> Option<Fact> {
        if !self.gate.authorize(credential) {
            tracing::debug!("research call rejected: credential mismatch");
            return None;
        }

        let persona = self.persona();
        let prompt = self.prompt(lat, lon, interests);

        let raw = match self.backend.complete(&self.model, &persona, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                self.log
                    .append(&format!("Researcher error: {}", e), 1, credential)
                    .await;
                return None;
            }
        };

        match Fact::parse(&raw, self.test_mode) {
            Ok(fact) => {
                if self.debug_level >= 3 {
                    if let Ok(json) = serde_json::to_string(&fact) {
                        self.log
                            .append(&format!("AI response: {}", json), 3, credential)
                            .await;
                    }
                }
                Some(fact)
            }
            Err(e) => {
                self.log
                    .append(&format!("Researcher error: {}", e), 1, credential)
                    .await;
                None
            }
        }
    }

    /// Fixed sarcastic-expert character, with the one-sentence cap appended
    /// in test mode.
    fn persona(&self) -> String {
        let mut persona = String::from(
            "You are Rupert, a British, highly intelligent, and bitingly sarcastic AI. \
             You hate boredom. You are a world traveler and history expert. \
             Your goal: provide an interesting fact about the user's current location. \
             Be witty, irreverent, and detailed unless test mode is active.",
        );
        if self.test_mode {
            persona.push_str(
                " CRITICAL: test mode is ON. Limit your response to one short, sharp sentence.",
            );
        }
        persona
    }

    fn prompt(&self, lat: f64, lon: f64, interests: &[String]) -> String {
        format!(
            "Location: Latitude {lat}, Longitude {lon}\n\
             Possible areas of interest: {subjects}\n\
             \n\
             Search for something fascinating near these coordinates.\n\
             If nothing is within the immediate area, expand your search by {expand} km.\n\
             \n\
             Return your answer strictly as a single JSON object with exactly these fields:\n\
             {{\n\
                 \"subject_found\": true/false,\n\
                 \"location_name\": \"name of the area\",\n\
                 \"interesting_fact\": \"your sarcastic and brilliant discovery\",\n\
                 \"distance_expanded\": numeric_value_in_km,\n\
                 \"is_test_mode\": true/false\n\
             }}",
            lat = lat,
            lon = lon,
            subjects = interests.join(", "),
            expand = self.expand_distance_km,
        )
    }
}
