//! Access gate: the shared-secret check wrapping every privileged operation.

/// Validates a caller-supplied credential against the configured secret.
///
/// The check is an exact byte match with no normalization and no side effects.
/// Callers that fail authorization short-circuit silently: no partial work,
/// no error propagated beyond a boolean or an empty result.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// True iff `candidate` equals the configured secret exactly.
    pub fn authorize(&self, candidate: &str) -> bool {
        candidate == self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let gate = AccessGate::new("PASSWORD");
        assert!(gate.authorize("PASSWORD"));
        assert!(!gate.authorize("password"));
        assert!(!gate.authorize("PASSWORD "));
        assert!(!gate.authorize(""));
    }
}
