//! The uniform failure value.
//!
//! Every operation in the data-access layer collapses its failure modes —
//! vendor errors, transport faults, missing documents, invalid algorithm
//! input — into a single [`ErrorObject`]. Callers match on `Result` and,
//! inside the error arm, on [`ErrorObject::is_not_found`] for the one case
//! that is an expected absence rather than a failure.

use serde::{Deserialize, Serialize};

/// How severe a failure is from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A recoverable failure the caller should surface or handle.
    Error,
    /// An unrecoverable failure.
    Fatal,
    /// An expected, non-failure outcome (e.g. a missing document).
    Info,
}

/// Code carried by errors that did not come from the store or provider.
const UNKNOWN_CODE: &str = "Unknown/Default";

/// Fixed code for the missing-document outcome.
const NOT_FOUND_CODE: &str = "Document/Resource Not Found";

/// The uniform error value returned by every fallible operation.
///
/// Vendor errors keep their own code/name/message verbatim so nothing is
/// lost, but callers never see (or branch on) a vendor exception type.
/// An `ErrorObject` is always returned as a value, never panicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{name} ({code}): {message}")]
pub struct ErrorObject {
    pub code: String,
    pub name: String,
    pub message: String,
    pub severity: Severity,
}

impl ErrorObject {
    /// Wraps a recognizable store/provider error, keeping its code, name
    /// and message verbatim.
    pub fn provider(
        code: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            message: message.into(),
            severity,
        }
    }

    /// Wraps anything that is not a recognizable provider error.
    pub fn unknown(
        name: impl Into<String>,
        fallback_message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: UNKNOWN_CODE.to_string(),
            name: name.into(),
            message: fallback_message.into(),
            severity,
        }
    }

    /// The fixed value signaling a missing document.
    ///
    /// Severity is [`Severity::Info`]: absence is a valid outcome, not a
    /// failure, and callers are expected to treat it as such.
    pub fn not_found() -> Self {
        Self {
            code: NOT_FOUND_CODE.to_string(),
            name: "No Document".to_string(),
            message: "This Specific Document Cannot be Found".to_string(),
            severity: Severity::Info,
        }
    }

    /// Builds an error for algorithm-level failures with a caller-chosen code.
    pub fn custom(
        code: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            message: message.into(),
            severity,
        }
    }

    /// Returns true if this is the missing-document outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_uses_fixed_code() {
        let err = ErrorObject::unknown("Fetch Error", "something broke", Severity::Error);
        assert_eq!(err.code, "Unknown/Default");
        assert_eq!(err.severity, Severity::Error);
    }

    #[test]
    fn not_found_is_info_and_discriminable() {
        let err = ErrorObject::not_found();
        assert_eq!(err.severity, Severity::Info);
        assert!(err.is_not_found());
        assert!(!ErrorObject::unknown("x", "y", Severity::Error).is_not_found());
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Fatal).unwrap(), "\"fatal\"");
        assert_eq!(serde_json::to_string(&Severity::Info).unwrap(), "\"info\"");
    }
}
