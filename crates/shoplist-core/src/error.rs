//! Error taxonomy shared by the core and the HTTP layer.
//!
//! | Variant | Raised by | Surfaced as |
//! |---------|-----------|-------------|
//! | [`ShoppingError::Parse`] | [`LineParser`](crate::parser::LineParser) | skipped line (batch), 400 (single) |
//! | [`ShoppingError::InvalidStrategy`] | [`MergeStrategy`](crate::merge::MergeStrategy) parsing | 400 |
//! | [`ShoppingError::NotFound`] | list lookups | 404 |
//! | [`ShoppingError::Oracle`] | [`SearchOracle`](crate::oracle::SearchOracle) implementations | 429 / 500 |

use serde::Serialize;

/// Why an external oracle call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleErrorKind {
    /// The provider answered HTTP 429.
    RateLimited,
    /// The provider reported an exhausted quota or billing problem.
    Quota,
    /// The oracle is disabled or could not be reached.
    Unavailable,
    /// Any other failure (bad response, validation, server error).
    Failed,
}

impl std::fmt::Display for OracleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OracleErrorKind::RateLimited => "rate limited",
            OracleErrorKind::Quota => "quota exceeded",
            OracleErrorKind::Unavailable => "unavailable",
            OracleErrorKind::Failed => "search failed",
        };
        f.write_str(s)
    }
}

/// Errors produced by the shopping-list core.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShoppingError {
    /// A single line could not be parsed (blank after trimming).
    #[error("cannot parse line {line:?}: {reason}")]
    Parse { line: String, reason: String },

    /// The merge strategy string is not `sum`, `max`, or `keep-separate`.
    #[error("invalid merge strategy: {0:?} (expected sum, max, or keep-separate)")]
    InvalidStrategy(String),

    /// A referenced shopping list does not exist.
    #[error("shopping list not found: {0}")]
    NotFound(String),

    /// An external search or text-generation oracle failed.
    #[error("oracle error ({kind}): {message}")]
    Oracle {
        kind: OracleErrorKind,
        message: String,
    },
}

impl ShoppingError {
    pub fn oracle(kind: OracleErrorKind, message: impl Into<String>) -> Self {
        ShoppingError::Oracle {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let e = ShoppingError::InvalidStrategy("avg".to_string());
        assert!(e.to_string().contains("\"avg\""));

        let e = ShoppingError::NotFound("weekly".to_string());
        assert_eq!(e.to_string(), "shopping list not found: weekly");
    }

    #[test]
    fn test_oracle_error_display() {
        let e = ShoppingError::oracle(OracleErrorKind::RateLimited, "HTTP 429");
        assert_eq!(e.to_string(), "oracle error (rate limited): HTTP 429");
    }
}
