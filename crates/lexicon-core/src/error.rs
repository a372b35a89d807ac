//! Error taxonomy for keyword operations.
//!
//! Validation failures (authorization, unknown field) abort a batch before it
//! starts; host failures surface as [`CatalogError`] and propagate. A missing
//! per-object mutator is deliberately *not* an error, see
//! [`WriteOutcome::NoMutator`](crate::catalog::WriteOutcome).

use serde::{Deserialize, Serialize};

/// Result alias for operations exposed by this crate.
pub type KeywordResult<T> = Result<T, KeywordError>;

/// Result alias for host catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures reported by a host catalog implementation.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CatalogError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("reindex error: {0}")]
    Reindex(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors surfaced by the keyword manager and the similarity layer.
#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    /// The caller lacks the manage-keywords capability for the target scope.
    /// Raised before any query or mutation.
    #[error("not permitted to manage keywords{}", scope_suffix(.scope))]
    Unauthorized {
        /// Scope the capability was checked against, whole repository if absent.
        scope: Option<String>,
    },

    /// The requested field is not a managed keyword field.
    #[error("{0} is not a valid keyword field")]
    InvalidField(String),

    /// A similarity operand was neither decoded text nor valid UTF-8 bytes.
    #[error("invalid similarity operand: {0}")]
    InvalidInput(String),

    /// The host catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

fn scope_suffix(scope: &Option<String>) -> String {
    match scope {
        Some(path) => format!(" in {path}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message_includes_scope() {
        let err = KeywordError::Unauthorized {
            scope: Some("/site/news".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "not permitted to manage keywords in /site/news"
        );

        let err = KeywordError::Unauthorized { scope: None };
        assert_eq!(err.to_string(), "not permitted to manage keywords");
    }

    #[test]
    fn test_invalid_field_message() {
        let err = KeywordError::InvalidField("Title".to_string());
        assert_eq!(err.to_string(), "Title is not a valid keyword field");
    }

    #[test]
    fn test_catalog_error_converts() {
        let err: KeywordError = CatalogError::Query("bad filter".to_string()).into();
        assert!(matches!(err, KeywordError::Catalog(_)));
        assert_eq!(err.to_string(), "query error: bad filter");
    }

    #[test]
    fn test_catalog_error_serialization() {
        let err = CatalogError::NotFound("abc".to_string());
        let json = serde_json::to_string(&err).expect("serialize");
        let back: CatalogError = serde_json::from_str(&json).expect("deserialize");
        assert!(matches!(back, CatalogError::NotFound(id) if id == "abc"));
    }
}
