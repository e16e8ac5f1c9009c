//! Error types
//!
//! `StoreError` describes what went wrong at the document store.
//! `DeskError` is what callers see after a failure has been classified for
//! the path it happened on (public read, admin read, write).

use thiserror::Error;

/// Document store failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Caller is not allowed to perform the read or write
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Transport failure before a response was received
    #[error("network error: {0}")]
    Network(String),

    /// Target document does not exist
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Precondition on the stored document did not hold
    #[error("conflicting write on {collection}/{id}")]
    Conflict { collection: String, id: String },

    /// Backend answered with an error
    #[error("backend error: {0}")]
    Backend(String),

    /// Document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Classified failure as seen by the search session, detail pages and the
/// admin dashboard
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeskError {
    /// Public read was refused; recovered with sample data
    #[error("listings unavailable: {0}")]
    Unavailable(String),

    /// Read failed; shown as a non-fatal banner
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Create, update or delete failed; reported to the initiating action
    #[error("{operation} failed: {message}")]
    WriteFailed {
        operation: &'static str,
        message: String,
    },

    /// Lookup by id missed
    #[error("not found: {0}")]
    NotFound(String),

    /// Payload breaks a write-path invariant
    #[error("invalid input: {0}")]
    Validation(String),

    /// Record changed since the caller last read it
    #[error("{0} was modified by someone else; reload and try again")]
    Conflict(String),
}

impl DeskError {
    /// Classify a failed public read. Only permission-denied degrades to
    /// sample data; everything else becomes a retryable banner.
    pub fn from_public_read(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(msg) => DeskError::Unavailable(msg),
            other => DeskError::QueryFailed(other.to_string()),
        }
    }

    /// Classify a failed admin read. Operators always see the failure.
    pub fn from_admin_read(err: StoreError) -> Self {
        DeskError::QueryFailed(err.to_string())
    }

    /// Classify a failed write.
    pub fn from_write(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Conflict { collection, id } => {
                DeskError::Conflict(format!("{collection}/{id}"))
            }
            StoreError::NotFound { collection, id } => {
                DeskError::NotFound(format!("{collection}/{id}"))
            }
            other => DeskError::WriteFailed {
                operation,
                message: other.to_string(),
            },
        }
    }

    /// Whether trying the same read again may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeskError::QueryFailed(_))
    }

    /// Message for the end user. Public pages never show backend detail.
    pub fn banner(&self) -> String {
        match self {
            DeskError::Unavailable(_) | DeskError::QueryFailed(_) => {
                "Listings are temporarily unavailable. Please try again in a moment.".to_string()
            }
            DeskError::NotFound(_) => "Listing not found.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_read_classification() {
        assert!(matches!(
            DeskError::from_public_read(StoreError::PermissionDenied("rules".into())),
            DeskError::Unavailable(_)
        ));
        let network = DeskError::from_public_read(StoreError::Network("reset".into()));
        assert!(matches!(network, DeskError::QueryFailed(_)));
        assert!(network.is_retryable());
    }

    #[test]
    fn test_admin_read_never_degrades() {
        let err = DeskError::from_admin_read(StoreError::PermissionDenied("rules".into()));
        assert!(matches!(err, DeskError::QueryFailed(_)));
    }

    #[test]
    fn test_write_classification_keeps_operation_name() {
        let err = DeskError::from_write("delete", StoreError::Backend("boom".into()));
        assert_eq!(err.to_string(), "delete failed: backend error: boom");

        let conflict = DeskError::from_write(
            "update",
            StoreError::Conflict {
                collection: "listings".into(),
                id: "a".into(),
            },
        );
        assert!(matches!(conflict, DeskError::Conflict(_)));
    }
}
