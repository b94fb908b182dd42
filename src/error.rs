use crate::domain::transaction::PaymentStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Error taxonomy of the payment engine.
///
/// Every failure is surfaced synchronously to the caller; nothing is
/// recovered with a fallback value. The only documented fallback is the
/// Settings Resolver returning defaults for an absent settings blob.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Settings are malformed or inconsistent (e.g. thresholds out of
    /// order). Rejected at update time, never allowed to reach the router.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A submitted value failed domain validation (e.g. a non-positive
    /// amount).
    #[error("validation error: {0}")]
    Validation(String),

    /// A transaction with this id already exists in the store.
    #[error("transaction {id} already exists")]
    DuplicateId { id: String },

    /// No transaction with this id exists.
    #[error("transaction {id} not found")]
    NotFound { id: String },

    /// The operation is not valid for the transaction's current status.
    #[error("transaction {id} is {status} and cannot transition")]
    InvalidState { id: String, status: PaymentStatus },

    /// The record changed since it was read; the write was rejected.
    #[error("stale write on transaction {id}: stored version {stored}, submitted version {submitted}")]
    StaleWrite {
        id: String,
        stored: u64,
        submitted: u64,
    },

    /// The external gateway collaborator reported failure.
    #[error("gateway {gateway} declined the charge: {reason}")]
    GatewayFailure { gateway: String, reason: String },

    /// Storage adapter fault (corrupt value, backend error).
    #[error("storage error: {0}")]
    Storage(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PaymentError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(format!("serialization: {e}"))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PaymentError::NotFound {
            id: "tx-1".to_string(),
        };
        assert_eq!(err.to_string(), "transaction tx-1 not found");

        let err = PaymentError::InvalidState {
            id: "tx-1".to_string(),
            status: PaymentStatus::Completed,
        };
        assert_eq!(
            err.to_string(),
            "transaction tx-1 is completed and cannot transition"
        );

        let err = PaymentError::StaleWrite {
            id: "tx-1".to_string(),
            stored: 3,
            submitted: 2,
        };
        assert_eq!(
            err.to_string(),
            "stale write on transaction tx-1: stored version 3, submitted version 2"
        );
    }
}
