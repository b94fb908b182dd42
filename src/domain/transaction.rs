use crate::domain::catalog;
use crate::domain::money::Amount;
use crate::domain::settings::PaymentType;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    RequiresVerification,
    Verified,
    Declined,
    Failed,
}

impl PaymentStatus {
    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed
                | PaymentStatus::Verified
                | PaymentStatus::Declined
                | PaymentStatus::Failed
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => f.write_str("pending"),
            PaymentStatus::Completed => f.write_str("completed"),
            PaymentStatus::RequiresVerification => f.write_str("requires_verification"),
            PaymentStatus::Verified => f.write_str("verified"),
            PaymentStatus::Declined => f.write_str("declined"),
            PaymentStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Classification decided once at creation time by the router. Determines
/// which execution path the transaction takes; immutable thereafter.
/// `Hybrid` is a label for the middle band and executes the manual-queue
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Automatic,
    Manual,
    Hybrid,
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMethod::Automatic => f.write_str("automatic"),
            VerificationMethod::Manual => f.write_str("manual"),
            VerificationMethod::Hybrid => f.write_str("hybrid"),
        }
    }
}

/// A payment request as submitted by the booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentForm {
    pub amount: Amount,
    pub currency: String,
    pub method: PaymentType,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A single payment attempt tied to one booking and one user.
///
/// Created in `pending`; mutated only through the transition methods below,
/// which refresh `updated_at`. Records are never deleted; terminal states
/// are retained for audit. `version` is the optimistic-concurrency token
/// checked by the store on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub amount: Amount,
    pub currency: String,
    pub payment_method: PaymentType,
    pub gateway: String,
    pub status: PaymentStatus,
    pub verification_method: VerificationMethod,
    pub metadata: HashMap<String, String>,
    pub gateway_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub verification_notes: Option<String>,
    pub receipt_url: Option<String>,
    /// Reserved for a future automatic-retry policy; never incremented.
    pub retry_count: u32,
    pub version: u64,
}

impl PaymentTransaction {
    pub fn new(
        form: PaymentForm,
        booking_id: &str,
        user_id: &str,
        verification_method: VerificationMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            user_id: user_id.to_string(),
            amount: form.amount,
            currency: form.currency,
            payment_method: form.method,
            gateway: catalog::gateway_for(form.method).to_string(),
            status: PaymentStatus::Pending,
            verification_method,
            metadata: form.metadata,
            gateway_reference: None,
            created_at: now,
            updated_at: now,
            processed_at: None,
            verified_at: None,
            verified_by: None,
            verification_notes: None,
            receipt_url: None,
            retry_count: 0,
            version: 1,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn expect_status(&self, expected: PaymentStatus) -> Result<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(PaymentError::InvalidState {
                id: self.id.clone(),
                status: self.status,
            })
        }
    }

    /// Gateway accepted the charge on the automatic path.
    pub fn mark_completed(&mut self, gateway_reference: String) -> Result<()> {
        self.expect_status(PaymentStatus::Pending)?;
        let now = Utc::now();
        self.status = PaymentStatus::Completed;
        self.gateway_reference = Some(gateway_reference);
        self.processed_at = Some(now);
        self.verified_at = Some(now);
        self.touch();
        Ok(())
    }

    /// Gateway reported failure on the automatic path.
    pub fn mark_failed(&mut self) -> Result<()> {
        self.expect_status(PaymentStatus::Pending)?;
        self.status = PaymentStatus::Failed;
        self.touch();
        Ok(())
    }

    /// Manual or hybrid route: park the transaction in the review queue.
    pub fn mark_requires_verification(&mut self) -> Result<()> {
        self.expect_status(PaymentStatus::Pending)?;
        self.status = PaymentStatus::RequiresVerification;
        self.touch();
        Ok(())
    }

    /// Admin resolution of a queued transaction. The only path out of
    /// `requires_verification`.
    pub fn resolve_verification(
        &mut self,
        admin_id: &str,
        approved: bool,
        notes: Option<String>,
    ) -> Result<()> {
        self.expect_status(PaymentStatus::RequiresVerification)?;
        self.status = if approved {
            PaymentStatus::Verified
        } else {
            PaymentStatus::Declined
        };
        self.verified_at = Some(Utc::now());
        self.verified_by = Some(admin_id.to_string());
        self.verification_notes = notes;
        self.touch();
        Ok(())
    }

    /// Attaches (or overwrites) the receipt reference. Valid in any state;
    /// regeneration is idempotent.
    pub fn attach_receipt(&mut self, reference: String) {
        self.receipt_url = Some(reference);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form() -> PaymentForm {
        PaymentForm {
            amount: Amount::new(dec!(250)).unwrap(),
            currency: "USD".to_string(),
            method: PaymentType::CreditCard,
            metadata: HashMap::from([("card_last4".to_string(), "4242".to_string())]),
        }
    }

    #[test]
    fn test_new_transaction_is_pending() {
        let tx = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Automatic);
        assert_eq!(tx.status, PaymentStatus::Pending);
        assert_eq!(tx.gateway, "card_processor");
        assert_eq!(tx.retry_count, 0);
        assert_eq!(tx.version, 1);
        assert!(tx.processed_at.is_none());
        assert!(tx.verified_at.is_none());
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Automatic);
        let b = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Automatic);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_completed_stamps_timestamps() {
        let mut tx =
            PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Automatic);
        tx.mark_completed("gw-123".to_string()).unwrap();
        assert_eq!(tx.status, PaymentStatus::Completed);
        assert_eq!(tx.gateway_reference.as_deref(), Some("gw-123"));
        assert!(tx.processed_at.is_some());
        assert!(tx.verified_at.is_some());
    }

    #[test]
    fn test_resolution_requires_queue_state() {
        let mut tx = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Manual);
        // Still pending: resolution must fail.
        let err = tx.resolve_verification("admin1", true, None).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidState { .. }));

        tx.mark_requires_verification().unwrap();
        tx.resolve_verification("admin1", true, Some("ok".to_string()))
            .unwrap();
        assert_eq!(tx.status, PaymentStatus::Verified);
        assert_eq!(tx.verified_by.as_deref(), Some("admin1"));
        assert_eq!(tx.verification_notes.as_deref(), Some("ok"));
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        for (status, expect_terminal) in [
            (PaymentStatus::Completed, true),
            (PaymentStatus::Verified, true),
            (PaymentStatus::Declined, true),
            (PaymentStatus::Failed, true),
            (PaymentStatus::Pending, false),
            (PaymentStatus::RequiresVerification, false),
        ] {
            assert_eq!(status.is_terminal(), expect_terminal);
        }

        let mut tx = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Manual);
        tx.mark_requires_verification().unwrap();
        tx.resolve_verification("admin1", false, None).unwrap();
        assert_eq!(tx.status, PaymentStatus::Declined);

        let before = tx.clone();
        let err = tx.resolve_verification("admin2", true, None).unwrap_err();
        assert!(matches!(err, PaymentError::InvalidState { .. }));
        // Failed transition must not have mutated the record.
        assert_eq!(tx, before);
    }

    #[test]
    fn test_wire_names() {
        let tx = PaymentTransaction::new(form(), "bk-1", "usr-1", VerificationMethod::Hybrid);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["payment_method"], "credit_card");
        assert_eq!(json["verification_method"], "hybrid");
    }
}
