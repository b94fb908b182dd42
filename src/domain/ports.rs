use crate::domain::money::Amount;
use crate::domain::settings::{PaymentSettings, PaymentType};
use crate::domain::transaction::{PaymentStatus, PaymentTransaction};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Durable mapping from transaction id to record.
///
/// The persistence medium is opaque to the engine; any durable key-value
/// mapping suffices. All operations are synchronous from the caller's
/// perspective (no partial writes observable).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a new record. Fails with `DuplicateId` if the id exists;
    /// the original record is left untouched.
    async fn insert(&self, tx: PaymentTransaction) -> Result<()>;

    /// Replaces the full record. Fails with `NotFound` if the id does not
    /// exist and with `StaleWrite` if the submitted version does not match
    /// the stored one. On success the stored version is bumped and the
    /// stored record returned.
    async fn update(&self, tx: PaymentTransaction) -> Result<PaymentTransaction>;

    async fn get(&self, id: &str) -> Result<Option<PaymentTransaction>>;

    /// All records whose status is in `statuses`, most-recent-`created_at`
    /// first.
    async fn list_by_status(&self, statuses: &[PaymentStatus]) -> Result<Vec<PaymentTransaction>>;

    /// All records for a booking, most-recent-`created_at` first.
    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<PaymentTransaction>>;
}

/// Storage for the single process-wide settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the persisted settings, or `None` when absent. A malformed
    /// blob is reported as absent; the resolver falls back to defaults.
    async fn load(&self) -> Result<Option<PaymentSettings>>;

    async fn save(&self, settings: PaymentSettings) -> Result<()>;
}

/// Charge request handed to the external gateway collaborator.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount: Amount,
    pub currency: String,
    pub method: PaymentType,
    pub metadata: HashMap<String, String>,
}

/// Opaque successful outcome from the gateway.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub reference: String,
}

/// External payment-processing collaborator. Not implemented by this
/// engine; the automatic path only needs a success/failure outcome and an
/// opaque reference string.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeOutcome>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type SettingsStoreBox = Box<dyn SettingsStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
