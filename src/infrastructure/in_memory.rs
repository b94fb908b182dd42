use crate::domain::ports::{SettingsStore, TransactionStore};
use crate::domain::settings::PaymentSettings;
use crate::domain::transaction::{PaymentStatus, PaymentTransaction};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory transaction store.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentTransaction>>>` for shared
/// concurrent access. Used by tests and single-shot CLI runs where
/// persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<HashMap<String, PaymentTransaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn most_recent_first(mut records: Vec<PaymentTransaction>) -> Vec<PaymentTransaction> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, tx: PaymentTransaction) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&tx.id) {
            return Err(PaymentError::DuplicateId { id: tx.id });
        }
        records.insert(tx.id.clone(), tx);
        Ok(())
    }

    async fn update(&self, mut tx: PaymentTransaction) -> Result<PaymentTransaction> {
        let mut records = self.records.write().await;
        let stored = records
            .get(&tx.id)
            .ok_or_else(|| PaymentError::NotFound { id: tx.id.clone() })?;
        if stored.version != tx.version {
            return Err(PaymentError::StaleWrite {
                id: tx.id,
                stored: stored.version,
                submitted: tx.version,
            });
        }
        tx.version += 1;
        records.insert(tx.id.clone(), tx.clone());
        Ok(tx)
    }

    async fn get(&self, id: &str) -> Result<Option<PaymentTransaction>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn list_by_status(&self, statuses: &[PaymentStatus]) -> Result<Vec<PaymentTransaction>> {
        let records = self.records.read().await;
        Ok(most_recent_first(
            records
                .values()
                .filter(|tx| statuses.contains(&tx.status))
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<PaymentTransaction>> {
        let records = self.records.read().await;
        Ok(most_recent_first(
            records
                .values()
                .filter(|tx| tx.booking_id == booking_id)
                .cloned()
                .collect(),
        ))
    }
}

/// In-memory store for the single settings record.
#[derive(Default, Clone)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<Option<PaymentSettings>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `settings`, for tests.
    pub fn with(settings: PaymentSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Some(settings))),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<Option<PaymentSettings>> {
        let settings = self.settings.read().await;
        Ok(settings.clone())
    }

    async fn save(&self, new: PaymentSettings) -> Result<()> {
        let mut settings = self.settings.write().await;
        *settings = Some(new);
        Ok(())
    }
}
