use crate::domain::ports::{SettingsStore, TransactionStore};
use crate::domain::settings::PaymentSettings;
use crate::domain::transaction::{PaymentStatus, PaymentTransaction};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for transaction records.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for the single settings record.
pub const CF_SETTINGS: &str = "settings";

const SETTINGS_KEY: &[u8] = b"payment_settings";

/// A persistent store implementation using RocksDB.
///
/// Transactions and settings live in separate Column Families with
/// JSON-encoded values; the JSON field names are the compatibility
/// contract for external audit tooling. This struct is thread-safe
/// (`Clone` shares the underlying `Arc<DB>`). Version checks on `update`
/// are read-then-write and rely on the single-writer-per-id discipline.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    /// Opens or creates a RocksDB instance at the specified path, making
    /// sure the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let cf_settings = ColumnFamilyDescriptor::new(CF_SETTINGS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions, cf_settings])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PaymentError::Storage(format!("column family {name} not found")))
    }

    fn read_transaction(&self, id: &str) -> Result<Option<PaymentTransaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_transaction(&self, tx: &PaymentTransaction) -> Result<()> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let value = serde_json::to_vec(tx)?;
        self.db.put_cf(cf, tx.id.as_bytes(), value)?;
        Ok(())
    }

    fn scan_transactions(
        &self,
        mut keep: impl FnMut(&PaymentTransaction) -> bool,
    ) -> Result<Vec<PaymentTransaction>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) =
                item.map_err(|e| PaymentError::Storage(format!("iteration: {e}")))?;
            let tx: PaymentTransaction = serde_json::from_slice(&value)?;
            if keep(&tx) {
                records.push(tx);
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[async_trait]
impl TransactionStore for RocksDbStore {
    async fn insert(&self, tx: PaymentTransaction) -> Result<()> {
        if self.read_transaction(&tx.id)?.is_some() {
            return Err(PaymentError::DuplicateId { id: tx.id });
        }
        self.write_transaction(&tx)
    }

    async fn update(&self, mut tx: PaymentTransaction) -> Result<PaymentTransaction> {
        let stored = self
            .read_transaction(&tx.id)?
            .ok_or_else(|| PaymentError::NotFound { id: tx.id.clone() })?;
        if stored.version != tx.version {
            return Err(PaymentError::StaleWrite {
                id: tx.id,
                stored: stored.version,
                submitted: tx.version,
            });
        }
        tx.version += 1;
        self.write_transaction(&tx)?;
        Ok(tx)
    }

    async fn get(&self, id: &str) -> Result<Option<PaymentTransaction>> {
        self.read_transaction(id)
    }

    async fn list_by_status(&self, statuses: &[PaymentStatus]) -> Result<Vec<PaymentTransaction>> {
        self.scan_transactions(|tx| statuses.contains(&tx.status))
    }

    async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<PaymentTransaction>> {
        self.scan_transactions(|tx| tx.booking_id == booking_id)
    }
}

#[async_trait]
impl SettingsStore for RocksDbStore {
    async fn load(&self) -> Result<Option<PaymentSettings>> {
        let cf = self.cf(CF_SETTINGS)?;
        match self.db.get_cf(cf, SETTINGS_KEY)? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(settings) => Ok(Some(settings)),
                Err(e) => {
                    // Malformed blob: the resolver falls back to defaults.
                    tracing::warn!(error = %e, "persisted payment settings are malformed");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, settings: PaymentSettings) -> Result<()> {
        let cf = self.cf(CF_SETTINGS)?;
        let value = serde_json::to_vec(&settings)?;
        self.db.put_cf(cf, SETTINGS_KEY, value)?;
        Ok(())
    }
}
