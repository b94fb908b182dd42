use crate::domain::ports::SettingsStoreBox;
use crate::domain::settings::{PaymentSettings, SettingsUpdate};
use crate::error::Result;

/// Resolves and updates the process-wide payment settings.
pub struct SettingsService {
    store: SettingsStoreBox,
}

impl SettingsService {
    pub fn new(store: SettingsStoreBox) -> Self {
        Self { store }
    }

    /// Returns the persisted settings, falling back to
    /// `PaymentSettings::default()` when no (readable) record exists.
    pub async fn load(&self) -> Result<PaymentSettings> {
        match self.store.load().await? {
            Some(settings) => Ok(settings),
            None => {
                tracing::debug!("no persisted payment settings, using defaults");
                Ok(PaymentSettings::default())
            }
        }
    }

    /// Shallow-merges `update` into the current settings, validates the
    /// result, persists it and returns the new value. Invalid
    /// configurations are rejected before anything is written.
    pub async fn update(&self, update: SettingsUpdate) -> Result<PaymentSettings> {
        let merged = update.apply(self.load().await?);
        merged.validate()?;
        self.store.save(merged.clone()).await?;
        tracing::info!(
            mode = %merged.processing_mode,
            auto_approve_below = %merged.auto_approve_below,
            require_manual_above = %merged.require_manual_verification_above,
            "payment settings updated"
        );
        Ok(merged)
    }
}
