use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    MobileMoney,
    BankTransfer,
    Cash,
    /// Catch-all for method strings this engine does not know. The
    /// transaction is still recorded for audit; its gateway resolves to
    /// `"unknown"` and no processor exists for it.
    Unknown,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "credit_card",
            PaymentType::DebitCard => "debit_card",
            PaymentType::MobileMoney => "mobile_money",
            PaymentType::BankTransfer => "bank_transfer",
            PaymentType::Cash => "cash",
            PaymentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PaymentType {
    fn from(s: &str) -> Self {
        match s {
            "credit_card" => PaymentType::CreditCard,
            "debit_card" => PaymentType::DebitCard,
            "mobile_money" => PaymentType::MobileMoney,
            "bank_transfer" => PaymentType::BankTransfer,
            "cash" => PaymentType::Cash,
            _ => PaymentType::Unknown,
        }
    }
}

impl From<String> for PaymentType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Process-wide execution policy for new transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Automatic,
    Manual,
    Hybrid,
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::Automatic => f.write_str("automatic"),
            ProcessingMode::Manual => f.write_str("manual"),
            ProcessingMode::Hybrid => f.write_str("hybrid"),
        }
    }
}

impl std::str::FromStr for ProcessingMode {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "automatic" => Ok(ProcessingMode::Automatic),
            "manual" => Ok(ProcessingMode::Manual),
            "hybrid" => Ok(ProcessingMode::Hybrid),
            other => Err(PaymentError::Configuration(format!(
                "unknown processing mode '{other}'"
            ))),
        }
    }
}

/// Notification preferences. Pass-through data: persisted and returned to
/// callers, never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub notify_on_submission: bool,
    pub notify_on_verification: bool,
    pub notification_email: Option<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            notify_on_submission: true,
            notify_on_verification: true,
            notification_email: None,
        }
    }
}

/// Company profile rendered into receipt headers. Pass-through data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub contact: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "BookPay Travel".to_string(),
            address: "1 Harbour Road".to_string(),
            contact: "support@bookpay.example".to_string(),
        }
    }
}

/// Process-wide payment configuration, loaded once and mutable via admin
/// action. Threshold amounts are expressed in the platform's base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub enabled_methods: BTreeSet<PaymentType>,
    pub default_method: PaymentType,
    pub processing_mode: ProcessingMode,
    /// Amounts <= this always route to automatic handling in hybrid mode.
    pub auto_approve_below: Decimal,
    /// Amounts >= this always route to manual review in hybrid mode.
    pub require_manual_verification_above: Decimal,
    pub max_transaction_amount: Decimal,
    pub max_daily_amount: Decimal,
    pub notifications: NotificationSettings,
    pub company: CompanyProfile,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            enabled_methods: BTreeSet::from([
                PaymentType::CreditCard,
                PaymentType::DebitCard,
                PaymentType::MobileMoney,
                PaymentType::BankTransfer,
                PaymentType::Cash,
            ]),
            default_method: PaymentType::CreditCard,
            processing_mode: ProcessingMode::Hybrid,
            auto_approve_below: dec!(1000),
            require_manual_verification_above: dec!(10000),
            max_transaction_amount: dec!(1000000),
            max_daily_amount: dec!(5000000),
            notifications: NotificationSettings::default(),
            company: CompanyProfile::default(),
        }
    }
}

impl PaymentSettings {
    /// Checks the configuration invariants. Called before persisting an
    /// update so invalid thresholds never reach the router.
    pub fn validate(&self) -> Result<()> {
        if self.auto_approve_below.is_sign_negative()
            || self.require_manual_verification_above.is_sign_negative()
        {
            return Err(PaymentError::Configuration(
                "thresholds must not be negative".to_string(),
            ));
        }
        if self.auto_approve_below > self.require_manual_verification_above {
            return Err(PaymentError::Configuration(format!(
                "auto_approve_below ({}) exceeds require_manual_verification_above ({})",
                self.auto_approve_below, self.require_manual_verification_above
            )));
        }
        if self.max_transaction_amount <= Decimal::ZERO {
            return Err(PaymentError::Configuration(
                "max_transaction_amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial settings update. The merge is shallow: a present field replaces
/// the whole top-level value, so nested objects must be supplied complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub enabled_methods: Option<BTreeSet<PaymentType>>,
    pub default_method: Option<PaymentType>,
    pub processing_mode: Option<ProcessingMode>,
    pub auto_approve_below: Option<Decimal>,
    pub require_manual_verification_above: Option<Decimal>,
    pub max_transaction_amount: Option<Decimal>,
    pub max_daily_amount: Option<Decimal>,
    pub notifications: Option<NotificationSettings>,
    pub company: Option<CompanyProfile>,
}

impl SettingsUpdate {
    pub fn apply(self, mut settings: PaymentSettings) -> PaymentSettings {
        if let Some(v) = self.enabled_methods {
            settings.enabled_methods = v;
        }
        if let Some(v) = self.default_method {
            settings.default_method = v;
        }
        if let Some(v) = self.processing_mode {
            settings.processing_mode = v;
        }
        if let Some(v) = self.auto_approve_below {
            settings.auto_approve_below = v;
        }
        if let Some(v) = self.require_manual_verification_above {
            settings.require_manual_verification_above = v;
        }
        if let Some(v) = self.max_transaction_amount {
            settings.max_transaction_amount = v;
        }
        if let Some(v) = self.max_daily_amount {
            settings.max_daily_amount = v;
        }
        if let Some(v) = self.notifications {
            settings.notifications = v;
        }
        if let Some(v) = self.company {
            settings.company = v;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_deserialization() {
        let parsed: PaymentType = serde_json::from_str("\"crypto_wallet\"").unwrap();
        assert_eq!(parsed, PaymentType::Unknown);

        let parsed: PaymentType = serde_json::from_str("\"bank_transfer\"").unwrap();
        assert_eq!(parsed, PaymentType::BankTransfer);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let settings = PaymentSettings {
            auto_approve_below: dec!(20000),
            require_manual_verification_above: dec!(10000),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(PaymentError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_accepts_equal_thresholds() {
        let settings = PaymentSettings {
            auto_approve_below: dec!(5000),
            require_manual_verification_above: dec!(5000),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_shallow_merge_replaces_whole_fields() {
        let update = SettingsUpdate {
            processing_mode: Some(ProcessingMode::Manual),
            company: Some(CompanyProfile {
                name: "Island Hoppers".to_string(),
                address: String::new(),
                contact: String::new(),
            }),
            ..Default::default()
        };

        let merged = update.apply(PaymentSettings::default());
        assert_eq!(merged.processing_mode, ProcessingMode::Manual);
        // The whole nested object is replaced, not deep-merged.
        assert_eq!(merged.company.name, "Island Hoppers");
        assert_eq!(merged.company.address, "");
        // Untouched fields keep their previous values.
        assert_eq!(merged.auto_approve_below, dec!(1000));
    }
}
