use crate::domain::settings::{PaymentSettings, PaymentType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Resolves the gateway identifier for a payment method type.
///
/// Fixed lookup table; unknown method types resolve to `"unknown"` instead
/// of failing so the transaction is still recorded for audit.
pub fn gateway_for(method: PaymentType) -> &'static str {
    match method {
        PaymentType::CreditCard | PaymentType::DebitCard => "card_processor",
        PaymentType::MobileMoney => "mobile_money",
        PaymentType::BankTransfer => "bank_transfer",
        PaymentType::Cash => "cash_desk",
        PaymentType::Unknown => "unknown",
    }
}

/// Bank account details attached to the bank-transfer method entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
}

/// Verification and cap configuration for a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    pub requires_manual_verification: bool,
    pub auto_approve: bool,
    pub max_amount: Decimal,
    pub bank_details: Option<BankDetails>,
}

/// A payment method offered to the booking flow. Entries are a
/// deterministic projection of settings, generated on demand and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub method_type: PaymentType,
    pub display_name: String,
    pub icon: String,
    pub enabled: bool,
    pub config: MethodConfig,
}

// The per-type caps and flags below are existing domain knowledge shared
// with receipts and booking limits; changing them breaks compatibility.
const METHOD_TABLE: [(PaymentType, &str, &str, bool, bool); 5] = [
    (PaymentType::CreditCard, "Credit Card", "credit-card", true, false),
    (PaymentType::DebitCard, "Debit Card", "credit-card", true, false),
    (PaymentType::MobileMoney, "Mobile Money", "smartphone", true, false),
    (PaymentType::BankTransfer, "Bank Transfer", "landmark", false, true),
    (PaymentType::Cash, "Cash", "banknote", false, true),
];

fn max_amount_for(method: PaymentType) -> Decimal {
    match method {
        PaymentType::CreditCard | PaymentType::DebitCard => dec!(50000),
        PaymentType::MobileMoney => dec!(100000),
        PaymentType::BankTransfer => dec!(1000000),
        PaymentType::Cash => dec!(50000),
        PaymentType::Unknown => Decimal::ZERO,
    }
}

/// Produces the payment method catalog for the given settings.
///
/// Pure function, no I/O. Ordering follows the fixed table, not any sort.
pub fn list_methods(settings: &PaymentSettings) -> Vec<PaymentMethod> {
    METHOD_TABLE
        .iter()
        .map(|&(method_type, display_name, icon, auto_approve, manual)| PaymentMethod {
            id: format!("pm_{method_type}"),
            method_type,
            display_name: display_name.to_string(),
            icon: icon.to_string(),
            enabled: settings.enabled_methods.contains(&method_type),
            config: MethodConfig {
                requires_manual_verification: manual,
                auto_approve,
                max_amount: max_amount_for(method_type),
                bank_details: (method_type == PaymentType::BankTransfer).then(|| BankDetails {
                    bank_name: "First Meridian Bank".to_string(),
                    account_name: "BookPay Travel Ltd".to_string(),
                    account_number: "0044-2210-8873".to_string(),
                }),
            },
        })
        .collect()
}
