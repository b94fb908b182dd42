use crate::domain::settings::CompanyProfile;
use crate::domain::transaction::PaymentTransaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rendered receipt document for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Reference stored back on the transaction's `receipt_url`.
    pub reference: String,
    pub transaction_id: String,
    pub issued_at: DateTime<Utc>,
    pub document: String,
}

/// Renders a receipt from the transaction snapshot and the company profile
/// carried in settings. Pure; attaching the reference to the record is the
/// engine's job.
pub fn render(tx: &PaymentTransaction, company: &CompanyProfile) -> Receipt {
    let issued_at = Utc::now();
    let document = format!(
        "{name}\n{address}\n{contact}\n\n\
         RECEIPT {id}\n\
         Date:      {date}\n\
         Booking:   {booking}\n\
         Method:    {method}\n\
         Status:    {status}\n\
         Amount:    {amount} {currency}\n",
        name = company.name,
        address = company.address,
        contact = company.contact,
        id = tx.id,
        date = tx.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        booking = tx.booking_id,
        method = tx.payment_method,
        status = tx.status,
        amount = tx.amount,
        currency = tx.currency,
    );

    Receipt {
        reference: format!("receipts/{}", tx.id),
        transaction_id: tx.id.clone(),
        issued_at,
        document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::domain::settings::PaymentType;
    use crate::domain::transaction::{PaymentForm, VerificationMethod};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_render_contains_snapshot_fields() {
        let form = PaymentForm {
            amount: Amount::new(dec!(1250.50)).unwrap(),
            currency: "USD".to_string(),
            method: PaymentType::BankTransfer,
            metadata: HashMap::new(),
        };
        let tx = PaymentTransaction::new(form, "bk-77", "usr-9", VerificationMethod::Manual);
        let company = CompanyProfile {
            name: "Island Hoppers".to_string(),
            address: "2 Quay Street".to_string(),
            contact: "ops@islandhoppers.example".to_string(),
        };

        let receipt = render(&tx, &company);
        assert_eq!(receipt.reference, format!("receipts/{}", tx.id));
        assert_eq!(receipt.transaction_id, tx.id);
        assert!(receipt.document.contains("Island Hoppers"));
        assert!(receipt.document.contains(&tx.id));
        assert!(receipt.document.contains("bk-77"));
        assert!(receipt.document.contains("bank_transfer"));
        assert!(receipt.document.contains("1250.50 USD"));
        assert!(receipt.document.contains("pending"));
    }
}
