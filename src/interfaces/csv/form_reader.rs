use crate::domain::money::Amount;
use crate::domain::settings::PaymentType;
use crate::domain::transaction::PaymentForm;
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One payment submission parsed from a batch file.
#[derive(Debug, Clone)]
pub struct Submission {
    pub form: PaymentForm,
    pub booking_id: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct FormRecord {
    amount: Decimal,
    currency: String,
    method: PaymentType,
    booking: String,
    user: String,
    note: Option<String>,
}

impl TryFrom<FormRecord> for Submission {
    type Error = PaymentError;

    fn try_from(record: FormRecord) -> Result<Self> {
        let mut metadata = HashMap::new();
        if let Some(note) = record.note
            && !note.is_empty()
        {
            metadata.insert("note".to_string(), note);
        }
        Ok(Submission {
            form: PaymentForm {
                amount: Amount::try_from(record.amount)?,
                currency: record.currency,
                method: record.method,
                metadata,
            },
            booking_id: record.booking,
            user_id: record.user,
        })
    }
}

/// Reads payment submissions from a CSV source.
///
/// Wraps `csv::Reader` and provides a streaming iterator over
/// `Result<Submission>`, trimming whitespace and tolerating missing
/// trailing fields.
pub struct FormReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> FormReader<R> {
    /// Creates a new `FormReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and converts submissions, one row at a time.
    pub fn submissions(self) -> impl Iterator<Item = Result<Submission>> {
        self.reader.into_deserialize().map(|row| {
            row.map_err(PaymentError::from)
                .and_then(|record: FormRecord| Submission::try_from(record))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = "amount, currency, method, booking, user, note\n\
                    500, USD, credit_card, bk-1, usr-1, window seat\n\
                    15000, USD, bank_transfer, bk-2, usr-2,";
        let reader = FormReader::new(data.as_bytes());
        let rows: Vec<Result<Submission>> = reader.submissions().collect();

        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.form.amount.value(), dec!(500));
        assert_eq!(first.form.method, PaymentType::CreditCard);
        assert_eq!(first.booking_id, "bk-1");
        assert_eq!(first.form.metadata.get("note").unwrap(), "window seat");

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.form.method, PaymentType::BankTransfer);
        assert!(second.form.metadata.is_empty());
    }

    #[test]
    fn test_unrecognized_method_becomes_unknown() {
        let data = "amount, currency, method, booking, user, note\n\
                    100, USD, crypto, bk-1, usr-1,";
        let reader = FormReader::new(data.as_bytes());
        let rows: Vec<Result<Submission>> = reader.submissions().collect();
        assert_eq!(rows[0].as_ref().unwrap().form.method, PaymentType::Unknown);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let data = "amount, currency, method, booking, user, note\n\
                    0, USD, cash, bk-1, usr-1,";
        let reader = FormReader::new(data.as_bytes());
        let rows: Vec<Result<Submission>> = reader.submissions().collect();
        assert!(rows[0].is_err());
    }
}
