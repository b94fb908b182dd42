use crate::domain::transaction::PaymentTransaction;
use crate::error::Result;
use std::io::Write;

/// Writes transaction records as CSV, one row per transaction.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions(&mut self, transactions: &[PaymentTransaction]) -> Result<()> {
        self.writer.write_record([
            "id",
            "booking",
            "user",
            "amount",
            "currency",
            "method",
            "gateway",
            "status",
            "verification",
            "created_at",
        ])?;
        for tx in transactions {
            self.writer.write_record([
                tx.id.clone(),
                tx.booking_id.clone(),
                tx.user_id.clone(),
                tx.amount.to_string(),
                tx.currency.clone(),
                tx.payment_method.to_string(),
                tx.gateway.clone(),
                tx.status.to_string(),
                tx.verification_method.to_string(),
                tx.created_at.to_rfc3339(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
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
    fn test_writer_output() {
        let tx = PaymentTransaction::new(
            PaymentForm {
                amount: Amount::new(dec!(500)).unwrap(),
                currency: "USD".to_string(),
                method: PaymentType::MobileMoney,
                metadata: HashMap::new(),
            },
            "bk-1",
            "usr-1",
            VerificationMethod::Automatic,
        );

        let mut buffer = Vec::new();
        TransactionWriter::new(&mut buffer)
            .write_transactions(std::slice::from_ref(&tx))
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,booking,user,amount,currency,method,gateway,status,verification,created_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(&tx.id));
        assert!(row.contains("bk-1,usr-1,500,USD,mobile_money,mobile_money,pending,automatic"));
    }
}
