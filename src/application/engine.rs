use crate::application::receipt::{self, Receipt};
use crate::application::settings::SettingsService;
use crate::domain::catalog::{self, PaymentMethod};
use crate::domain::ports::{
    ChargeRequest, PaymentGatewayBox, SettingsStoreBox, TransactionStoreBox,
};
use crate::domain::routing;
use crate::domain::transaction::{
    PaymentForm, PaymentStatus, PaymentTransaction, VerificationMethod,
};
use crate::error::{PaymentError, Result};

/// The main entry point for payment processing and verification.
///
/// `PaymentEngine` owns the settings and transaction stores plus the
/// gateway collaborator, and drives every transaction through the state
/// machine: `submit` creates the record and executes the automatic or
/// manual-queue path, `verify` resolves queued transactions, and
/// `generate_receipt` renders the final snapshot. Mutations follow the
/// single-writer-per-id discipline and re-read the record before writing.
pub struct PaymentEngine {
    settings: SettingsService,
    transactions: TransactionStoreBox,
    gateway: PaymentGatewayBox,
}

impl PaymentEngine {
    pub fn new(
        settings_store: SettingsStoreBox,
        transaction_store: TransactionStoreBox,
        gateway: PaymentGatewayBox,
    ) -> Self {
        Self {
            settings: SettingsService::new(settings_store),
            transactions: transaction_store,
            gateway,
        }
    }

    /// Settings resolver, also the `update_settings` entry point.
    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    /// The payment method catalog under the current settings.
    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        let settings = self.settings.load().await?;
        Ok(catalog::list_methods(&settings))
    }

    /// Submits a payment request for a booking.
    ///
    /// Creates a `pending` record, classifies the amount once, then drives
    /// the record to `completed`/`failed` (automatic path, gateway call) or
    /// `requires_verification` (manual and hybrid routes, no gateway call).
    /// Does not return until the record is durably in one of those states.
    /// Each call creates a fresh id; de-duplication of retried submissions
    /// belongs to the booking layer.
    pub async fn submit(
        &self,
        form: PaymentForm,
        booking_id: &str,
        user_id: &str,
    ) -> Result<PaymentTransaction> {
        let settings = self.settings.load().await?;
        let route = routing::route(form.amount.value(), &settings);
        let tx = PaymentTransaction::new(form, booking_id, user_id, route);
        self.transactions.insert(tx.clone()).await?;
        tracing::info!(
            id = %tx.id,
            booking = %tx.booking_id,
            amount = %tx.amount,
            method = %tx.payment_method,
            route = %route,
            "payment submitted"
        );

        match route {
            VerificationMethod::Automatic => self.run_automatic(tx).await,
            VerificationMethod::Manual | VerificationMethod::Hybrid => {
                let mut stored = self.reload(&tx.id).await?;
                stored.mark_requires_verification()?;
                let stored = self.transactions.update(stored).await?;
                tracing::info!(id = %stored.id, "payment queued for manual verification");
                Ok(stored)
            }
        }
    }

    async fn run_automatic(&self, tx: PaymentTransaction) -> Result<PaymentTransaction> {
        let request = ChargeRequest {
            amount: tx.amount,
            currency: tx.currency.clone(),
            method: tx.payment_method,
            metadata: tx.metadata.clone(),
        };

        match self.gateway.charge(request).await {
            Ok(outcome) => {
                let mut stored = self.reload(&tx.id).await?;
                stored.mark_completed(outcome.reference)?;
                let stored = self.transactions.update(stored).await?;
                tracing::info!(
                    id = %stored.id,
                    reference = stored.gateway_reference.as_deref().unwrap_or(""),
                    "payment completed automatically"
                );
                Ok(stored)
            }
            Err(gateway_err) => {
                let mut stored = self.reload(&tx.id).await?;
                stored.mark_failed()?;
                self.transactions.update(stored).await?;
                tracing::warn!(id = %tx.id, error = %gateway_err, "gateway charge failed");
                Err(gateway_err)
            }
        }
    }

    /// Resolves a queued transaction: approve moves it to `verified`,
    /// reject to `declined`. The only path out of `requires_verification`;
    /// anything else fails with `NotFound`/`InvalidState` and leaves the
    /// record untouched.
    pub async fn verify(
        &self,
        transaction_id: &str,
        admin_id: &str,
        approved: bool,
        notes: Option<String>,
    ) -> Result<PaymentTransaction> {
        let mut stored = self.reload(transaction_id).await?;
        stored.resolve_verification(admin_id, approved, notes)?;
        let stored = self.transactions.update(stored).await?;
        tracing::info!(
            id = %stored.id,
            admin = %admin_id,
            status = %stored.status,
            "verification resolved"
        );
        Ok(stored)
    }

    /// Admin queue: transactions awaiting processing or human review,
    /// most recent first.
    pub async fn list_pending(&self) -> Result<Vec<PaymentTransaction>> {
        self.transactions
            .list_by_status(&[PaymentStatus::Pending, PaymentStatus::RequiresVerification])
            .await
    }

    pub async fn list_by_booking(&self, booking_id: &str) -> Result<Vec<PaymentTransaction>> {
        self.transactions.list_by_booking(booking_id).await
    }

    /// Renders a receipt for the transaction and attaches its reference to
    /// the record. Idempotent: regenerating overwrites the reference
    /// without changing any other transaction state.
    pub async fn generate_receipt(&self, transaction_id: &str) -> Result<Receipt> {
        let settings = self.settings.load().await?;
        let mut stored = self.reload(transaction_id).await?;
        let receipt = receipt::render(&stored, &settings.company);
        stored.attach_receipt(receipt.reference.clone());
        self.transactions.update(stored).await?;
        Ok(receipt)
    }

    async fn reload(&self, id: &str) -> Result<PaymentTransaction> {
        self.transactions
            .get(id)
            .await?
            .ok_or_else(|| PaymentError::NotFound { id: id.to_string() })
    }
}
