use crate::domain::ports::{ChargeOutcome, ChargeRequest, PaymentGateway};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use uuid::Uuid;

/// Stand-in for the external gateway collaborator.
///
/// Approves every charge with a fresh reference, or declines every charge
/// with a fixed reason. Real gateway protocols are outside the engine;
/// this adapter exists for the CLI and for tests.
pub struct SimulatedGateway {
    decline_reason: Option<String>,
}

impl SimulatedGateway {
    pub fn approving() -> Self {
        Self {
            decline_reason: None,
        }
    }

    pub fn declining(reason: &str) -> Self {
        Self {
            decline_reason: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeOutcome> {
        match &self.decline_reason {
            Some(reason) => Err(PaymentError::GatewayFailure {
                gateway: request.method.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(ChargeOutcome {
                reference: format!("sim-{}", Uuid::new_v4()),
            }),
        }
    }
}
