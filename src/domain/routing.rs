use crate::domain::settings::{PaymentSettings, ProcessingMode};
use crate::domain::transaction::VerificationMethod;
use rust_decimal::Decimal;

/// Classifies an amount under the current settings.
///
/// Total function: `automatic` and `manual` processing modes override
/// unconditionally; in hybrid mode the thresholds carve three bands.
/// Boundary values resolve to the lenient side (automatic at
/// `auto_approve_below`, manual at `require_manual_verification_above`) so
/// a boundary amount never lands in the narrower hybrid band. The
/// `Hybrid` result is a classification label; it executes the
/// manual-queue path.
pub fn route(amount: Decimal, settings: &PaymentSettings) -> VerificationMethod {
    match settings.processing_mode {
        ProcessingMode::Automatic => VerificationMethod::Automatic,
        ProcessingMode::Manual => VerificationMethod::Manual,
        ProcessingMode::Hybrid => {
            if amount <= settings.auto_approve_below {
                VerificationMethod::Automatic
            } else if amount >= settings.require_manual_verification_above {
                VerificationMethod::Manual
            } else {
                VerificationMethod::Hybrid
            }
        }
    }
}
