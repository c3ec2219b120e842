//! Signal probe and sink traits with mockall annotations for testing
//!
//! The controller never touches the page directly. Each signal it combines
//! is read through one of these probes, and the decision is written through
//! [`ProceedControl`], so the evaluator can be exercised against in-memory
//! fakes.

use async_trait::async_trait;
use shared::FormState;

use crate::error::ReadinessResult;

/// Shipping form probe
#[mockall::automock]
pub trait FormProbe: Send + Sync {
    /// Constraint validity of every required element in the shipping container
    fn required_fields_valid(&self) -> bool;

    /// Required fields of the shipping form, or `None` when the form is absent
    fn shipping_form(&self) -> Option<FormState>;
}

/// Payment method selection probe
#[mockall::automock]
pub trait PaymentProbe: Send + Sync {
    fn payment_selected(&self) -> bool;
}

/// Cart line selection probe
#[mockall::automock]
pub trait ItemProbe: Send + Sync {
    fn items_checked(&self) -> bool;
}

/// Remote shipping quotation probe
///
/// Implementations report whether the server holds a quotation for the
/// current session. Transport failures are returned as errors; the
/// controller folds them into "no quotation".
#[mockall::automock]
#[async_trait]
pub trait QuotationProbe: Send + Sync {
    async fn quotation_exists(&self) -> ReadinessResult<bool>;
}

/// Sink for the readiness decision
#[mockall::automock]
pub trait ProceedControl: Send + Sync {
    /// Set the proceed control's disabled state. Fails with
    /// `MissingElement` when the control is absent from the page.
    fn set_disabled(&self, disabled: bool) -> ReadinessResult<()>;
}
