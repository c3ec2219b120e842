//! Checkout readiness controller
//!
//! Recomputes whether the cart page's "proceed to checkout" control may be
//! enabled from the shipping form, the payment selection, the checked cart
//! lines and a server-confirmed shipping quotation. The page is only read
//! through the probe traits in [`traits`], so the in-memory [`page::Page`],
//! a real DOM binding, or mocks can stand behind the controller.

pub mod config;
pub mod controller;
pub mod error;
pub mod page;
pub mod services;
pub mod state;
pub mod subscriptions;
pub mod traits;

// Re-export commonly used types
pub use config::{ControllerConfig, OrderingPolicy, PageSelectors, QuotationEndpoint};
pub use controller::ReadinessController;
pub use error::{ReadinessError, ReadinessResult};
pub use page::{Element, ElementKind, Page, PageAction, SharedPage};
pub use state::{ControllerState, EvaluationStats};
pub use subscriptions::Subscription;
pub use traits::{FormProbe, ItemProbe, PaymentProbe, ProceedControl, QuotationProbe};
