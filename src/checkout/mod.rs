//! Complete-appointment checkout: steps, selections, pricing, and the wizard.

pub mod pricing;
pub mod selection;
pub mod state;
pub mod step;
pub mod wizard;

pub use pricing::{CurrencyFormat, CurrencyFormatter, DiscountSpec, DiscountValue, PriceBreakdown};
pub use selection::SelectionSet;
pub use state::CheckoutState;
pub use step::CheckoutStep;
pub use wizard::{CheckoutSettings, CheckoutWizard, payment_method_label};
