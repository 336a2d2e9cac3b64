pub mod reconciler;
pub mod registrar;

pub use reconciler::{ReconcileSummary, StatusReconciler};
pub use registrar::{RegistrationError, ShipmentRegistrar};
