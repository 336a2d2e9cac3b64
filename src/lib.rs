// ============================================================================
// PUDO Connector
// ============================================================================
//
// Pickup/drop-off carrier integration for commerce platforms: point
// search at checkout, idempotent shipment registration, and a polling
// reconciler that folds carrier status back into the host order.
//
// The host supplies its order repository and access control through the
// traits in `host`; everything else is assembled by `PudoConnector`.
//
// ============================================================================

pub mod api;
pub mod checkout;
pub mod config;
pub mod connector;
pub mod domain;
pub mod host;
pub mod shipping;
pub mod store;
pub mod utils;

pub use api::{ApiError, CarrierClient, CarrierTransport, HttpTransport};
pub use checkout::{CheckoutService, PointSearchResult};
pub use config::{Environment, NotificationPreference, PudoConfig};
pub use connector::{PudoConnector, TrackingInfo};
pub use domain::{CarrierStatus, PickupPoint, ShipmentRecord, StatusHistoryEntry};
pub use host::{AccessControl, HostOrder, OrderRepository, OrderStatus};
pub use shipping::{ReconcileSummary, RegistrationError, ShipmentRegistrar, StatusReconciler};
pub use store::{InMemoryShipmentStore, ShipmentStore};
