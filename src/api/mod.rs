// ============================================================================
// Carrier API Layer
// ============================================================================
//
// Stateless client for the carrier's remote procedures:
// - transport: the HTTP seam (reqwest behind a trait)
// - types: wire DTOs and request validation
// - errors: the normalized failure taxonomy
// - client: credential/default injection and error reporting
//
// ============================================================================

pub mod client;
pub mod errors;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::CarrierClient;
pub use errors::ApiError;
pub use transport::{CarrierTransport, HttpTransport, REQUEST_TIMEOUT};
pub use types::{PlaceShipmentRequest, SearchOverrides, ShipmentConfirmation};
