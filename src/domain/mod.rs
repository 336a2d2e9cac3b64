// ============================================================================
// Domain Layer - Shipment Lifecycle Types
// ============================================================================
//
// Everything shipment-specific the connector owns, keyed by the host
// order id:
// - Pickup point snapshots
// - The carrier status state machine
// - Per-order shipment records and the append-only status history
// - Tracking number and label text formatting
//
// The host order system owns order identity and lifecycle; those types
// live in `crate::host`.
//
// ============================================================================

pub mod shipment;
pub mod status;

pub use shipment::{
    format_label_text, format_tracking_number, generate_tracking_number, PickupPoint,
    ShipmentRecord, StatusHistoryEntry,
};
pub use status::CarrierStatus;
