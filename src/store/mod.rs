use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CarrierStatus, PickupPoint, ShipmentRecord, StatusHistoryEntry};

pub mod memory;

pub use memory::InMemoryShipmentStore;

// ============================================================================
// Shipment Store
// ============================================================================
//
// Persisted per-order shipment state plus the append-only status
// history. Every mutation is individually idempotent, which is what
// makes the registrar and reconciler safe to race or double-fire.
//
// ============================================================================

#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn get(&self, order_id: Uuid) -> Option<ShipmentRecord>;

    /// Attach (or replace) the selected pickup point for an order and
    /// cache the derived label text.
    async fn upsert_point(&self, order_id: Uuid, point: PickupPoint);

    /// Allocate a tracking number for the order. Idempotent: if one
    /// already exists it is returned unchanged and nothing is mutated.
    async fn assign_tracking_number(&self, order_id: Uuid, order_number: &str) -> String;

    /// Flag the shipment as registered with the carrier. Set once;
    /// repeated calls are no-ops.
    async fn mark_label_generated(&self, order_id: Uuid);

    /// Record an observed carrier status. Appends a history entry iff
    /// the status is a forward step from the last known one; unchanged
    /// or backward statuses, and anything after a terminal status, are
    /// silently ignored. Returns whether an entry was appended.
    async fn record_status(&self, order_id: Uuid, status: CarrierStatus) -> bool;

    /// Status history for an order, most recent first.
    async fn history(&self, order_id: Uuid) -> Vec<StatusHistoryEntry>;

    /// Shipments the reconciler still needs to poll: tracking number
    /// assigned, no terminal status recorded.
    async fn open_shipments(&self) -> Vec<ShipmentRecord>;
}
