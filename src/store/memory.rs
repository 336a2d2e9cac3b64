use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ShipmentStore;
use crate::domain::{
    format_label_text, generate_tracking_number, CarrierStatus, PickupPoint, ShipmentRecord,
    StatusHistoryEntry,
};

// ============================================================================
// In-Memory Shipment Store
// ============================================================================
//
// Reference implementation backing tests and the demo binary. A
// database-backed implementation only needs to satisfy the same trait
// contract; the idempotence rules live here, not in callers.
//
// ============================================================================

/// Attempts at producing an unused tracking number before accepting the
/// last candidate anyway.
const TRACKING_NUMBER_ATTEMPTS: u32 = 5;

#[derive(Default)]
struct StoreInner {
    records: HashMap<Uuid, ShipmentRecord>,
    history: HashMap<Uuid, Vec<StatusHistoryEntry>>,
    issued_numbers: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryShipmentStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryShipmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShipmentStore for InMemoryShipmentStore {
    async fn get(&self, order_id: Uuid) -> Option<ShipmentRecord> {
        self.inner.read().await.records.get(&order_id).cloned()
    }

    async fn upsert_point(&self, order_id: Uuid, point: PickupPoint) {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .entry(order_id)
            .or_insert_with(|| ShipmentRecord::new(order_id));

        record.label_text = Some(format_label_text(&point));
        record.selected_point = Some(point);

        tracing::debug!(order_id = %order_id, "Pickup point stored for order");
    }

    async fn assign_tracking_number(&self, order_id: Uuid, order_number: &str) -> String {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .records
            .get(&order_id)
            .and_then(|r| r.tracking_number.clone())
        {
            return existing;
        }

        // Timestamp + 4 random digits is only best-effort unique, so the
        // store re-rolls on collision with numbers it has issued before.
        let mut number = generate_tracking_number(order_number);
        for _ in 1..TRACKING_NUMBER_ATTEMPTS {
            if !inner.issued_numbers.contains(&number) {
                break;
            }
            number = generate_tracking_number(order_number);
        }

        inner.issued_numbers.insert(number.clone());
        inner
            .records
            .entry(order_id)
            .or_insert_with(|| ShipmentRecord::new(order_id))
            .tracking_number = Some(number.clone());

        tracing::info!(
            order_id = %order_id,
            tracking_number = %number,
            "Tracking number assigned"
        );

        number
    }

    async fn mark_label_generated(&self, order_id: Uuid) {
        let mut inner = self.inner.write().await;
        if let Some(record) = inner.records.get_mut(&order_id) {
            record.label_generated = true;
        }
    }

    async fn record_status(&self, order_id: Uuid, status: CarrierStatus) -> bool {
        let mut inner = self.inner.write().await;

        let current = inner.records.get(&order_id).and_then(|r| r.carrier_status);
        if current == Some(status) {
            return false;
        }
        if !status.follows(current) {
            tracing::warn!(
                order_id = %order_id,
                current = ?current.map(|s| s.code()),
                reported = %status,
                "Ignoring carrier status that would move the shipment backward"
            );
            return false;
        }

        inner
            .records
            .entry(order_id)
            .or_insert_with(|| ShipmentRecord::new(order_id))
            .carrier_status = Some(status);
        inner.history.entry(order_id).or_default().push(StatusHistoryEntry {
            order_id,
            status,
            timestamp: Utc::now(),
        });

        tracing::info!(
            order_id = %order_id,
            status = %status,
            "Shipment status recorded"
        );

        true
    }

    async fn history(&self, order_id: Uuid) -> Vec<StatusHistoryEntry> {
        let inner = self.inner.read().await;
        let mut entries = inner.history.get(&order_id).cloned().unwrap_or_default();
        entries.reverse();
        entries
    }

    async fn open_shipments(&self) -> Vec<ShipmentRecord> {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|r| r.is_open())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point() -> PickupPoint {
        PickupPoint {
            id: "D100".to_string(),
            name: "Corner Depot".to_string(),
            address: "123 King St W".to_string(),
            city: "Toronto".to_string(),
            state: "ON".to_string(),
            postal_code: "M5V 2T6".to_string(),
            distance: 1.2,
            latitude: 43.645,
            longitude: -79.39,
            supported_services: vec![],
        }
    }

    #[tokio::test]
    async fn test_upsert_point_caches_label_text() {
        let store = InMemoryShipmentStore::new();
        let order_id = Uuid::new_v4();

        store.upsert_point(order_id, sample_point()).await;

        let record = store.get(order_id).await.unwrap();
        assert_eq!(record.selected_point.unwrap().id, "D100");
        assert!(record.label_text.unwrap().starts_with("PUDOD100 - Corner Depot"));
    }

    #[tokio::test]
    async fn test_assign_tracking_number_is_idempotent() {
        let store = InMemoryShipmentStore::new();
        let order_id = Uuid::new_v4();

        let first = store.assign_tracking_number(order_id, "10042").await;
        let second = store.assign_tracking_number(order_id, "10042").await;

        assert_eq!(first, second);
        assert!(first.starts_with("PUDO-"));
        assert!(first.ends_with("-10042"));
    }

    #[tokio::test]
    async fn test_tracking_numbers_are_unique_across_orders() {
        let store = InMemoryShipmentStore::new();

        let mut seen = HashSet::new();
        for i in 0..50 {
            let number = store
                .assign_tracking_number(Uuid::new_v4(), &i.to_string())
                .await;
            assert!(seen.insert(number));
        }
    }

    #[tokio::test]
    async fn test_record_status_appends_once_per_change() {
        let store = InMemoryShipmentStore::new();
        let order_id = Uuid::new_v4();

        assert!(store.record_status(order_id, CarrierStatus::Reg).await);
        assert!(!store.record_status(order_id, CarrierStatus::Reg).await);
        assert!(store.record_status(order_id, CarrierStatus::Arr).await);

        let history = store.history(order_id).await;
        assert_eq!(history.len(), 2);
        // Most recent first.
        assert_eq!(history[0].status, CarrierStatus::Arr);
        assert_eq!(history[1].status, CarrierStatus::Reg);
    }

    #[tokio::test]
    async fn test_record_status_never_moves_backward() {
        let store = InMemoryShipmentStore::new();
        let order_id = Uuid::new_v4();

        store.record_status(order_id, CarrierStatus::Arr).await;
        assert!(!store.record_status(order_id, CarrierStatus::Reg).await);

        let record = store.get(order_id).await.unwrap();
        assert_eq!(record.carrier_status, Some(CarrierStatus::Arr));
        assert_eq!(store.history(order_id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_status_is_never_followed() {
        let store = InMemoryShipmentStore::new();
        let order_id = Uuid::new_v4();

        store.record_status(order_id, CarrierStatus::Del).await;

        for status in [
            CarrierStatus::Reg,
            CarrierStatus::Arr,
            CarrierStatus::Ret,
        ] {
            assert!(!store.record_status(order_id, status).await);
        }

        let history = store.history(order_id).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, CarrierStatus::Del);
    }

    #[tokio::test]
    async fn test_open_shipments_excludes_terminal_and_unregistered() {
        let store = InMemoryShipmentStore::new();

        let no_tracking = Uuid::new_v4();
        store.upsert_point(no_tracking, sample_point()).await;

        let in_flight = Uuid::new_v4();
        store.assign_tracking_number(in_flight, "1").await;
        store.record_status(in_flight, CarrierStatus::Reg).await;

        let delivered = Uuid::new_v4();
        store.assign_tracking_number(delivered, "2").await;
        store.record_status(delivered, CarrierStatus::Del).await;

        let open = store.open_shipments().await;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].order_id, in_flight);
    }
}
