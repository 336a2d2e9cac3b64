use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::CarrierStatus;

// ============================================================================
// Shipment Value Objects
// ============================================================================

/// A carrier pickup location, as returned by dealer search. Immutable
/// snapshot; a copy is attached to the shipment record once selected so
/// later carrier-side edits cannot change what was printed on a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupPoint {
    /// Carrier dealer identifier, sent back as `dealerId` at registration.
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Kilometres from the searched postal code.
    pub distance: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub supported_services: Vec<String>,
}

impl PickupPoint {
    pub fn supports_all(&self, services: &[String]) -> bool {
        services
            .iter()
            .all(|s| self.supported_services.iter().any(|have| have == s))
    }
}

/// Per-order shipment state. One record exists for every order shipping
/// via this carrier, keyed by the host order id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
    pub order_id: Uuid,
    pub selected_point: Option<PickupPoint>,
    /// Assigned once, immutable thereafter.
    pub tracking_number: Option<String>,
    /// Set exactly once, after the carrier accepted the registration.
    pub label_generated: bool,
    pub carrier_status: Option<CarrierStatus>,
    /// Cached at point-selection time for label printing.
    pub label_text: Option<String>,
}

impl ShipmentRecord {
    pub fn new(order_id: Uuid) -> Self {
        Self {
            order_id,
            selected_point: None,
            tracking_number: None,
            label_generated: false,
            carrier_status: None,
            label_text: None,
        }
    }

    /// Open shipments are those the reconciler still polls: a tracking
    /// number exists and no terminal status has been recorded.
    pub fn is_open(&self) -> bool {
        self.tracking_number.is_some()
            && !self.carrier_status.is_some_and(|s| s.is_terminal())
    }
}

/// One observed status change. Append-only audit trail; never updated
/// or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub order_id: Uuid,
    pub status: CarrierStatus,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Formatting
// ============================================================================

/// Compose a tracking number: fixed prefix, unix timestamp, a 4-digit
/// random component, and the order's display number.
pub fn format_tracking_number(timestamp: i64, random: u16, order_number: &str) -> String {
    format!("PUDO-{}-{:04}-{}", timestamp, random, order_number)
}

pub fn generate_tracking_number(order_number: &str) -> String {
    // uuid is already in the tree; its randomness is plenty for a
    // 4-digit discriminator.
    let random = (Uuid::new_v4().as_u128() % 9000) as u16 + 1000;
    format_tracking_number(Utc::now().timestamp(), random, order_number)
}

/// Label text shown on the printed shipping label.
pub fn format_label_text(point: &PickupPoint) -> String {
    format!(
        "PUDO{} - {}\n{}\n{}, {} {}",
        point.id, point.name, point.address, point.city, point.state, point.postal_code
    )
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
            supported_services: vec!["AL".to_string(), "RX".to_string()],
        }
    }

    #[test]
    fn test_tracking_number_format() {
        let number = format_tracking_number(1700000000, 1234, "10042");
        assert_eq!(number, "PUDO-1700000000-1234-10042");
    }

    #[test]
    fn test_generated_tracking_number_shape() {
        let number = generate_tracking_number("10042");
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "PUDO");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].parse::<u16>().is_ok());
        assert_eq!(parts[3], "10042");
    }

    #[test]
    fn test_label_text() {
        let text = format_label_text(&sample_point());
        assert_eq!(
            text,
            "PUDOD100 - Corner Depot\n123 King St W\nToronto, ON M5V 2T6"
        );
    }

    #[test]
    fn test_supports_all() {
        let point = sample_point();
        assert!(point.supports_all(&[]));
        assert!(point.supports_all(&["AL".to_string()]));
        assert!(!point.supports_all(&["AL".to_string(), "TB".to_string()]));
    }

    #[test]
    fn test_open_shipment() {
        let mut record = ShipmentRecord::new(Uuid::new_v4());
        assert!(!record.is_open());

        record.tracking_number = Some("PUDO-1-0001-1".to_string());
        assert!(record.is_open());

        record.carrier_status = Some(CarrierStatus::Arr);
        assert!(record.is_open());

        record.carrier_status = Some(CarrierStatus::Del);
        assert!(!record.is_open());
    }
}
