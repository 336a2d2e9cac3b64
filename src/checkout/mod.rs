use std::sync::Arc;

use uuid::Uuid;

use crate::api::{ApiError, CarrierClient, SearchOverrides};
use crate::config::PudoConfig;
use crate::domain::PickupPoint;
use crate::store::ShipmentStore;

// ============================================================================
// Checkout Glue - Point Search and Selection
// ============================================================================
//
// Head of the data flow: the shopper's postal code goes in, a filtered
// list of pickup points comes out, and the chosen point snapshot lands
// on the shipment record. No rendering here; the host UI consumes the
// returned data.
//
// ============================================================================

/// Outcome of a point search after configured filters are applied.
#[derive(Debug, Clone)]
pub struct PointSearchResult {
    pub points: Vec<PickupPoint>,
    /// Populated iff exactly one point survived filtering; the UI
    /// pre-selects it (single-result auto-select policy).
    pub auto_selected: Option<PickupPoint>,
}

pub struct CheckoutService {
    client: Arc<CarrierClient>,
    store: Arc<dyn ShipmentStore>,
    config: Arc<PudoConfig>,
}

impl CheckoutService {
    pub fn new(
        client: Arc<CarrierClient>,
        store: Arc<dyn ShipmentStore>,
        config: Arc<PudoConfig>,
    ) -> Self {
        Self {
            client,
            store,
            config,
        }
    }

    /// Search pickup points near a postal code, filtered by the
    /// configured maximum distance and required service codes.
    pub async fn search_points(&self, postal_code: &str) -> Result<PointSearchResult, ApiError> {
        if postal_code.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "postalCode",
            });
        }

        let mut points = self
            .client
            .search_dealers(postal_code.trim(), &SearchOverrides::default())
            .await?;

        if let Some(max_km) = self.config.max_point_distance_km {
            points.retain(|p| p.distance <= max_km);
        }
        if !self.config.required_services.is_empty() {
            points.retain(|p| p.supports_all(&self.config.required_services));
        }

        let auto_selected = match points.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };

        Ok(PointSearchResult {
            points,
            auto_selected,
        })
    }

    /// Checkout selected (or auto-selected) a pickup point; snapshot it
    /// onto the shipment record. Safe to call again when the shopper
    /// changes their mind before fulfilment.
    pub async fn on_checkout_updated(&self, order_id: Uuid, point: PickupPoint) {
        tracing::debug!(
            order_id = %order_id,
            dealer_id = %point.id,
            "Pickup point selected at checkout"
        );
        self.store.upsert_point(order_id, point).await;
    }
}
