use std::sync::Arc;

use uuid::Uuid;

use crate::api::{ApiError, CarrierClient, PlaceShipmentRequest};
use crate::config::PudoConfig;
use crate::host::{AccessControl, OrderRepository, OrderStatus};
use crate::store::ShipmentStore;

// ============================================================================
// Shipment Registrar
// ============================================================================
//
// Allocates a tracking number and registers the shipment with the
// carrier exactly once per order. Two trigger paths share the same
// algorithm:
//
// - manual: an operator clicks "generate label"; capability and
//   anti-replay token are checked and failures are surfaced
//   synchronously.
// - automatic: the order entered a ready-to-ship status with this
//   carrier as its shipping method; failures are logged and swallowed
//   because a later order event retries registration.
//
// Both paths may race or double-fire; label_generated makes the second
// invocation a no-op. The worst case of a true race is one duplicate
// carrier registration call, never corrupted local state.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Permission denied")]
    Permission,

    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("No pickup point selected for this order")]
    MissingPickupPoint,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct ShipmentRegistrar {
    client: Arc<CarrierClient>,
    store: Arc<dyn ShipmentStore>,
    orders: Arc<dyn OrderRepository>,
    access: Arc<dyn AccessControl>,
    config: Arc<PudoConfig>,
}

impl ShipmentRegistrar {
    pub fn new(
        client: Arc<CarrierClient>,
        store: Arc<dyn ShipmentStore>,
        orders: Arc<dyn OrderRepository>,
        access: Arc<dyn AccessControl>,
        config: Arc<PudoConfig>,
    ) -> Self {
        Self {
            client,
            store,
            orders,
            access,
            config,
        }
    }

    /// Register the order's shipment with the carrier. Idempotent: once
    /// the label exists this returns the tracking number without
    /// another carrier call. On failure no partial state is persisted;
    /// the assigned tracking number is reused by the next attempt.
    pub async fn register_shipment(&self, order_id: Uuid) -> Result<String, RegistrationError> {
        let order = self
            .orders
            .get_order(order_id)
            .await
            .ok_or(RegistrationError::NotFound(order_id))?;

        let record = self.store.get(order_id).await;

        if let Some(record) = &record {
            if record.label_generated {
                if let Some(tracking) = &record.tracking_number {
                    tracing::debug!(
                        order_id = %order_id,
                        tracking_number = %tracking,
                        "Shipment already registered, nothing to do"
                    );
                    return Ok(tracking.clone());
                }
            }
        }

        let dealer_id = record
            .and_then(|r| r.selected_point)
            .map(|p| p.id)
            .ok_or(RegistrationError::MissingPickupPoint)?;

        let tracking_number = self
            .store
            .assign_tracking_number(order_id, &order.order_number)
            .await;

        let request = PlaceShipmentRequest {
            tracking_number: tracking_number.clone(),
            customer_email: order.billing.email,
            customer_mobile: order.billing.phone,
            notification_preference: self.config.notification_preference.code().to_string(),
            customer_name: order.billing.full_name,
            customer_company: order.billing.company,
            dealer_id,
        };

        self.client.place_shipment(&request).await?;
        self.store.mark_label_generated(order_id).await;

        tracing::info!(
            order_id = %order_id,
            tracking_number = %tracking_number,
            "Shipping label generated"
        );

        Ok(tracking_number)
    }

    /// Operator-initiated label generation. Checks the capability and
    /// the anti-replay token before doing anything; errors are returned
    /// to the caller for synchronous display.
    pub async fn register_label(
        &self,
        actor: Uuid,
        token: &str,
        order_id: Uuid,
    ) -> Result<String, RegistrationError> {
        if !self.access.can_manage_shipments(actor) {
            tracing::warn!(actor = %actor, order_id = %order_id, "Label generation denied");
            return Err(RegistrationError::Permission);
        }
        if !self.access.verify_token(actor, token) {
            tracing::warn!(actor = %actor, order_id = %order_id, "Stale or invalid request token");
            return Err(RegistrationError::Permission);
        }

        self.register_shipment(order_id).await
    }

    /// Order-event hook: register automatically when the order becomes
    /// ready to ship via this carrier and no label exists yet. Failures
    /// are swallowed after logging; the next order event or poll will
    /// try again.
    pub async fn on_order_status_changed(&self, order_id: Uuid, new_status: OrderStatus) {
        if !new_status.is_ready_to_ship() {
            return;
        }

        let Some(order) = self.orders.get_order(order_id).await else {
            return;
        };
        if !order.uses_pudo_shipping() {
            return;
        }
        if self
            .store
            .get(order_id)
            .await
            .is_some_and(|r| r.label_generated)
        {
            return;
        }

        match self.register_shipment(order_id).await {
            Ok(tracking_number) => {
                tracing::info!(
                    order_id = %order_id,
                    tracking_number = %tracking_number,
                    "Label generated automatically on status change"
                );
            }
            Err(error) => {
                // Silent by design on this path; the customer-facing
                // flow continues and registration is retried later.
                tracing::warn!(
                    order_id = %order_id,
                    error = %error,
                    "Automatic label generation failed, leaving for retry"
                );
            }
        }
    }
}
