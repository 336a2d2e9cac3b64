use std::sync::Arc;

use uuid::Uuid;

use crate::api::{CarrierClient, CarrierTransport, HttpTransport};
use crate::checkout::CheckoutService;
use crate::config::PudoConfig;
use crate::domain::{CarrierStatus, StatusHistoryEntry};
use crate::host::{AccessControl, OrderRepository};
use crate::shipping::{ShipmentRegistrar, StatusReconciler};
use crate::store::ShipmentStore;

// ============================================================================
// Connector Composition Root
// ============================================================================
//
// Wires one configuration into one client, one checkout service, one
// registrar and one reconciler, all sharing the same store and host
// adapters. Hosts construct this once at startup and hand the pieces to
// their own hooks; nothing in the crate reaches for globals.
//
// ============================================================================

/// Customer-facing tracking snapshot for an order.
#[derive(Debug, Clone)]
pub struct TrackingInfo {
    pub tracking_number: String,
    pub status: Option<CarrierStatus>,
    pub status_description: Option<&'static str>,
    /// Most recent entry first.
    pub history: Vec<StatusHistoryEntry>,
}

pub struct PudoConnector {
    pub config: Arc<PudoConfig>,
    pub client: Arc<CarrierClient>,
    pub store: Arc<dyn ShipmentStore>,
    pub checkout: Arc<CheckoutService>,
    pub registrar: Arc<ShipmentRegistrar>,
    pub reconciler: Arc<StatusReconciler>,
}

impl PudoConnector {
    /// Assemble the connector against the live carrier API.
    pub fn new(
        config: PudoConfig,
        store: Arc<dyn ShipmentStore>,
        orders: Arc<dyn OrderRepository>,
        access: Arc<dyn AccessControl>,
    ) -> anyhow::Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(transport, config, store, orders, access))
    }

    /// Assemble the connector over an arbitrary transport. Tests and
    /// hosts with their own HTTP stack inject one here.
    pub fn with_transport(
        transport: Arc<dyn CarrierTransport>,
        config: PudoConfig,
        store: Arc<dyn ShipmentStore>,
        orders: Arc<dyn OrderRepository>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(CarrierClient::new(transport, config.clone()));
        let checkout = Arc::new(CheckoutService::new(
            client.clone(),
            store.clone(),
            config.clone(),
        ));
        let registrar = Arc::new(ShipmentRegistrar::new(
            client.clone(),
            store.clone(),
            orders.clone(),
            access,
            config.clone(),
        ));
        let reconciler = Arc::new(StatusReconciler::new(
            client.clone(),
            store.clone(),
            orders,
            &config,
        ));

        Self {
            config,
            client,
            store,
            checkout,
            registrar,
            reconciler,
        }
    }

    /// Tracking details for display on the order page. `None` until a
    /// tracking number has been assigned.
    pub async fn tracking_info(&self, order_id: Uuid) -> Option<TrackingInfo> {
        let record = self.store.get(order_id).await?;
        let tracking_number = record.tracking_number?;
        let history = self.store.history(order_id).await;

        Some(TrackingInfo {
            tracking_number,
            status: record.carrier_status,
            status_description: record.carrier_status.map(|s| s.description()),
            history,
        })
    }
}
