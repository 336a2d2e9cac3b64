use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::CarrierClient;
use crate::config::PudoConfig;
use crate::domain::CarrierStatus;
use crate::host::{HostOrder, OrderRepository, OrderStatus};
use crate::store::ShipmentStore;

// ============================================================================
// Status Reconciler
// ============================================================================
//
// Recurring pull-based sync: the carrier exposes no webhooks, so a
// polling loop asks for the current status of every open shipment and
// folds the answer into local state. One failing order never aborts the
// pass; the loop logs it and moves on. All mutations route through the
// store, which makes a repeated pass over unchanged data a no-op.
//
// ============================================================================

const DELIVERED_NOTE: &str = "Order automatically completed - Package picked up from PUDO point.";
const RETURNED_NOTE: &str = "Order marked as failed - Package returned to courier.";

/// Outcome counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Shipments whose status was requested from the carrier.
    pub checked: usize,
    /// Shipments that moved to a new status this pass.
    pub updated: usize,
    /// Shipments whose status check or side effect failed.
    pub failed: usize,
}

pub struct StatusReconciler {
    client: Arc<CarrierClient>,
    store: Arc<dyn ShipmentStore>,
    orders: Arc<dyn OrderRepository>,
    poll_interval: Duration,
    shutdown: AtomicBool,
}

impl StatusReconciler {
    pub fn new(
        client: Arc<CarrierClient>,
        store: Arc<dyn ShipmentStore>,
        orders: Arc<dyn OrderRepository>,
        config: &PudoConfig,
    ) -> Self {
        Self {
            client,
            store,
            orders,
            poll_interval: config.poll_interval,
            shutdown: AtomicBool::new(false),
        }
    }

    /// Request a graceful stop. The running loop exits before the next
    /// order's status call; no pass is interrupted mid-order.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Poll the carrier at the configured interval until stopped.
    pub async fn run(self: Arc<Self>) {
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            "Status reconciliation loop started"
        );

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let summary = self.reconcile_all().await;
            tracing::info!(
                checked = summary.checked,
                updated = summary.updated,
                failed = summary.failed,
                "Reconciliation pass finished"
            );

            tokio::time::sleep(self.poll_interval).await;
        }

        tracing::info!("Status reconciliation loop stopped");
    }

    /// One full pass over every open shipment.
    pub async fn reconcile_all(&self) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for record in self.store.open_shipments().await {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("Shutdown requested, stopping reconciliation pass early");
                break;
            }

            let Some(tracking_number) = record.tracking_number.clone() else {
                continue;
            };
            let Some(order) = self.orders.get_order(record.order_id).await else {
                tracing::warn!(
                    order_id = %record.order_id,
                    "Shipment has no backing order, skipping"
                );
                continue;
            };
            if !order.status.is_open_for_shipping() {
                continue;
            }

            summary.checked += 1;

            let status = match self.client.shipment_status(&tracking_number).await {
                Ok(status) => status,
                Err(error) => {
                    summary.failed += 1;
                    tracing::error!(
                        order_id = %record.order_id,
                        tracking_number = %tracking_number,
                        error = %error,
                        "Status check failed, continuing with remaining shipments"
                    );
                    continue;
                }
            };

            if !self.store.record_status(record.order_id, status).await {
                continue;
            }
            summary.updated += 1;

            if let Err(error) = self.apply_order_side_effect(&order, status).await {
                summary.failed += 1;
                tracing::error!(
                    order_id = %record.order_id,
                    status = %status,
                    error = %error,
                    "Order update after status change failed"
                );
            }
        }

        summary
    }

    /// Terminal carrier statuses close out the host order; intermediate
    /// ones are history-only.
    async fn apply_order_side_effect(
        &self,
        order: &HostOrder,
        status: CarrierStatus,
    ) -> anyhow::Result<()> {
        match status {
            CarrierStatus::Del if order.status != OrderStatus::Completed => {
                self.orders
                    .set_status(order.id, OrderStatus::Completed, DELIVERED_NOTE)
                    .await
            }
            CarrierStatus::Ret if order.status != OrderStatus::Failed => {
                self.orders
                    .set_status(order.id, OrderStatus::Failed, RETURNED_NOTE)
                    .await
            }
            _ => Ok(()),
        }
    }
}
