use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

// ============================================================================
// Host Collaborator Interfaces
// ============================================================================
//
// The commerce platform owns order identity and lifecycle; the connector
// consumes it through these narrow traits. The in-memory repository is
// the reference adapter used by tests and the demo binary.
//
// ============================================================================

/// Host order lifecycle states the connector cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl OrderStatus {
    /// Orders the reconciler polls carrier status for.
    pub fn is_open_for_shipping(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Completed)
    }

    /// Statuses that trigger automatic label generation.
    pub fn is_ready_to_ship(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Billing fields the carrier needs; never more customer PII than that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingDetails {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostOrder {
    pub id: Uuid,
    /// Display number shown to customers; part of the tracking number.
    pub order_number: String,
    pub status: OrderStatus,
    /// Shipping method identifier chosen at checkout.
    pub shipping_method: String,
    pub billing: BillingDetails,
}

impl HostOrder {
    pub fn uses_pudo_shipping(&self) -> bool {
        self.shipping_method.contains("pudo")
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, order_id: Uuid) -> Option<HostOrder>;

    /// Transition the host order, attaching a system-authored note.
    async fn set_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        note: &str,
    ) -> anyhow::Result<()>;
}

/// Capability check plus anti-replay token validation for the manual
/// label-generation trigger.
pub trait AccessControl: Send + Sync {
    fn can_manage_shipments(&self, actor: Uuid) -> bool;
    fn verify_token(&self, actor: Uuid, token: &str) -> bool;
}

// ============================================================================
// In-Memory Order Repository (reference adapter)
// ============================================================================

#[derive(Debug, Clone)]
pub struct OrderNote {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub note: String,
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, HostOrder>>,
    notes: RwLock<Vec<OrderNote>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: HostOrder) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Notes recorded by status transitions, oldest first.
    pub async fn notes(&self) -> Vec<OrderNote> {
        self.notes.read().await.clone()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_order(&self, order_id: Uuid) -> Option<HostOrder> {
        self.orders.read().await.get(&order_id).cloned()
    }

    async fn set_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        note: &str,
    ) -> anyhow::Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or_else(|| anyhow::anyhow!("Order not found: {}", order_id))?;
        order.status = status;

        self.notes.write().await.push(OrderNote {
            order_id,
            status,
            note: note.to_string(),
        });

        tracing::info!(
            order_id = %order_id,
            status = %status,
            note = note,
            "Host order status updated"
        );

        Ok(())
    }
}

/// Permit-everything policy for the demo binary; real hosts adapt their
/// own capability and nonce checks.
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn can_manage_shipments(&self, _actor: Uuid) -> bool {
        true
    }

    fn verify_token(&self, _actor: Uuid, _token: &str) -> bool {
        true
    }
}
