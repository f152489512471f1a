use async_trait::async_trait;

use shipsync_core::SyncResult;

use crate::models::SalesOrder;

/// Persistence boundary for the sales-order aggregate.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// True when a submitted internal order already exists for this remote
    /// order id. This is the idempotency gate; it is a plain read, so two
    /// overlapping runs can race past it (accepted, see DESIGN.md).
    async fn exists_submitted(&self, remote_order_id: &str) -> SyncResult<bool>;

    /// Persist the order, recomputing its stored totals and transitioning
    /// Draft → Saved on first save.
    async fn save(&self, order: &mut SalesOrder) -> SyncResult<()>;

    /// Transition Saved → Submitted and commit. Terminal; fails if a
    /// submitted record for the same remote order id already exists.
    async fn submit(&self, order: &mut SalesOrder) -> SyncResult<()>;
}

/// Read-back access to sales-partner configuration. Queried after the first
/// save, once the order has a stable identifier.
#[async_trait]
pub trait PartnerDirectory: Send + Sync {
    async fn commission_formula(&self, partner: &str) -> SyncResult<Option<String>>;
}
