use std::sync::Arc;

use shipsync_core::remote::RemoteOrder;
use shipsync_core::settings::{StoreConfig, TenantSettings};
use shipsync_core::SyncResult;
use shipsync_order::hooks::HookRegistry;
use shipsync_order::repository::OrderRepository;

/// Decides whether a fetched remote order should be materialized.
pub struct OrderValidator {
    repository: Arc<dyn OrderRepository>,
    hooks: Arc<HookRegistry>,
}

impl OrderValidator {
    pub fn new(repository: Arc<dyn OrderRepository>, hooks: Arc<HookRegistry>) -> Self {
        Self { repository, hooks }
    }

    /// Structural rules, short-circuit in order: idempotency gate, warehouse
    /// scoping, date cutoff. A channel hook then has the final word.
    pub async fn is_eligible(
        &self,
        settings: &TenantSettings,
        order: &RemoteOrder,
        store: &StoreConfig,
    ) -> SyncResult<bool> {
        // A submitted internal order for this remote id already exists: skip.
        if self.repository.exists_submitted(&order.order_id).await? {
            return Ok(false);
        }

        // Only materialize orders for warehouses the tenant allows; an empty
        // list means everything is fetched.
        if !settings.active_warehouse_ids.is_empty() {
            let allowed = order
                .warehouse_id
                .as_ref()
                .is_some_and(|id| settings.active_warehouse_ids.contains(id));
            if !allowed {
                return Ok(false);
            }
        }

        // A date cutoff rejects anything created before it.
        if let Some(since) = settings.since_date {
            if order.create_date.date_naive() < since {
                return Ok(false);
            }
        }

        Ok(self
            .hooks
            .for_marketplace(store.marketplace)
            .accept_order(order, store))
    }
}
