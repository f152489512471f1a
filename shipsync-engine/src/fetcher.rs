use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::error;

use shipsync_core::remote::RemoteOrder;
use shipsync_core::services::{OrderQuery, RemoteOrderClient};
use shipsync_core::settings::StoreConfig;
use shipsync_order::hooks::HookRegistry;

/// Fallback fetch window when no checkpoint exists. The remote API behaves
/// oddly with sub-day windows, so a full day is the floor.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Pulls a bounded time-window of orders per store from the remote API.
pub struct OrderFetcher {
    client: Arc<dyn RemoteOrderClient>,
    hooks: Arc<HookRegistry>,
}

impl OrderFetcher {
    pub fn new(client: Arc<dyn RemoteOrderClient>, hooks: Arc<HookRegistry>) -> Self {
        Self { client, hooks }
    }

    /// Start of the fetch window: the caller's checkpoint, or `window_hours`
    /// back from `now`.
    pub fn window_start(
        checkpoint: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        window_hours: i64,
    ) -> DateTime<Utc> {
        checkpoint.unwrap_or_else(|| now - Duration::hours(window_hours))
    }

    /// Fetch one store's window. A transport failure is logged and returned
    /// as `None`, so the caller skips this store without aborting the run.
    pub async fn fetch_store(
        &self,
        store: &StoreConfig,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        timeout: std::time::Duration,
    ) -> Option<Vec<RemoteOrder>> {
        let mut query = OrderQuery {
            store_id: store.store_id.clone(),
            modify_date_start: window_start,
            modify_date_end: window_end,
            timeout,
        };
        self.hooks
            .for_marketplace(store.marketplace)
            .rewrite_query(&mut query);

        match self.client.list_orders(&query).await {
            Ok(orders) => Some(orders),
            Err(err) => {
                error!(
                    store_id = %store.store_id,
                    error = %err,
                    "error while fetching remote orders"
                );
                None
            }
        }
    }
}
