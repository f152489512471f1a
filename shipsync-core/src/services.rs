use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::{RemoteOrder, RemoteOrderItem};
use crate::settings::{StoreConfig, TenantSettings};
use crate::SyncResult;

/// A resolved customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRef {
    pub name: String,
    pub primary_address: Option<String>,
}

/// Query parameters for a remote order listing. Hooks may rewrite this
/// before the call goes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQuery {
    pub store_id: String,
    pub modify_date_start: DateTime<Utc>,
    pub modify_date_end: DateTime<Utc>,
    /// Per-request deadline the transport must honor.
    pub timeout: Duration,
}

/// Customer resolution boundary.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Resolve the customer for a remote order, creating one if needed.
    async fn resolve_or_create(&self, order: &RemoteOrder) -> SyncResult<CustomerRef>;

    /// Billing address linked to a customer record, if any.
    async fn billing_address(&self, customer: &str) -> SyncResult<Option<String>>;
}

/// Catalog resolution boundary.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Resolve the internal item code for a remote line item, creating the
    /// catalog entry if it does not exist yet.
    async fn resolve_or_create_item(
        &self,
        item: &RemoteOrderItem,
        settings: &TenantSettings,
        store: &StoreConfig,
    ) -> SyncResult<String>;
}

/// Transport boundary to the remote fulfillment API.
#[async_trait]
pub trait RemoteOrderClient: Send + Sync {
    /// List orders modified inside the query window.
    /// Fails with `SyncError::Transport` on network/HTTP errors.
    async fn list_orders(&self, query: &OrderQuery) -> SyncResult<Vec<RemoteOrder>>;
}
