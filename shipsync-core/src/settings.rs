use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marketplace classification of a store, used to select channel-specific
/// header hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Marketplace {
    Generic,
    Amazon,
    Shopify,
}

impl Default for Marketplace {
    fn default() -> Self {
        Marketplace::Generic
    }
}

/// Per-channel settings for a single marketplace store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store_id: String,
    pub store_name: String,
    pub company: String,
    /// Stores with order sync disabled are skipped entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub marketplace: Marketplace,
    pub marketplace_name: String,
    /// When set, all orders from this store bind to this customer record
    /// instead of resolving one per remote order.
    pub customer: Option<String>,
    /// Default warehouse for mapped merchandise lines.
    pub warehouse: String,
    pub tax_account: String,
    pub shipping_income_account: String,
    pub difference_account: String,
    pub commission_account: String,
    pub cost_center: String,
    pub sales_partner: Option<String>,
    #[serde(default)]
    pub apply_commission: bool,
    #[serde(default)]
    pub withholding: bool,
}

/// Per-tenant scope for a synchronization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSettings {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Warehouse allow-list; empty means unrestricted.
    #[serde(default)]
    pub active_warehouse_ids: Vec<String>,
    /// Orders created before this date are never materialized.
    pub since_date: Option<NaiveDate>,
    /// Identity the run acts as; threaded through as context, never global.
    pub acting_user: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
}

impl TenantSettings {
    /// Deadline applied to each remote listing call for this tenant.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    // The remote client applies a generous per-request timeout; list calls
    // over a full day window can be slow.
    300
}
