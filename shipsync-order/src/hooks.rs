use std::collections::HashMap;
use std::sync::Arc;

use shipsync_core::remote::{RemoteOrder, RemoteOrderItem};
use shipsync_core::services::OrderQuery;
use shipsync_core::settings::{Marketplace, StoreConfig};

use crate::models::SalesOrder;

/// Channel extension points. Every method has a no-op default, so an
/// implementation overrides only what it needs.
pub trait ChannelHooks: Send + Sync {
    /// Rewrite the remote listing query before it goes out.
    fn rewrite_query(&self, _query: &mut OrderQuery) {}

    /// Final say on whether a structurally valid order is materialized.
    fn accept_order(&self, _order: &RemoteOrder, _store: &StoreConfig) -> bool {
        true
    }

    /// Channel-specific header adjustments on the freshly built draft.
    fn adjust_header(&self, _order: &mut SalesOrder, _remote: &RemoteOrder, _store: &StoreConfig) {}

    /// Transform the remote line items before mapping.
    fn transform_items(&self, items: Vec<RemoteOrderItem>) -> Vec<RemoteOrderItem> {
        items
    }

    /// Mutate the order just before submission; the assembler persists the
    /// result.
    fn before_submit(&self, _order: &mut SalesOrder, _remote: &RemoteOrder, _store: &StoreConfig) {}

    /// Notification after successful submission; no state transitions.
    fn after_submit(&self, _order: &SalesOrder, _remote: &RemoteOrder, _store: &StoreConfig) {}
}

/// The do-nothing hook set.
pub struct NoopHooks;

impl ChannelHooks for NoopHooks {}

/// Resolves the hook set for a store by its marketplace classification,
/// falling back to a default set. Registered once at startup.
pub struct HookRegistry {
    default: Arc<dyn ChannelHooks>,
    overrides: HashMap<Marketplace, Arc<dyn ChannelHooks>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            default: Arc::new(NoopHooks),
            overrides: HashMap::new(),
        }
    }

    pub fn with_default(hooks: Arc<dyn ChannelHooks>) -> Self {
        Self {
            default: hooks,
            overrides: HashMap::new(),
        }
    }

    pub fn register(&mut self, marketplace: Marketplace, hooks: Arc<dyn ChannelHooks>) {
        self.overrides.insert(marketplace, hooks);
    }

    pub fn for_marketplace(&self, marketplace: Marketplace) -> &dyn ChannelHooks {
        self.overrides
            .get(&marketplace)
            .unwrap_or(&self.default)
            .as_ref()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
