//! In-memory reference adapters for the service boundaries.
//!
//! These back the binary's default wiring and the integration tests; real
//! deployments substitute ORM/HTTP-backed implementations of the same
//! traits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use shipsync_core::remote::{RemoteOrder, RemoteOrderItem};
use shipsync_core::services::{
    CatalogService, CustomerRef, CustomerService, OrderQuery, RemoteOrderClient,
};
use shipsync_core::settings::{StoreConfig, TenantSettings};
use shipsync_core::{SyncError, SyncResult};

use shipsync_order::models::SalesOrder;
use shipsync_order::repository::{OrderRepository, PartnerDirectory};

/// Order persistence backed by process memory.
#[derive(Default)]
pub struct MemoryOrderRepository {
    saved: Mutex<HashMap<uuid::Uuid, SalesOrder>>,
    submitted: Mutex<HashMap<String, SalesOrder>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submitted order for a remote order id, if any.
    pub fn submitted_order(&self, remote_order_id: &str) -> Option<SalesOrder> {
        self.submitted.lock().unwrap().get(remote_order_id).cloned()
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn exists_submitted(&self, remote_order_id: &str) -> SyncResult<bool> {
        Ok(self.submitted.lock().unwrap().contains_key(remote_order_id))
    }

    async fn save(&self, order: &mut SalesOrder) -> SyncResult<()> {
        order.recompute_totals();
        order
            .mark_saved()
            .map_err(|e| SyncError::Persistence(e.to_string()))?;
        self.saved.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }

    async fn submit(&self, order: &mut SalesOrder) -> SyncResult<()> {
        // Uniqueness is enforced here, at commit time. Two overlapping runs
        // can both pass the exists_submitted read; the second one fails at
        // this point rather than producing a duplicate record.
        let mut submitted = self.submitted.lock().unwrap();
        if submitted.contains_key(&order.remote_order_id) {
            return Err(SyncError::Persistence(format!(
                "submitted order already exists for remote order {}",
                order.remote_order_id
            )));
        }
        order
            .mark_submitted()
            .map_err(|e| SyncError::Persistence(e.to_string()))?;
        submitted.insert(order.remote_order_id.clone(), order.clone());
        Ok(())
    }
}

/// Customer resolution keyed by remote email.
#[derive(Default)]
pub struct MemoryCustomerService {
    customers: Mutex<HashMap<String, CustomerRef>>,
}

impl MemoryCustomerService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerService for MemoryCustomerService {
    async fn resolve_or_create(&self, order: &RemoteOrder) -> SyncResult<CustomerRef> {
        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .entry(order.customer_email.clone())
            .or_insert_with(|| CustomerRef {
                name: format!("CUST-{}", order.customer_email),
                primary_address: Some(format!("primary address of {}", order.customer_email)),
            });
        Ok(customer.clone())
    }

    async fn billing_address(&self, customer: &str) -> SyncResult<Option<String>> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .values()
            .find(|c| c.name == customer)
            .map(|c| format!("billing address of {}", c.name)))
    }
}

/// Catalog resolution that derives item codes from SKUs.
#[derive(Default)]
pub struct MemoryCatalogService {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryCatalogService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogService for MemoryCatalogService {
    async fn resolve_or_create_item(
        &self,
        item: &RemoteOrderItem,
        _settings: &TenantSettings,
        _store: &StoreConfig,
    ) -> SyncResult<String> {
        let key = item
            .sku
            .clone()
            .unwrap_or_else(|| format!("REMOTE-{}", item.order_item_id));
        let mut items = self.items.lock().unwrap();
        let code = items.entry(key.clone()).or_insert(key);
        Ok(code.clone())
    }
}

/// Commission formulas registered per sales partner.
#[derive(Default)]
pub struct MemoryPartnerDirectory {
    formulas: Mutex<HashMap<String, String>>,
}

impl MemoryPartnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_formula(&self, partner: impl Into<String>, formula: impl Into<String>) {
        self.formulas
            .lock()
            .unwrap()
            .insert(partner.into(), formula.into());
    }
}

#[async_trait]
impl PartnerDirectory for MemoryPartnerDirectory {
    async fn commission_formula(&self, partner: &str) -> SyncResult<Option<String>> {
        Ok(self.formulas.lock().unwrap().get(partner).cloned())
    }
}

/// Remote client serving a fixed order list, filtered by store and window.
#[derive(Default)]
pub struct StaticRemoteClient {
    orders: Mutex<Vec<RemoteOrder>>,
}

impl StaticRemoteClient {
    pub fn new(orders: Vec<RemoteOrder>) -> Self {
        Self {
            orders: Mutex::new(orders),
        }
    }

    pub fn push(&self, order: RemoteOrder) {
        self.orders.lock().unwrap().push(order);
    }
}

#[async_trait]
impl RemoteOrderClient for StaticRemoteClient {
    async fn list_orders(&self, query: &OrderQuery) -> SyncResult<Vec<RemoteOrder>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|order| order.store_id == query.store_id)
            .filter(|order| {
                order.create_date >= query.modify_date_start
                    && order.create_date <= query.modify_date_end
            })
            .cloned()
            .collect())
    }
}
