use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shipsync_core::context::SyncContext;
use shipsync_core::remote::RemoteOrder;
use shipsync_core::services::{CustomerRef, CustomerService};
use shipsync_core::settings::{StoreConfig, TenantSettings};
use shipsync_core::SyncResult;

use crate::hooks::HookRegistry;
use crate::mapper::LineItemMapper;
use crate::models::SalesOrder;
use crate::reconciler::FinancialReconciler;
use crate::repository::OrderRepository;

/// Builds an internal sales order from a remote order and drives it through
/// its save/submit lifecycle.
///
/// The two saves are load-bearing: commission calculation reads partner
/// configuration back through the repository, which needs the order to exist
/// as a stable record first.
pub struct OrderAssembler {
    customers: Arc<dyn CustomerService>,
    repository: Arc<dyn OrderRepository>,
    mapper: LineItemMapper,
    reconciler: FinancialReconciler,
    hooks: Arc<HookRegistry>,
}

impl OrderAssembler {
    pub fn new(
        customers: Arc<dyn CustomerService>,
        repository: Arc<dyn OrderRepository>,
        mapper: LineItemMapper,
        reconciler: FinancialReconciler,
        hooks: Arc<HookRegistry>,
    ) -> Self {
        Self {
            customers,
            repository,
            mapper,
            reconciler,
            hooks,
        }
    }

    /// Create and submit an internal order for a validated remote order.
    /// Returns `None` when the order is abandoned because no merchandise
    /// lines survived mapping.
    pub async fn assemble(
        &self,
        ctx: &SyncContext,
        remote: &RemoteOrder,
        store: &StoreConfig,
        settings: &TenantSettings,
    ) -> SyncResult<Option<Uuid>> {
        let customer = self.resolve_customer(remote, store).await?;
        let billing_address = self.customers.billing_address(&customer.name).await?;

        let mut order = self.build_header(ctx, remote, store, settings, &customer);
        order.billing_address = billing_address;

        let hooks = self.hooks.for_marketplace(store.marketplace);
        hooks.adjust_header(&mut order, remote, store);

        let items = hooks.transform_items(remote.items.clone());
        let mapped = self.mapper.map_items(&items, settings, store).await?;
        if !mapped.has_merchandise() {
            debug!(remote_order_id = %remote.order_id, "no merchandise lines, abandoning order");
            return Ok(None);
        }
        for line in mapped.lines {
            order.add_line(line);
        }

        // First save: the order needs a persisted identity before charges
        // and commission are computed.
        self.repository.save(&mut order).await?;

        self.reconciler
            .reconcile(&mut order, remote, store, mapped.discount_total)
            .await?;

        self.repository.save(&mut order).await?;

        hooks.before_submit(&mut order, remote, store);
        self.repository.save(&mut order).await?;

        self.repository.submit(&mut order).await?;
        info!(
            run_id = %ctx.run_id,
            remote_order_id = %remote.order_id,
            order_id = %order.id,
            "submitted internal order"
        );

        hooks.after_submit(&order, remote, store);

        Ok(Some(order.id))
    }

    /// Bound store customer wins; otherwise delegate resolution.
    async fn resolve_customer(
        &self,
        remote: &RemoteOrder,
        store: &StoreConfig,
    ) -> SyncResult<CustomerRef> {
        match &store.customer {
            Some(bound) => Ok(CustomerRef {
                name: bound.clone(),
                primary_address: None,
            }),
            None => self.customers.resolve_or_create(remote).await,
        }
    }

    fn build_header(
        &self,
        ctx: &SyncContext,
        remote: &RemoteOrder,
        store: &StoreConfig,
        settings: &TenantSettings,
        customer: &CustomerRef,
    ) -> SalesOrder {
        let mut order = SalesOrder::draft(remote.order_id.clone());
        order.store_name = store.store_name.clone();
        order.marketplace_name = store.marketplace_name.clone();
        order.marketplace_order_id = remote.order_number.clone();
        order.customer = customer.name.clone();
        order.customer_name = remote.customer_email.clone();
        order.company = store.company.clone();
        order.customer_notes = remote.customer_notes.clone();
        order.internal_notes = remote.internal_notes.clone();
        order.transaction_date = remote.order_date;
        order.delivery_date = remote.ship_date;
        order.shipping_address = customer.primary_address.clone();
        order.integration_source = settings.name.clone();
        order.has_pii = true;
        order.owner = ctx.acting_user.clone();
        order.sales_partner = store.sales_partner.clone();
        order
    }
}
