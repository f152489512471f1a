use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use shipsync_core::remote::{RemoteOrder, RemoteOrderItem};
use shipsync_core::settings::{Marketplace, StoreConfig, TenantSettings};
use shipsync_engine::{OrderFetcher, OrderValidator, SyncRunner};
use shipsync_order::assembler::OrderAssembler;
use shipsync_order::hooks::HookRegistry;
use shipsync_order::mapper::LineItemMapper;
use shipsync_order::models::{ChargeKind, OrderStatus};
use shipsync_order::reconciler::FinancialReconciler;
use shipsync_store::{
    MemoryCatalogService, MemoryCustomerService, MemoryOrderRepository, MemoryPartnerDirectory,
    StaticRemoteClient,
};

struct Harness {
    runner: SyncRunner,
    repository: Arc<MemoryOrderRepository>,
    partners: Arc<MemoryPartnerDirectory>,
}

fn harness(orders: Vec<RemoteOrder>) -> Harness {
    let hooks = Arc::new(HookRegistry::new());
    let repository = Arc::new(MemoryOrderRepository::new());
    let partners = Arc::new(MemoryPartnerDirectory::new());
    let client = Arc::new(StaticRemoteClient::new(orders));

    let runner = SyncRunner::new(
        OrderFetcher::new(client, hooks.clone()),
        OrderValidator::new(repository.clone(), hooks.clone()),
        OrderAssembler::new(
            Arc::new(MemoryCustomerService::new()),
            repository.clone(),
            LineItemMapper::new(Arc::new(MemoryCatalogService::new())),
            FinancialReconciler::new(partners.clone()),
            hooks,
        ),
    );

    Harness {
        runner,
        repository,
        partners,
    }
}

fn store() -> StoreConfig {
    StoreConfig {
        store_id: "store-1".to_string(),
        store_name: "Acme Outlet".to_string(),
        company: "Acme".to_string(),
        enabled: true,
        marketplace: Marketplace::Generic,
        marketplace_name: "Generic".to_string(),
        customer: None,
        warehouse: "Main".to_string(),
        tax_account: "Tax Account".to_string(),
        shipping_income_account: "Shipping Income".to_string(),
        difference_account: "Difference Account".to_string(),
        commission_account: "Commission Account".to_string(),
        cost_center: "Main CC".to_string(),
        sales_partner: None,
        apply_commission: false,
        withholding: false,
    }
}

fn tenant(stores: Vec<StoreConfig>) -> TenantSettings {
    TenantSettings {
        name: "acme".to_string(),
        enabled: true,
        active_warehouse_ids: Vec::new(),
        since_date: None,
        acting_user: Some("sync@acme.example".to_string()),
        request_timeout_secs: 300,
        stores,
    }
}

fn item(id: &str, key: Option<&str>, price: Decimal, qty: i64) -> RemoteOrderItem {
    RemoteOrderItem {
        order_item_id: id.to_string(),
        sku: Some(format!("SKU-{id}")),
        name: format!("Item {id}"),
        line_item_key: key.map(str::to_string),
        quantity: qty,
        unit_price: Some(price),
        options: Vec::new(),
    }
}

fn remote_order(id: &str, items: Vec<RemoteOrderItem>) -> RemoteOrder {
    RemoteOrder {
        order_id: id.to_string(),
        order_number: format!("A-{id}"),
        store_id: "store-1".to_string(),
        customer_email: "buyer@example.com".to_string(),
        customer_notes: None,
        internal_notes: None,
        order_total: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        shipping_amount: Decimal::ZERO,
        amount_paid: None,
        create_date: Utc::now() - Duration::hours(1),
        order_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        ship_date: NaiveDate::from_ymd_opt(2024, 5, 3),
        warehouse_id: Some("wh-1".to_string()),
        items,
    }
}

#[tokio::test]
async fn end_to_end_order_is_submitted_with_reconciled_charges() {
    let mut remote = remote_order(
        "100",
        vec![
            item("1", None, Decimal::from(10), 1),
            item("2", None, Decimal::from(20), 1),
        ],
    );
    remote.tax_amount = Decimal::new(300, 2);
    remote.shipping_amount = Decimal::new(500, 2);
    remote.amount_paid = Some(Decimal::new(3800, 2));

    let h = harness(vec![remote]);
    let summary = h.runner.run(&[tenant(vec![store()])], None).await;

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed, 0);

    let order = h.repository.submitted_order("100").unwrap();
    assert_eq!(order.status, OrderStatus::Submitted);
    assert_eq!(order.net_total, Decimal::from(30));
    assert_eq!(order.grand_total, Decimal::from(38));

    let kinds: Vec<ChargeKind> = order.charges.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ChargeKind::Tax, ChargeKind::Shipping]);
    assert_eq!(order.charges[0].amount, Decimal::new(300, 2));
    assert_eq!(order.charges[1].amount, Decimal::new(500, 2));
    assert_eq!(order.owner.as_deref(), Some("sync@acme.example"));
}

#[tokio::test]
async fn rerunning_an_overlapping_window_creates_no_duplicates() {
    let remote = remote_order("100", vec![item("1", None, Decimal::from(10), 1)]);
    let h = harness(vec![remote]);
    let tenants = [tenant(vec![store()])];

    let first = h.runner.run(&tenants, None).await;
    assert_eq!(first.created, 1);

    let second = h.runner.run(&tenants, None).await;
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(h.repository.submitted_count(), 1);
}

#[tokio::test]
async fn discount_only_orders_are_never_persisted() {
    let remote = remote_order(
        "100",
        vec![item("1", Some("discount"), Decimal::from(-5), 2)],
    );
    let h = harness(vec![remote]);

    let summary = h.runner.run(&[tenant(vec![store()])], None).await;
    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(h.repository.submitted_count(), 0);
}

#[tokio::test]
async fn discount_lines_set_the_order_discount() {
    let remote = remote_order(
        "100",
        vec![
            item("1", Some("discount"), Decimal::from(-5), 2),
            item("2", None, Decimal::from(10), 1),
        ],
    );
    let h = harness(vec![remote]);

    h.runner.run(&[tenant(vec![store()])], None).await;

    let order = h.repository.submitted_order("100").unwrap();
    assert_eq!(order.discount_amount, Decimal::from(10));
    assert_eq!(order.net_total, Decimal::from(10));
}

#[tokio::test]
async fn warehouse_allow_list_filters_orders() {
    let mut blocked = remote_order("100", vec![item("1", None, Decimal::from(10), 1)]);
    blocked.warehouse_id = Some("wh-9".to_string());
    let allowed = remote_order("101", vec![item("2", None, Decimal::from(10), 1)]);

    let h = harness(vec![blocked, allowed]);
    let mut tenant = tenant(vec![store()]);
    tenant.active_warehouse_ids = vec!["wh-1".to_string()];

    let summary = h.runner.run(&[tenant], None).await;
    assert_eq!(summary.created, 1);
    assert_eq!(summary.skipped, 1);
    assert!(h.repository.submitted_order("100").is_none());
    assert!(h.repository.submitted_order("101").is_some());
}

#[tokio::test]
async fn disabled_stores_and_tenants_are_skipped() {
    let remote = remote_order("100", vec![item("1", None, Decimal::from(10), 1)]);
    let h = harness(vec![remote]);

    let mut disabled_store = store();
    disabled_store.enabled = false;
    let mut disabled_tenant = tenant(vec![store()]);
    disabled_tenant.enabled = false;

    let summary = h
        .runner
        .run(&[disabled_tenant, tenant(vec![disabled_store])], None)
        .await;
    assert_eq!(summary.fetched, 0);
    assert_eq!(h.repository.submitted_count(), 0);
}

#[tokio::test]
async fn commission_is_charged_for_partnered_stores() {
    let remote = remote_order("100", vec![item("1", None, Decimal::from(200), 1)]);
    let h = harness(vec![remote]);
    h.partners
        .set_formula("Partner Co", "{{grand_total}} * 0.1");

    let mut store = store();
    store.sales_partner = Some("Partner Co".to_string());
    store.apply_commission = true;

    h.runner.run(&[tenant(vec![store])], None).await;

    let order = h.repository.submitted_order("100").unwrap();
    let commission = order
        .charges
        .iter()
        .find(|c| c.kind == ChargeKind::Commission)
        .unwrap();
    assert_eq!(commission.amount, Decimal::from(-20));
    assert!(commission.included_in_paid_amount);
}

#[tokio::test]
async fn malformed_commission_formula_does_not_block_submission() {
    let remote = remote_order("100", vec![item("1", None, Decimal::from(200), 1)]);
    let h = harness(vec![remote]);
    h.partners.set_formula("Partner Co", "{{grand_total}} %% oops");

    let mut store = store();
    store.sales_partner = Some("Partner Co".to_string());
    store.apply_commission = true;

    let summary = h.runner.run(&[tenant(vec![store])], None).await;
    assert_eq!(summary.created, 1);

    let order = h.repository.submitted_order("100").unwrap();
    assert!(order
        .charges
        .iter()
        .all(|c| c.kind != ChargeKind::Commission));
}

#[tokio::test]
async fn withholding_store_nets_tax_to_zero() {
    let mut remote = remote_order("100", vec![item("1", None, Decimal::from(50), 1)]);
    remote.tax_amount = Decimal::from(8);

    let h = harness(vec![remote]);
    let mut store = store();
    store.withholding = true;

    h.runner.run(&[tenant(vec![store])], None).await;

    let order = h.repository.submitted_order("100").unwrap();
    let tax_lines: Vec<_> = order
        .charges
        .iter()
        .filter(|c| c.account == "Tax Account")
        .collect();
    assert_eq!(tax_lines.len(), 2);
    assert_eq!(
        tax_lines.iter().map(|c| c.amount).sum::<Decimal>(),
        Decimal::ZERO
    );
}
