use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shipsync_engine::{OrderFetcher, OrderValidator, SyncRunner};
use shipsync_order::assembler::OrderAssembler;
use shipsync_order::hooks::HookRegistry;
use shipsync_order::mapper::LineItemMapper;
use shipsync_order::reconciler::FinancialReconciler;
use shipsync_store::{
    Config, MemoryCatalogService, MemoryCustomerService, MemoryOrderRepository,
    MemoryPartnerDirectory, StaticRemoteClient,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipsync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!(
        tenants = config.tenants.len(),
        window_hours = config.sync.window_hours,
        "Starting ShipSync engine"
    );

    // Reference wiring over the in-memory adapters; deployments swap in
    // ORM/HTTP-backed implementations of the same traits.
    let hooks = Arc::new(HookRegistry::new());
    let repository = Arc::new(MemoryOrderRepository::new());
    let client = Arc::new(StaticRemoteClient::default());

    let runner = SyncRunner::new(
        OrderFetcher::new(client, hooks.clone()),
        OrderValidator::new(repository.clone(), hooks.clone()),
        OrderAssembler::new(
            Arc::new(MemoryCustomerService::new()),
            repository,
            LineItemMapper::new(Arc::new(MemoryCatalogService::new())),
            FinancialReconciler::new(Arc::new(MemoryPartnerDirectory::new())),
            hooks,
        ),
    )
    .with_window_hours(config.sync.window_hours);

    let summary = runner.run(&config.tenants, None).await;
    tracing::info!(
        fetched = summary.fetched,
        created = summary.created,
        skipped = summary.skipped,
        failed = summary.failed,
        "run complete"
    );
}
