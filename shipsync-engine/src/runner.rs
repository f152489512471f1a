use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use shipsync_core::context::SyncContext;
use shipsync_core::settings::TenantSettings;
use shipsync_order::assembler::OrderAssembler;

use crate::fetcher::OrderFetcher;
use crate::validator::OrderValidator;

/// Counters for one synchronization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub fetched: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The idempotent "run synchronization" entry point. Tenants and stores are
/// processed sequentially; every failure is contained at the narrowest
/// granularity that lets the rest of the run proceed.
pub struct SyncRunner {
    fetcher: OrderFetcher,
    validator: OrderValidator,
    assembler: OrderAssembler,
    window_hours: i64,
}

impl SyncRunner {
    pub fn new(fetcher: OrderFetcher, validator: OrderValidator, assembler: OrderAssembler) -> Self {
        Self {
            fetcher,
            validator,
            assembler,
            window_hours: crate::fetcher::DEFAULT_WINDOW_HOURS,
        }
    }

    /// Override the fallback fetch window used when no checkpoint exists.
    pub fn with_window_hours(mut self, hours: i64) -> Self {
        self.window_hours = hours;
        self
    }

    pub async fn run(
        &self,
        tenants: &[TenantSettings],
        checkpoint: Option<DateTime<Utc>>,
    ) -> RunSummary {
        let run_id = Uuid::new_v4();
        let mut summary = RunSummary::default();

        for tenant in tenants {
            if !tenant.enabled {
                continue;
            }

            // The acting identity is scoped to this tenant's portion of the
            // run, never set process-wide.
            let ctx = SyncContext {
                run_id,
                acting_user: tenant.acting_user.clone(),
            };

            for store in &tenant.stores {
                if !store.enabled {
                    continue;
                }

                // Each store's window is computed from "now" at iteration
                // time.
                let window_end = Utc::now();
                let window_start =
                    OrderFetcher::window_start(checkpoint, window_end, self.window_hours);

                let Some(orders) = self
                    .fetcher
                    .fetch_store(store, window_start, window_end, tenant.request_timeout())
                    .await
                else {
                    continue;
                };
                summary.fetched += orders.len();

                for order in &orders {
                    match self.validator.is_eligible(tenant, order, store).await {
                        Ok(true) => {}
                        Ok(false) => {
                            summary.skipped += 1;
                            continue;
                        }
                        Err(err) => {
                            error!(
                                remote_order_id = %order.order_id,
                                error = %err,
                                "order validation failed"
                            );
                            summary.failed += 1;
                            continue;
                        }
                    }

                    match self.assembler.assemble(&ctx, order, store, tenant).await {
                        Ok(Some(_)) => summary.created += 1,
                        Ok(None) => summary.skipped += 1,
                        Err(err) => {
                            error!(
                                remote_order_id = %order.order_id,
                                error = %err,
                                "failed to create internal order"
                            );
                            summary.failed += 1;
                        }
                    }
                }
            }
        }

        info!(
            run_id = %run_id,
            fetched = summary.fetched,
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "synchronization run finished"
        );
        summary
    }
}

/// Queues synchronization runs on a background task, guaranteeing that a
/// duplicate run is never scheduled while one is already pending.
pub struct SyncScheduler {
    pending: Arc<AtomicBool>,
    tx: mpsc::Sender<()>,
}

impl SyncScheduler {
    /// Spawn the background worker and return a handle for enqueuing runs.
    pub fn spawn(runner: Arc<SyncRunner>, tenants: Vec<TenantSettings>) -> Self {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let pending = Arc::new(AtomicBool::new(false));
        let guard = pending.clone();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                runner.run(&tenants, None).await;
                guard.store(false, Ordering::SeqCst);
            }
        });

        Self { pending, tx }
    }

    /// Enqueue a run unless one is already pending. Returns whether a new
    /// run was actually queued.
    pub fn enqueue(&self) -> bool {
        if self.pending.swap(true, Ordering::SeqCst) {
            return false;
        }
        if self.tx.try_send(()).is_err() {
            self.pending.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}
