pub mod fetcher;
pub mod runner;
pub mod validator;

pub use fetcher::{OrderFetcher, DEFAULT_WINDOW_HOURS};
pub use runner::{RunSummary, SyncRunner, SyncScheduler};
pub use validator::OrderValidator;
