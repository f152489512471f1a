pub mod context;
pub mod remote;
pub mod services;
pub mod settings;

pub use context::SyncContext;
pub use remote::{ItemOption, RemoteOrder, RemoteOrderItem};
pub use services::{CatalogService, CustomerRef, CustomerService, OrderQuery, RemoteOrderClient};
pub use settings::{Marketplace, StoreConfig, TenantSettings};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote transport error: {0}")]
    Transport(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
