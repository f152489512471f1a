pub mod assembler;
pub mod formula;
pub mod hooks;
pub mod mapper;
pub mod models;
pub mod reconciler;
pub mod repository;

pub use assembler::OrderAssembler;
pub use hooks::{ChannelHooks, HookRegistry, NoopHooks};
pub use mapper::{LineItemMapper, MappedItems};
pub use models::{ChargeKind, ChargeLine, DiscountBasis, OrderLine, OrderStatus, SalesOrder};
pub use reconciler::FinancialReconciler;
pub use repository::{OrderRepository, PartnerDirectory};
