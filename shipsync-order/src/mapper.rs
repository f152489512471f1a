use std::sync::Arc;

use rust_decimal::Decimal;

use shipsync_core::remote::RemoteOrderItem;
use shipsync_core::services::CatalogService;
use shipsync_core::settings::{StoreConfig, TenantSettings};
use shipsync_core::SyncResult;

use crate::models::OrderLine;

/// The only way the remote API marks a marketplace discount is this tag on
/// the line item.
const DISCOUNT_LINE_KEY: &str = "discount";

/// Result of mapping remote line items: true merchandise lines plus the
/// accumulated marketplace discount.
#[derive(Debug, Clone)]
pub struct MappedItems {
    pub lines: Vec<OrderLine>,
    pub discount_total: Decimal,
}

impl MappedItems {
    pub fn has_merchandise(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Converts remote line items into internal order lines, splitting out
/// discount pseudo-lines.
pub struct LineItemMapper {
    catalog: Arc<dyn CatalogService>,
}

impl LineItemMapper {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    pub async fn map_items(
        &self,
        items: &[RemoteOrderItem],
        settings: &TenantSettings,
        store: &StoreConfig,
    ) -> SyncResult<MappedItems> {
        let mut lines = Vec::new();
        let mut discount_total = Decimal::ZERO;

        for item in items {
            if item.quantity < 1 {
                continue;
            }

            let rate = item.unit_price.unwrap_or(Decimal::ZERO);

            if item.line_item_key.as_deref() == Some(DISCOUNT_LINE_KEY) {
                discount_total += (rate * Decimal::from(item.quantity)).abs();
                continue;
            }

            let item_code = self
                .catalog
                .resolve_or_create_item(item, settings, store)
                .await?;

            lines.push(OrderLine {
                item_code,
                qty: item.quantity,
                rate,
                warehouse: store.warehouse.clone(),
                remote_item_id: item.order_item_id.clone(),
                notes: item.notes(),
            });
        }

        Ok(MappedItems {
            lines,
            discount_total,
        })
    }
}
