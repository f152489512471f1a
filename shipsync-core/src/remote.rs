use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single name/value option attached to a remote line item.
/// An option named "Description" carries a human-readable item note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOption {
    pub name: String,
    pub value: String,
}

/// A line item as reported by the marketplace platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrderItem {
    pub order_item_id: String,
    pub sku: Option<String>,
    pub name: String,
    /// Synthetic entries (marketplace discounts) are tagged "discount" here.
    pub line_item_key: Option<String>,
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub options: Vec<ItemOption>,
}

impl RemoteOrderItem {
    /// The item note, taken from the first option named "Description".
    pub fn notes(&self) -> Option<String> {
        self.options
            .iter()
            .find(|opt| opt.name == "Description")
            .map(|opt| opt.value.clone())
    }
}

/// An order snapshot owned by the external fulfillment platform.
/// Read-only input to the pipeline; never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub order_id: String,
    /// The marketplace-facing order number (distinct from `order_id`).
    pub order_number: String,
    pub store_id: String,
    pub customer_email: String,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub order_total: Decimal,
    pub tax_amount: Decimal,
    pub shipping_amount: Decimal,
    pub amount_paid: Option<Decimal>,
    pub create_date: DateTime<Utc>,
    pub order_date: NaiveDate,
    pub ship_date: Option<NaiveDate>,
    /// Fulfillment warehouse assigned by the platform, if any.
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub items: Vec<RemoteOrderItem>,
}
