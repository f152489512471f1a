use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of an internal sales order.
/// Draft orders exist only in memory; Saved orders have a persisted record;
/// Submitted is terminal and immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Draft,
    Saved,
    Submitted,
}

/// Basis the discount amount is applied against by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountBasis {
    GrandTotal,
    NetTotal,
}

/// What a charge line represents, accounting-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    Tax,
    Shipping,
    Difference,
    Withholding,
    Commission,
}

/// A signed monetary adjustment attached to an order.
/// Sign convention: tax and shipping are positive charges; difference,
/// withholding reversal and commission are negative deductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeLine {
    pub kind: ChargeKind,
    pub account: String,
    pub description: String,
    pub amount: Decimal,
    pub cost_center: String,
    #[serde(default)]
    pub included_in_paid_amount: bool,
}

/// A merchandise line on an internal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_code: String,
    pub qty: i64,
    pub rate: Decimal,
    pub warehouse: String,
    /// Linkage back to the remote platform's line item.
    pub remote_item_id: String,
    pub notes: Option<String>,
}

/// The internal sales-order aggregate built from a remote order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: Uuid,
    pub status: OrderStatus,
    pub store_name: String,
    pub remote_order_id: String,
    pub marketplace_name: String,
    pub marketplace_order_id: String,
    pub customer: String,
    /// Display name; carries the remote customer email.
    pub customer_name: String,
    pub company: String,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub transaction_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    /// Tenant this order was synced under.
    pub integration_source: String,
    pub has_pii: bool,
    /// Identity the creating run acted as.
    pub owner: Option<String>,
    pub sales_partner: Option<String>,
    pub lines: Vec<OrderLine>,
    pub charges: Vec<ChargeLine>,
    pub apply_discount_on: Option<DiscountBasis>,
    /// Applied against `apply_discount_on` by the persistence layer; not a
    /// charge line and not part of the stored totals here.
    pub discount_amount: Decimal,
    pub net_total: Decimal,
    pub grand_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesOrder {
    /// Start a new draft for a remote order.
    pub fn draft(remote_order_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: OrderStatus::Draft,
            store_name: String::new(),
            remote_order_id: remote_order_id.into(),
            marketplace_name: String::new(),
            marketplace_order_id: String::new(),
            customer: String::new(),
            customer_name: String::new(),
            company: String::new(),
            customer_notes: None,
            internal_notes: None,
            transaction_date: now.date_naive(),
            delivery_date: None,
            shipping_address: None,
            billing_address: None,
            integration_source: String::new(),
            has_pii: true,
            owner: None,
            sales_partner: None,
            lines: Vec::new(),
            charges: Vec::new(),
            apply_discount_on: None,
            discount_amount: Decimal::ZERO,
            net_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_line(&mut self, line: OrderLine) {
        self.lines.push(line);
        self.updated_at = Utc::now();
    }

    pub fn add_charge(&mut self, charge: ChargeLine) {
        self.charges.push(charge);
        self.updated_at = Utc::now();
    }

    /// Merchandise total across all lines, rounded to 2 decimal places.
    pub fn merchandise_total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.rate * Decimal::from(line.qty))
            .sum::<Decimal>()
            .round_dp(2)
    }

    pub fn total_qty(&self) -> i64 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    pub fn charge_total(&self) -> Decimal {
        self.charges.iter().map(|charge| charge.amount).sum()
    }

    /// Refresh the stored totals from lines and charges. The discount amount
    /// is deliberately excluded; the persistence layer applies it downstream.
    pub fn recompute_totals(&mut self) {
        self.net_total = self.merchandise_total();
        self.grand_total = (self.net_total + self.charge_total()).round_dp(2);
        self.updated_at = Utc::now();
    }

    /// Variables exposed to commission formulas.
    pub fn formula_vars(&self) -> HashMap<String, Decimal> {
        let mut vars = HashMap::new();
        vars.insert("grand_total".to_string(), self.grand_total);
        vars.insert("net_total".to_string(), self.net_total);
        vars.insert("discount_amount".to_string(), self.discount_amount);
        vars.insert("total_qty".to_string(), Decimal::from(self.total_qty()));
        vars
    }

    /// Transition: Draft → Saved. Re-saving an already-saved order is fine;
    /// saving a submitted one is not.
    pub fn mark_saved(&mut self) -> Result<(), OrderStateError> {
        match self.status {
            OrderStatus::Draft | OrderStatus::Saved => {
                self.status = OrderStatus::Saved;
                self.updated_at = Utc::now();
                Ok(())
            }
            OrderStatus::Submitted => Err(OrderStateError::InvalidTransition {
                from: "SUBMITTED".to_string(),
                to: "SAVED".to_string(),
            }),
        }
    }

    /// Transition: Saved → Submitted (terminal).
    pub fn mark_submitted(&mut self) -> Result<(), OrderStateError> {
        if self.status != OrderStatus::Saved {
            return Err(OrderStateError::InvalidTransition {
                from: format!("{:?}", self.status),
                to: "SUBMITTED".to_string(),
            });
        }
        self.status = OrderStatus::Submitted;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderStateError {
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
