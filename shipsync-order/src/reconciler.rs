use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use shipsync_core::remote::RemoteOrder;
use shipsync_core::settings::StoreConfig;
use shipsync_core::SyncResult;

use crate::formula;
use crate::models::{ChargeKind, ChargeLine, DiscountBasis, SalesOrder};
use crate::repository::PartnerDirectory;

/// Computes the charge lines, discount settings and partner commission for
/// an order that already has its merchandise lines.
pub struct FinancialReconciler {
    partners: Arc<dyn PartnerDirectory>,
}

impl FinancialReconciler {
    pub fn new(partners: Arc<dyn PartnerDirectory>) -> Self {
        Self { partners }
    }

    /// Append charges and discount settings to the order.
    ///
    /// The stored totals are refreshed once, after the tax and shipping
    /// charges: the difference comparison and the commission formula both
    /// read that snapshot, while the later corrective lines deliberately do
    /// not feed back into it.
    pub async fn reconcile(
        &self,
        order: &mut SalesOrder,
        remote: &RemoteOrder,
        store: &StoreConfig,
        discount_total: Decimal,
    ) -> SyncResult<()> {
        if !remote.tax_amount.is_zero() {
            order.add_charge(ChargeLine {
                kind: ChargeKind::Tax,
                account: store.tax_account.clone(),
                description: "Marketplace Tax Amount".to_string(),
                amount: remote.tax_amount,
                cost_center: store.cost_center.clone(),
                included_in_paid_amount: false,
            });
        }

        if !remote.shipping_amount.is_zero() {
            order.add_charge(ChargeLine {
                kind: ChargeKind::Shipping,
                account: store.shipping_income_account.clone(),
                description: "Marketplace Shipping Amount".to_string(),
                amount: remote.shipping_amount,
                cost_center: store.cost_center.clone(),
                included_in_paid_amount: false,
            });
        }

        order.recompute_totals();

        self.apply_difference(order, remote, store);
        self.apply_withholding(order, remote, store);

        if discount_total > Decimal::ZERO {
            order.apply_discount_on = Some(DiscountBasis::GrandTotal);
            order.discount_amount = discount_total;
        }

        self.apply_commission(order, store).await?;
        Ok(())
    }

    /// Corrective charge when the computed total disagrees with what the
    /// marketplace actually collected.
    fn apply_difference(&self, order: &mut SalesOrder, remote: &RemoteOrder, store: &StoreConfig) {
        let Some(amount_paid) = remote.amount_paid else {
            return;
        };

        let difference = order.grand_total - amount_paid.round_dp(2);
        if difference.is_zero() {
            return;
        }

        // Shipping reported but never collected (e.g. fulfilled-by-marketplace
        // orders) shows up as a discrepancy of exactly the shipping amount;
        // route the offset to shipping income rather than the difference
        // account.
        let account = if difference == remote.shipping_amount {
            store.shipping_income_account.clone()
        } else {
            store.difference_account.clone()
        };

        order.add_charge(ChargeLine {
            kind: ChargeKind::Difference,
            account,
            description: "Marketplace Difference Amount".to_string(),
            amount: -difference,
            cost_center: store.cost_center.clone(),
            included_in_paid_amount: false,
        });
    }

    /// Reverse the reported tax when the store operates under withholding:
    /// a second tax-account line negating the original charge.
    fn apply_withholding(&self, order: &mut SalesOrder, remote: &RemoteOrder, store: &StoreConfig) {
        if !store.withholding || remote.tax_amount.is_zero() {
            return;
        }

        order.add_charge(ChargeLine {
            kind: ChargeKind::Withholding,
            account: store.tax_account.clone(),
            description: "Marketplace Tax Amount".to_string(),
            amount: -remote.tax_amount,
            cost_center: store.cost_center.clone(),
            included_in_paid_amount: false,
        });
    }

    /// Formula-driven partner commission. A failing formula is logged and
    /// skipped; it never blocks order creation.
    async fn apply_commission(&self, order: &mut SalesOrder, store: &StoreConfig) -> SyncResult<()> {
        let Some(partner) = order.sales_partner.clone() else {
            return Ok(());
        };
        if !store.apply_commission {
            return Ok(());
        }
        let Some(template) = self.partners.commission_formula(&partner).await? else {
            return Ok(());
        };

        match formula::evaluate(&template, &order.formula_vars()) {
            Ok(commission) if !commission.is_zero() => {
                order.add_charge(ChargeLine {
                    kind: ChargeKind::Commission,
                    account: store.commission_account.clone(),
                    description: format!("Commission of {commission}"),
                    amount: -commission,
                    cost_center: store.cost_center.clone(),
                    included_in_paid_amount: true,
                });
            }
            Ok(_) => {}
            Err(err) => {
                warn!(partner = %partner, error = %err, "commission formula failed, skipping commission");
            }
        }
        Ok(())
    }
}
