//! Order totals are derived from the charged line items alone. The client's cart never feeds into them.
use log::*;
use serde::{Deserialize, Serialize};
use storefront_common::Cents;

use crate::sfe_api::reconciliation_objects::{FulfillmentPolicy, PaidLineItem};

/// Charged lines split into the shipping charge and the purchased products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedLines {
    pub shipping: Vec<PaidLineItem>,
    pub products: Vec<PaidLineItem>,
}

pub fn partition_line_items(lines: Vec<PaidLineItem>, policy: &FulfillmentPolicy) -> PartitionedLines {
    let (shipping, products) = lines.into_iter().partition(|line| policy.is_shipping_line(line));
    PartitionedLines { shipping, products }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Cents,
    pub shipping: Cents,
    pub tax: Cents,
    /// The total of record. This is the provider's charged amount when it is known.
    pub total: Cents,
}

impl OrderTotals {
    /// * `subtotal` is the sum of all product line amounts, whether or not they match a catalog product.
    /// * `shipping` is the shipping line amount, or zero if checkout omitted the line.
    /// * `tax` is the policy rate applied to subtotal plus shipping.
    /// * `total` is `charged_total` if the provider reported one, else the computed sum.
    pub fn derive(lines: &PartitionedLines, charged_total: Option<Cents>, policy: &FulfillmentPolicy) -> Self {
        if lines.shipping.len() > 1 {
            warn!("🧮️ {} shipping lines found on one session. Their amounts will be added together.", lines.shipping.len());
        }
        let subtotal = lines.products.iter().map(|l| l.amount_total).sum::<Cents>();
        let shipping = lines.shipping.iter().map(|l| l.amount_total).sum::<Cents>();
        let tax = (subtotal + shipping).percent_bps(policy.tax_rate_bps);
        let computed = subtotal + shipping + tax;
        let total = match charged_total {
            Some(charged) => charged,
            None => {
                warn!("🧮️ The session carries no charged total. Using the computed total of {computed}");
                computed
            },
        };
        Self { subtotal, shipping, tax, total }
    }

    pub fn computed_total(&self) -> Cents {
        self.subtotal + self.shipping + self.tax
    }

    /// True when the components add up to the total of record, to within one cent.
    pub fn is_consistent(&self) -> bool {
        self.computed_total().abs_diff(self.total) <= Cents::from(1)
    }
}
