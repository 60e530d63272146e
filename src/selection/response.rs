use crate::selection::failsafe::SelectionResult;
use crate::selection::policy::ColdStartDefaults;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The only label a buyer ever sees for the chosen supplier.
pub const SUPPLIER_LABEL: &str = "ProcureSaathi Verified Supplier";

/// Anonymized answer returned to the buyer: price, ETA, label, and an
/// opaque correlation id. No supplier identity, score, or reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub estimated_delivery_days: u32,
    pub supplier_label: String,
    pub selection_id: String,
}

impl BuyerQuote {
    pub fn from_result(result: &SelectionResult, defaults: &ColdStartDefaults) -> Self {
        let selected = &result.selected_supplier;
        Self {
            final_price: selected.total_landed_cost,
            estimated_delivery_days: selected
                .estimated_delivery_days
                .unwrap_or(defaults.delivery_days),
            supplier_label: SUPPLIER_LABEL.to_string(),
            selection_id: selected.selection_id(),
        }
    }
}
