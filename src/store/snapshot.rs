use crate::core::bid::{Bid, LogisticsBid};
use crate::core::error::StoreError;
use crate::core::requirement::Requirement;
use crate::core::supplier::{
    SupplierCategoryPerformance, SupplierInventorySignal, SupplierPerformance,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A point-in-time copy of every store the engine reads.
///
/// Top-level keys mirror the store names so exports from the marketplace
/// database can be loaded as-is:
///
/// ```json
/// {
///   "requirements": [{ "id": "REQ-1", "product_category": "steel", "quantity": 100 }],
///   "bids": [],
///   "supplier_performance": [],
///   "supplier_category_performance": [],
///   "supplier_inventory_signals": [],
///   "logistics_bids": []
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceSnapshot {
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub bids: Vec<Bid>,
    #[serde(default)]
    pub supplier_performance: Vec<SupplierPerformance>,
    #[serde(default)]
    pub supplier_category_performance: Vec<SupplierCategoryPerformance>,
    #[serde(default)]
    pub supplier_inventory_signals: Vec<SupplierInventorySignal>,
    #[serde(default)]
    pub logistics_bids: Vec<LogisticsBid>,
}

impl MarketplaceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject snapshots the stores could not answer consistently:
    /// duplicate requirement ids or duplicate performance rows.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut requirement_ids = HashSet::new();
        for req in &self.requirements {
            if !requirement_ids.insert(&req.id) {
                return Err(StoreError::Snapshot(format!(
                    "duplicate requirement id {}",
                    req.id
                )));
            }
        }

        let mut suppliers = HashSet::new();
        for perf in &self.supplier_performance {
            if !suppliers.insert(&perf.supplier_id) {
                return Err(StoreError::Snapshot(format!(
                    "duplicate performance row for supplier {}",
                    perf.supplier_id
                )));
            }
        }

        let mut pairs = HashSet::new();
        for row in &self.supplier_category_performance {
            if !pairs.insert((&row.supplier_id, row.category.as_str())) {
                return Err(StoreError::Snapshot(format!(
                    "duplicate category row for supplier {} in {}",
                    row.supplier_id, row.category
                )));
            }
        }
        Ok(())
    }
}
