use crate::core::bid::{Bid, BidStatus, LogisticsBid};
use crate::core::error::StoreError;
use crate::core::requirement::{Requirement, RequirementId};
use crate::core::supplier::{
    SupplierCategoryPerformance, SupplierId, SupplierInventorySignal, SupplierPerformance,
};
use crate::selection::audit::SelectionLogEntry;
use crate::store::snapshot::MarketplaceSnapshot;
use crate::store::{
    BidStore, InventoryStore, LogisticsBidStore, PerformanceStore, RequirementStore,
    SelectionLogStore,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of every collaborator store.
///
/// Seeded from a [`MarketplaceSnapshot`]; the only write path is the
/// selection log, which is append-only.
#[derive(Debug, Default)]
pub struct InMemoryMarketplace {
    requirements: RwLock<HashMap<RequirementId, Requirement>>,
    bids: RwLock<Vec<Bid>>,
    performance: RwLock<HashMap<SupplierId, SupplierPerformance>>,
    category_performance: RwLock<Vec<SupplierCategoryPerformance>>,
    inventory: RwLock<Vec<SupplierInventorySignal>>,
    logistics_bids: RwLock<Vec<LogisticsBid>>,
    selection_log: RwLock<Vec<SelectionLogEntry>>,
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: MarketplaceSnapshot) -> Self {
        let MarketplaceSnapshot {
            requirements,
            bids,
            supplier_performance,
            supplier_category_performance,
            supplier_inventory_signals,
            logistics_bids,
        } = snapshot;

        Self {
            requirements: RwLock::new(
                requirements
                    .into_iter()
                    .map(|r| (r.id.clone(), r))
                    .collect(),
            ),
            bids: RwLock::new(bids),
            performance: RwLock::new(
                supplier_performance
                    .into_iter()
                    .map(|p| (p.supplier_id.clone(), p))
                    .collect(),
            ),
            category_performance: RwLock::new(supplier_category_performance),
            inventory: RwLock::new(supplier_inventory_signals),
            logistics_bids: RwLock::new(logistics_bids),
            selection_log: RwLock::new(Vec::new()),
        }
    }

    pub async fn add_requirement(&self, requirement: Requirement) {
        self.requirements
            .write()
            .await
            .insert(requirement.id.clone(), requirement);
    }

    pub async fn add_bid(&self, bid: Bid) {
        self.bids.write().await.push(bid);
    }

    pub async fn add_performance(&self, performance: SupplierPerformance) {
        self.performance
            .write()
            .await
            .insert(performance.supplier_id.clone(), performance);
    }

    pub async fn add_category_performance(&self, row: SupplierCategoryPerformance) {
        self.category_performance.write().await.push(row);
    }

    pub async fn add_inventory_signal(&self, signal: SupplierInventorySignal) {
        self.inventory.write().await.push(signal);
    }

    pub async fn add_logistics_bid(&self, bid: LogisticsBid) {
        self.logistics_bids.write().await.push(bid);
    }

    /// Every audit entry written so far, oldest first.
    pub async fn selection_log(&self) -> Vec<SelectionLogEntry> {
        self.selection_log.read().await.clone()
    }
}

#[async_trait]
impl RequirementStore for InMemoryMarketplace {
    async fn get_requirement(&self, id: &RequirementId) -> Result<Option<Requirement>, StoreError> {
        Ok(self.requirements.read().await.get(id).cloned())
    }
}

#[async_trait]
impl BidStore for InMemoryMarketplace {
    async fn pending_bids(&self, requirement_id: &RequirementId) -> Result<Vec<Bid>, StoreError> {
        Ok(self
            .bids
            .read()
            .await
            .iter()
            .filter(|b| &b.requirement_id == requirement_id && b.is_pending())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PerformanceStore for InMemoryMarketplace {
    async fn supplier_performance(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Option<SupplierPerformance>, StoreError> {
        Ok(self.performance.read().await.get(supplier_id).cloned())
    }

    async fn category_performance(
        &self,
        supplier_id: &SupplierId,
        category: &str,
    ) -> Result<Option<SupplierCategoryPerformance>, StoreError> {
        Ok(self
            .category_performance
            .read()
            .await
            .iter()
            .find(|row| &row.supplier_id == supplier_id && row.category == category)
            .cloned())
    }

    async fn top_category_performers(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SupplierCategoryPerformance>, StoreError> {
        let mut rows: Vec<SupplierCategoryPerformance> = self
            .category_performance
            .read()
            .await
            .iter()
            .filter(|row| row.category == category)
            .cloned()
            .collect();
        // Stable: equal win counts keep insertion order.
        rows.sort_by(|a, b| b.l1_wins.cmp(&a.l1_wins));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl InventoryStore for InMemoryMarketplace {
    async fn inventory_signals(
        &self,
        category: &str,
        min_quantity: Decimal,
        limit: usize,
    ) -> Result<Vec<SupplierInventorySignal>, StoreError> {
        let mut rows: Vec<SupplierInventorySignal> = self
            .inventory
            .read()
            .await
            .iter()
            .filter(|s| s.category == category && s.can_cover(min_quantity))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl LogisticsBidStore for InMemoryMarketplace {
    async fn accepted_logistics_bid(
        &self,
        requirement_id: &RequirementId,
    ) -> Result<Option<LogisticsBid>, StoreError> {
        Ok(self
            .logistics_bids
            .read()
            .await
            .iter()
            .find(|b| &b.requirement_id == requirement_id && b.status == BidStatus::Accepted)
            .cloned())
    }
}

#[async_trait]
impl SelectionLogStore for InMemoryMarketplace {
    async fn insert_selection_log(&self, entry: SelectionLogEntry) -> Result<(), StoreError> {
        self.selection_log.write().await.push(entry);
        Ok(())
    }
}
