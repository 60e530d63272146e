//! Typed repositories for the collaborator stores the engine reads and writes.
//!
//! Every read returns `Option` or `Vec` so a missing row is a value, not an
//! error. `StoreError` is reserved for the store itself failing.

pub mod memory;
pub mod snapshot;

use crate::core::bid::{Bid, LogisticsBid};
use crate::core::error::StoreError;
use crate::core::requirement::{Requirement, RequirementId};
use crate::core::supplier::{
    SupplierCategoryPerformance, SupplierId, SupplierInventorySignal, SupplierPerformance,
};
use crate::selection::audit::SelectionLogEntry;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub use memory::InMemoryMarketplace;
pub use snapshot::MarketplaceSnapshot;

/// Category rows considered by auto-assignment.
pub const CATEGORY_CANDIDATE_LIMIT: usize = 10;
/// Inventory rows considered when no category history exists.
pub const INVENTORY_CANDIDATE_LIMIT: usize = 5;

#[async_trait]
pub trait RequirementStore: Send + Sync {
    async fn get_requirement(&self, id: &RequirementId) -> Result<Option<Requirement>, StoreError>;
}

#[async_trait]
pub trait BidStore: Send + Sync {
    /// Pending bids on a requirement, in submission order.
    async fn pending_bids(&self, requirement_id: &RequirementId) -> Result<Vec<Bid>, StoreError>;
}

#[async_trait]
pub trait PerformanceStore: Send + Sync {
    async fn supplier_performance(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<Option<SupplierPerformance>, StoreError>;

    async fn category_performance(
        &self,
        supplier_id: &SupplierId,
        category: &str,
    ) -> Result<Option<SupplierCategoryPerformance>, StoreError>;

    /// Category rows ordered by `l1_wins` descending, at most `limit`.
    async fn top_category_performers(
        &self,
        category: &str,
        limit: usize,
    ) -> Result<Vec<SupplierCategoryPerformance>, StoreError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Signals able to cover `min_quantity`, most recently updated first, at most `limit`.
    async fn inventory_signals(
        &self,
        category: &str,
        min_quantity: Decimal,
        limit: usize,
    ) -> Result<Vec<SupplierInventorySignal>, StoreError>;
}

#[async_trait]
pub trait LogisticsBidStore: Send + Sync {
    async fn accepted_logistics_bid(
        &self,
        requirement_id: &RequirementId,
    ) -> Result<Option<LogisticsBid>, StoreError>;
}

#[async_trait]
pub trait SelectionLogStore: Send + Sync {
    async fn insert_selection_log(&self, entry: SelectionLogEntry) -> Result<(), StoreError>;
}

/// The set of stores one selection call talks to.
#[derive(Clone)]
pub struct Stores {
    pub requirements: Arc<dyn RequirementStore>,
    pub bids: Arc<dyn BidStore>,
    pub performance: Arc<dyn PerformanceStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub logistics: Arc<dyn LogisticsBidStore>,
    pub selection_log: Arc<dyn SelectionLogStore>,
}

impl Stores {
    /// Back every store with the same in-memory marketplace.
    pub fn in_memory(marketplace: Arc<InMemoryMarketplace>) -> Self {
        Self {
            requirements: marketplace.clone(),
            bids: marketplace.clone(),
            performance: marketplace.clone(),
            inventory: marketplace.clone(),
            logistics: marketplace.clone(),
            selection_log: marketplace,
        }
    }

    /// Replace the audit log sink, keeping every other store.
    pub fn with_selection_log(mut self, selection_log: Arc<dyn SelectionLogStore>) -> Self {
        self.selection_log = selection_log;
        self
    }
}
