//! Candidate gathering as an ordered list of sources.
//!
//! Bidding tries pending bids, then category history, then inventory.
//! Auto-assignment starts at category history. The first source that
//! yields anything wins; if none does, the call fails.

use crate::core::bid::{Bid, BidId};
use crate::core::error::{SelectionError, StoreError};
use crate::core::requirement::Requirement;
use crate::core::supplier::{SupplierCategoryPerformance, SupplierId, SupplierInventorySignal};
use crate::selection::policy::SelectionMode;
use crate::store::{Stores, CATEGORY_CANDIDATE_LIMIT, INVENTORY_CANDIDATE_LIMIT};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback reason recorded when a bidding request found no bids.
pub const NO_BIDS_FALLBACK_REASON: &str = "No bids received, auto-assigned based on historical data";

/// Which source produced the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateTier {
    PendingBids,
    CategoryHistory,
    InventorySignals,
}

impl CandidateTier {
    /// The strategy that actually ran when this tier produced the candidates.
    pub fn executed_mode(&self) -> SelectionMode {
        match self {
            CandidateTier::PendingBids => SelectionMode::Bidding,
            CandidateTier::CategoryHistory | CandidateTier::InventorySignals => {
                SelectionMode::AutoAssign
            }
        }
    }
}

impl fmt::Display for CandidateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CandidateTier::PendingBids => "pending bids",
            CandidateTier::CategoryHistory => "category history",
            CandidateTier::InventorySignals => "inventory signals",
        };
        f.write_str(s)
    }
}

/// The row a candidate was discovered from.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOrigin {
    Bid(Bid),
    CategoryHistory(SupplierCategoryPerformance),
    Inventory(SupplierInventorySignal),
}

/// A supplier under consideration for one requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub supplier_id: SupplierId,
    pub origin: CandidateOrigin,
}

impl Candidate {
    pub fn from_bid(bid: Bid) -> Self {
        Self {
            supplier_id: bid.supplier_id.clone(),
            origin: CandidateOrigin::Bid(bid),
        }
    }

    pub fn from_category_history(row: SupplierCategoryPerformance) -> Self {
        Self {
            supplier_id: row.supplier_id.clone(),
            origin: CandidateOrigin::CategoryHistory(row),
        }
    }

    pub fn from_inventory(signal: SupplierInventorySignal) -> Self {
        Self {
            supplier_id: signal.supplier_id.clone(),
            origin: CandidateOrigin::Inventory(signal),
        }
    }

    pub fn tier(&self) -> CandidateTier {
        match self.origin {
            CandidateOrigin::Bid(_) => CandidateTier::PendingBids,
            CandidateOrigin::CategoryHistory(_) => CandidateTier::CategoryHistory,
            CandidateOrigin::Inventory(_) => CandidateTier::InventorySignals,
        }
    }

    pub fn bid_id(&self) -> Option<&BidId> {
        match &self.origin {
            CandidateOrigin::Bid(bid) => Some(&bid.id),
            _ => None,
        }
    }
}

/// One tier of the candidate cascade.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn tier(&self) -> CandidateTier;

    async fn gather(
        &self,
        requirement: &Requirement,
        stores: &Stores,
    ) -> Result<Vec<Candidate>, StoreError>;
}

/// Pending bids on the requirement.
pub struct PendingBidSource;

#[async_trait]
impl CandidateSource for PendingBidSource {
    fn tier(&self) -> CandidateTier {
        CandidateTier::PendingBids
    }

    async fn gather(
        &self,
        requirement: &Requirement,
        stores: &Stores,
    ) -> Result<Vec<Candidate>, StoreError> {
        let bids = stores.bids.pending_bids(&requirement.id).await?;
        Ok(bids.into_iter().map(Candidate::from_bid).collect())
    }
}

/// Historical L1 winners in the requirement's category.
pub struct CategoryHistorySource {
    pub limit: usize,
}

impl Default for CategoryHistorySource {
    fn default() -> Self {
        Self {
            limit: CATEGORY_CANDIDATE_LIMIT,
        }
    }
}

#[async_trait]
impl CandidateSource for CategoryHistorySource {
    fn tier(&self) -> CandidateTier {
        CandidateTier::CategoryHistory
    }

    async fn gather(
        &self,
        requirement: &Requirement,
        stores: &Stores,
    ) -> Result<Vec<Candidate>, StoreError> {
        let rows = stores
            .performance
            .top_category_performers(&requirement.product_category, self.limit)
            .await?;
        Ok(rows.into_iter().map(Candidate::from_category_history).collect())
    }
}

/// Suppliers reporting enough stock to cover the requested quantity.
pub struct InventorySignalSource {
    pub limit: usize,
}

impl Default for InventorySignalSource {
    fn default() -> Self {
        Self {
            limit: INVENTORY_CANDIDATE_LIMIT,
        }
    }
}

#[async_trait]
impl CandidateSource for InventorySignalSource {
    fn tier(&self) -> CandidateTier {
        CandidateTier::InventorySignals
    }

    async fn gather(
        &self,
        requirement: &Requirement,
        stores: &Stores,
    ) -> Result<Vec<Candidate>, StoreError> {
        let signals = stores
            .inventory
            .inventory_signals(&requirement.product_category, requirement.quantity, self.limit)
            .await?;
        Ok(signals.into_iter().map(Candidate::from_inventory).collect())
    }
}

/// Candidates from the first non-empty tier.
#[derive(Debug, Clone)]
pub struct GatheredCandidates {
    pub requested_mode: SelectionMode,
    pub tier: CandidateTier,
    pub candidates: Vec<Candidate>,
}

impl GatheredCandidates {
    pub fn executed_mode(&self) -> SelectionMode {
        self.tier.executed_mode()
    }

    /// Set when bidding was requested but no bid tier produced candidates.
    pub fn fallback_reason(&self) -> Option<&'static str> {
        match (self.requested_mode, self.tier) {
            (SelectionMode::Bidding, CandidateTier::PendingBids) => None,
            (SelectionMode::Bidding, _) => Some(NO_BIDS_FALLBACK_REASON),
            (SelectionMode::AutoAssign, _) => None,
        }
    }
}

/// Ordered candidate sources, tried until one yields a non-empty list.
pub struct CandidatePipeline {
    mode: SelectionMode,
    sources: Vec<Box<dyn CandidateSource>>,
}

impl CandidatePipeline {
    pub fn new(mode: SelectionMode, sources: Vec<Box<dyn CandidateSource>>) -> Self {
        Self { mode, sources }
    }

    pub fn for_mode(mode: SelectionMode) -> Self {
        let mut sources: Vec<Box<dyn CandidateSource>> = Vec::with_capacity(3);
        if mode == SelectionMode::Bidding {
            sources.push(Box::new(PendingBidSource));
        }
        sources.push(Box::new(CategoryHistorySource::default()));
        sources.push(Box::new(InventorySignalSource::default()));
        Self::new(mode, sources)
    }

    pub fn tiers(&self) -> Vec<CandidateTier> {
        self.sources.iter().map(|s| s.tier()).collect()
    }

    pub async fn gather(
        &self,
        requirement: &Requirement,
        stores: &Stores,
    ) -> Result<GatheredCandidates, SelectionError> {
        for source in &self.sources {
            let candidates = source.gather(requirement, stores).await?;
            if candidates.is_empty() {
                log::warn!(
                    "requirement {}: no candidates from {}, falling back",
                    requirement.id,
                    source.tier()
                );
                continue;
            }
            log::debug!(
                "requirement {}: {} candidates from {}",
                requirement.id,
                candidates.len(),
                source.tier()
            );
            return Ok(GatheredCandidates {
                requested_mode: self.mode,
                tier: source.tier(),
                candidates,
            });
        }

        Err(SelectionError::NoSuppliersAvailable {
            category: requirement.product_category.clone(),
        })
    }
}
