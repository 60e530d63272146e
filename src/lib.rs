//! # supplier-selection
//!
//! Supplier selection and ranking engine for B2B procurement requirements.
//!
//! Given a buyer requirement, this engine decides which supplier fulfils it,
//! either by competing the pending bids or by auto-assigning from
//! historical category winners and inventory signals. Candidates are
//! ranked on a weighted mix of landed cost, delivery risk and quality risk,
//! with a failsafe that swaps out a risky winner for a safer runner-up.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: requirements, bids, supplier aggregates, errors
//! - **store** — Typed repositories for the collaborator stores, plus an in-memory marketplace
//! - **selection** — Candidate gathering, cost, risk, scoring, failsafe, audit, buyer quote
//! - **service** — HTTP endpoint
//! - **simulation** — Random marketplace generation

pub mod config;
pub mod core;
pub mod selection;
pub mod service;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::bid::{Bid, BidId, BidStatus, LogisticsBid};
    pub use crate::core::error::{SelectionError, StoreError};
    pub use crate::core::requirement::{Requirement, RequirementId};
    pub use crate::core::supplier::{
        SupplierCategoryPerformance, SupplierId, SupplierInventorySignal, SupplierPerformance,
    };
    pub use crate::selection::engine::{SelectionEngine, SelectionOutcome};
    pub use crate::selection::failsafe::SelectionResult;
    pub use crate::selection::policy::{SelectionMode, SelectionPolicy};
    pub use crate::selection::response::BuyerQuote;
    pub use crate::store::{InMemoryMarketplace, MarketplaceSnapshot, Stores};
}
