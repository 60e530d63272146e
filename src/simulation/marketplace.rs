//! Random marketplace generation for benchmarks and demo data.

use crate::core::bid::{Bid, BidId, BidStatus, LogisticsBid};
use crate::core::requirement::{Requirement, RequirementId};
use crate::core::supplier::{
    SupplierCategoryPerformance, SupplierId, SupplierInventorySignal, SupplierPerformance,
};
use crate::store::snapshot::MarketplaceSnapshot;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Shape of a generated marketplace.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub supplier_count: usize,
    pub requirement_count: usize,
    pub categories: Vec<String>,
    /// Upper bound on pending bids per requirement (may be zero).
    pub max_bids_per_requirement: usize,
    /// Share of suppliers that have a performance record.
    pub performance_coverage: f64,
    pub min_unit_price: u32,
    pub max_unit_price: u32,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            supplier_count: 20,
            requirement_count: 10,
            categories: vec!["steel".to_string(), "cement".to_string()],
            max_bids_per_requirement: 5,
            performance_coverage: 0.8,
            min_unit_price: 100,
            max_unit_price: 5_000,
        }
    }
}

/// Generate a random but internally consistent snapshot.
pub fn generate_marketplace(config: &MarketplaceConfig) -> MarketplaceSnapshot {
    let mut rng = rand::thread_rng();
    let mut snapshot = MarketplaceSnapshot::new();
    if config.categories.is_empty() || config.supplier_count == 0 {
        return snapshot;
    }

    let suppliers: Vec<SupplierId> = (0..config.supplier_count)
        .map(|i| SupplierId::new(format!("SUP-{:03}", i)))
        .collect();
    let min_price = config.min_unit_price.min(config.max_unit_price);
    let max_price = config.max_unit_price.max(min_price + 1);

    for supplier in &suppliers {
        if rng.gen_bool(config.performance_coverage.clamp(0.0, 1.0)) {
            let total_orders = rng.gen_range(0..60u32);
            let late = rng.gen_range(0..=total_orders / 3);
            let rejections = rng.gen_range(0..=total_orders / 4);
            let complaints = rng.gen_range(0..=total_orders / 4);
            snapshot.supplier_performance.push(
                SupplierPerformance::new(
                    supplier.clone(),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.4..1.0),
                )
                .with_orders(total_orders)
                .with_late_deliveries(late)
                .with_quality_issues(rejections, complaints)
                .with_avg_delivery_days(rng.gen_range(2.0..20.0)),
            );
        }

        let category = &config.categories[rng.gen_range(0..config.categories.len())];
        let total = rng.gen_range(0..40u32);
        snapshot.supplier_category_performance.push(
            SupplierCategoryPerformance::new(
                supplier.clone(),
                category.clone(),
                rng.gen_range(0..15),
                Decimal::from(rng.gen_range(min_price..max_price)),
            )
            .with_deliveries(rng.gen_range(0..=total), total),
        );

        snapshot.supplier_inventory_signals.push(SupplierInventorySignal::new(
            supplier.clone(),
            category.clone(),
            Decimal::from(rng.gen_range(10..5_000u32)),
            Utc::now() - Duration::hours(rng.gen_range(0..720)),
        ));
    }

    for r in 0..config.requirement_count {
        let id = RequirementId::new(format!("REQ-{:04}", r));
        let category = &config.categories[rng.gen_range(0..config.categories.len())];
        let quantity = Decimal::from(rng.gen_range(10..1_000u32));
        let unit_price = Decimal::from(rng.gen_range(min_price..max_price));
        let budget_max = if rng.gen_bool(0.7) {
            Some(quantity * unit_price)
        } else {
            None
        };
        snapshot.requirements.push(
            Requirement::new(id.clone(), category.clone(), quantity)
                .with_unit("MT")
                .with_budget(None, budget_max),
        );

        let bid_count = rng.gen_range(0..=config.max_bids_per_requirement);
        let bidders: Vec<&SupplierId> = suppliers.choose_multiple(&mut rng, bid_count).collect();
        for (b, supplier) in bidders.into_iter().enumerate() {
            let price = Decimal::from(rng.gen_range(min_price..max_price));
            let mut bid = Bid::pending(
                BidId::new(format!("BID-{:04}-{:02}", r, b)),
                id.clone(),
                supplier.clone(),
                price * quantity,
            );
            if rng.gen_bool(0.1) {
                bid.status = BidStatus::Rejected;
            }
            snapshot.bids.push(bid);
        }

        if rng.gen_bool(0.3) {
            snapshot.logistics_bids.push(LogisticsBid::accepted(
                BidId::new(format!("LOG-{:04}", r)),
                id,
                Decimal::from(rng.gen_range(500..20_000u32)),
            ));
        }
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::engine::SelectionEngine;
    use crate::selection::policy::SelectionMode;
    use crate::store::{InMemoryMarketplace, Stores};
    use std::sync::Arc;

    #[test]
    fn test_generated_snapshot_is_valid() {
        let config = MarketplaceConfig {
            supplier_count: 15,
            requirement_count: 8,
            ..Default::default()
        };
        let snapshot = generate_marketplace(&config);
        assert_eq!(snapshot.requirements.len(), 8);
        assert_eq!(snapshot.supplier_category_performance.len(), 15);
        assert!(snapshot.validate().is_ok());
        assert!(snapshot
            .bids
            .iter()
            .all(|b| b.bid_amount > Decimal::ZERO));
    }

    #[test]
    fn test_empty_categories_produce_empty_snapshot() {
        let config = MarketplaceConfig {
            categories: vec![],
            ..Default::default()
        };
        let snapshot = generate_marketplace(&config);
        assert!(snapshot.requirements.is_empty());
    }

    #[tokio::test]
    async fn test_every_generated_requirement_gets_a_decision() {
        // One category guarantees category history exists for every requirement.
        let config = MarketplaceConfig {
            categories: vec!["steel".to_string()],
            ..Default::default()
        };
        let snapshot = generate_marketplace(&config);
        let ids: Vec<RequirementId> = snapshot.requirements.iter().map(|r| r.id.clone()).collect();
        let engine = SelectionEngine::new(Stores::in_memory(Arc::new(
            InMemoryMarketplace::from_snapshot(snapshot),
        )));
        for id in ids {
            let outcome = engine.select(&id, SelectionMode::Bidding).await.unwrap();
            assert!(outcome.quote.final_price > Decimal::ZERO);
        }
    }
}
