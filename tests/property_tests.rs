use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use supplier_selection::core::bid::{Bid, BidId};
use supplier_selection::core::requirement::{Requirement, RequirementId};
use supplier_selection::core::supplier::{SupplierCategoryPerformance, SupplierId, SupplierPerformance};
use supplier_selection::selection::engine::SelectionEngine;
use supplier_selection::selection::failsafe::clears_thresholds;
use supplier_selection::selection::policy::{ColdStartDefaults, RiskThresholds, SelectionMode};
use supplier_selection::selection::risk::{
    delivery_success_probability, quality_risk_score, PerformanceEvidence,
};
use supplier_selection::store::{InMemoryMarketplace, Stores};

/// Performance rows, including degenerate ones (rates outside 0–1, counts above total).
fn arb_performance() -> impl Strategy<Value = SupplierPerformance> {
    (
        -0.5f64..1.5,
        -0.5f64..1.5,
        0u32..100,
        0u32..150,
        0u32..150,
        0u32..150,
    )
        .prop_map(|(rate, quality, orders, late, rejections, complaints)| {
            SupplierPerformance::new(SupplierId::new("S"), rate, quality)
                .with_orders(orders)
                .with_late_deliveries(late)
                .with_quality_issues(rejections, complaints)
        })
}

fn arb_evidence() -> impl Strategy<Value = PerformanceEvidence> {
    prop::option::of(arb_performance()).prop_map(PerformanceEvidence::from_lookup)
}

fn arb_category_row() -> impl Strategy<Value = Option<SupplierCategoryPerformance>> {
    prop::option::of((0u32..50, 0u32..50).prop_map(|(ok, total)| {
        SupplierCategoryPerformance::new(SupplierId::new("S"), "steel", 1, Decimal::from(100))
            .with_deliveries(ok.min(total), total)
    }))
}

/// One bidder: bid amount plus an optional performance record.
fn arb_bidder() -> impl Strategy<Value = (u64, Option<SupplierPerformance>)> {
    (1_000u64..200_000, prop::option::of(arb_performance()))
}

fn arb_bidders() -> impl Strategy<Value = Vec<(u64, Option<SupplierPerformance>)>> {
    prop::collection::vec(arb_bidder(), 1..8)
}

fn market_with(bidders: &[(u64, Option<SupplierPerformance>)], budget: Option<u64>) -> Arc<InMemoryMarketplace> {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let market = Arc::new(InMemoryMarketplace::new());
    runtime.block_on(async {
        market
            .add_requirement(
                Requirement::new(RequirementId::new("REQ-P"), "steel", Decimal::from(100))
                    .with_budget(None, budget.map(Decimal::from)),
            )
            .await;
        for (i, (amount, perf)) in bidders.iter().enumerate() {
            let supplier = SupplierId::new(format!("SUP-{i}"));
            market
                .add_bid(Bid::pending(
                    BidId::new(format!("BID-{i}")),
                    RequirementId::new("REQ-P"),
                    supplier.clone(),
                    Decimal::from(*amount),
                ))
                .await;
            if let Some(perf) = perf {
                let mut perf = perf.clone();
                perf.supplier_id = supplier;
                market.add_performance(perf).await;
            }
        }
    });
    market
}

proptest! {
    // Delivery probability always stays inside the clamp, whatever the inputs.
    #[test]
    fn delivery_probability_is_bounded(evidence in arb_evidence(), category in arb_category_row()) {
        let p = delivery_success_probability(&evidence, category.as_ref(), &ColdStartDefaults::default());
        prop_assert!((0.1..=0.99).contains(&p), "probability {} out of range", p);
    }

    // Quality risk always stays in [0, 1].
    #[test]
    fn quality_risk_is_bounded(evidence in arb_evidence()) {
        let q = quality_risk_score(&evidence, &ColdStartDefaults::default());
        prop_assert!((0.0..=1.0).contains(&q), "risk {} out of range", q);
    }

    // The winner either ranks first or is a safe substitute for a risky leader.
    #[test]
    fn winner_is_best_or_safe_substitute(bidders in arb_bidders(), budget in prop::option::of(50_000u64..500_000)) {
        let market = market_with(&bidders, budget);
        let engine = SelectionEngine::new(Stores::in_memory(market));
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime
            .block_on(engine.decide(&RequirementId::new("REQ-P"), SelectionMode::Bidding))
            .unwrap();

        let selected = &result.selected_supplier;
        let thresholds = RiskThresholds::default();
        if result.fallback_triggered {
            prop_assert!(clears_thresholds(selected, &thresholds));
        } else {
            for runner_up in &result.runner_ups {
                prop_assert!(selected.composite_score <= runner_up.composite_score);
            }
        }
        prop_assert!(result.runner_ups.len() <= 3);
        prop_assert!(result.runner_ups.iter().all(|r| r.supplier_id != selected.supplier_id));
    }

    // Same inputs, same decision.
    #[test]
    fn selection_is_deterministic(bidders in arb_bidders()) {
        let market = market_with(&bidders, Some(150_000));
        let engine = SelectionEngine::new(Stores::in_memory(market));
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let id = RequirementId::new("REQ-P");
        let first = runtime.block_on(engine.decide(&id, SelectionMode::Bidding)).unwrap();
        let second = runtime.block_on(engine.decide(&id, SelectionMode::Bidding)).unwrap();
        prop_assert_eq!(first, second);
    }

    // The buyer quote never carries a supplier identity.
    #[test]
    fn quote_never_reveals_supplier(bidders in arb_bidders()) {
        let market = market_with(&bidders, None);
        let engine = SelectionEngine::new(Stores::in_memory(market));
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let outcome = runtime
            .block_on(engine.select(&RequirementId::new("REQ-P"), SelectionMode::Bidding))
            .unwrap();

        let json = serde_json::to_string(&outcome.quote).unwrap();
        prop_assert!(!json.contains("SUP-"), "quote leaked a supplier id: {}", json);
        prop_assert!(json.contains("BID-"));
        prop_assert_eq!(outcome.quote.final_price, outcome.result.selected_supplier.total_landed_cost);
    }
}
