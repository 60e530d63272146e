use crate::core::bid::BidId;
use crate::core::requirement::Requirement;
use crate::core::supplier::SupplierId;
use crate::selection::candidates::{Candidate, CandidateTier};
use crate::selection::cost::CostEstimate;
use crate::selection::policy::{ScoringWeights, SelectionPolicy};
use crate::selection::risk::RiskAssessment;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Everything computed about one candidate. Lower `composite_score` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierScore {
    pub supplier_id: SupplierId,
    pub bid_id: Option<BidId>,
    pub tier: CandidateTier,
    pub material_cost: Decimal,
    pub logistics_cost: Decimal,
    pub total_landed_cost: Decimal,
    pub delivery_success_probability: f64,
    pub quality_risk_score: f64,
    pub composite_score: f64,
    pub estimated_delivery_days: Option<u32>,
    pub reasoning: Vec<String>,
}

impl SupplierScore {
    /// Correlation id handed to the buyer: the bid id when there is one.
    pub fn selection_id(&self) -> String {
        match &self.bid_id {
            Some(bid_id) => bid_id.to_string(),
            None => self.supplier_id.to_string(),
        }
    }
}

/// Landed cost relative to the budget ceiling.
///
/// Without a ceiling the candidate's own cost inflated by
/// `missing_budget_multiplier` is the denominator, so a lone unbudgeted
/// candidate normalizes to about 0.67.
pub fn normalized_cost(
    total_landed_cost: Decimal,
    budget_ceiling: Option<Decimal>,
    missing_budget_multiplier: f64,
) -> f64 {
    let cost = total_landed_cost.to_f64().unwrap_or(0.0);
    let denominator = match budget_ceiling.and_then(|c| c.to_f64()) {
        Some(ceiling) if ceiling != 0.0 => ceiling,
        _ => cost * missing_budget_multiplier,
    };
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    cost / denominator
}

pub fn composite_score(
    normalized_cost: f64,
    delivery_success_probability: f64,
    quality_risk_score: f64,
    weights: &ScoringWeights,
) -> f64 {
    weights.cost * normalized_cost
        + weights.delivery_risk * (1.0 - delivery_success_probability)
        + weights.quality_risk * quality_risk_score
}

/// Combine cost and risk into a [`SupplierScore`].
///
/// Inventory-fallback candidates get the fixed placeholder score: that
/// tier has no real price signal to rank on.
pub fn score_candidate(
    candidate: &Candidate,
    cost: CostEstimate,
    risk: RiskAssessment,
    estimated_delivery_days: Option<u32>,
    requirement: &Requirement,
    policy: &SelectionPolicy,
) -> SupplierScore {
    let tier = candidate.tier();
    let composite = match tier {
        CandidateTier::InventorySignals => policy.inventory_placeholder_score,
        _ => {
            let weights = policy.weights_for(tier.executed_mode());
            let cost_term = normalized_cost(
                cost.total_landed_cost,
                requirement.budget().ceiling(),
                policy.missing_budget_multiplier,
            );
            composite_score(
                cost_term,
                risk.delivery_success_probability,
                risk.quality_risk_score,
                &weights,
            )
        }
    };

    let mut reasoning = Vec::with_capacity(risk.reasoning.len() + 2);
    reasoning.push(cost.describe());
    reasoning.extend(risk.reasoning);
    match tier {
        CandidateTier::InventorySignals => reasoning.push(
            "Selected from inventory availability; no price history to rank on".to_string(),
        ),
        _ => reasoning.push(format!("Composite score {:.4} ({})", composite, tier)),
    }

    SupplierScore {
        supplier_id: candidate.supplier_id.clone(),
        bid_id: candidate.bid_id().cloned(),
        tier,
        material_cost: cost.material_cost,
        logistics_cost: cost.logistics_cost,
        total_landed_cost: cost.total_landed_cost,
        delivery_success_probability: risk.delivery_success_probability,
        quality_risk_score: risk.quality_risk_score,
        composite_score: composite,
        estimated_delivery_days,
        reasoning,
    }
}

/// Sort best-first. Equal scores keep gather order.
pub fn rank(mut scores: Vec<SupplierScore>) -> Vec<SupplierScore> {
    scores.sort_by(|a, b| {
        a.composite_score
            .partial_cmp(&b.composite_score)
            .unwrap_or(Ordering::Equal)
    });
    scores
}
