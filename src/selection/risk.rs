//! Delivery-success probability and quality-risk model.
//!
//! Suppliers with no performance record are not penalised: they get the
//! cold-start defaults (0.85 success, 0.15 risk) from [`ColdStartDefaults`].

use crate::core::supplier::{SupplierCategoryPerformance, SupplierPerformance};
use crate::selection::policy::ColdStartDefaults;
use serde::{Deserialize, Serialize};

pub const MIN_DELIVERY_PROBABILITY: f64 = 0.1;
pub const MAX_DELIVERY_PROBABILITY: f64 = 0.99;

/// Share of the blended probability taken from the category-specific rate.
const CATEGORY_BLEND_WEIGHT: f64 = 0.4;
const LATE_DELIVERY_PENALTY: f64 = 0.2;
const HIGH_VOLUME_ORDER_COUNT: u32 = 10;
const HIGH_VOLUME_BONUS: f64 = 1.05;
const REJECTION_WEIGHT: f64 = 0.3;
const COMPLAINT_WEIGHT: f64 = 0.2;

/// What the performance store knew about a supplier.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceEvidence {
    /// No aggregate row: an unproven supplier.
    NotEnoughData,
    Recorded(SupplierPerformance),
}

impl PerformanceEvidence {
    pub fn from_lookup(row: Option<SupplierPerformance>) -> Self {
        match row {
            Some(perf) => PerformanceEvidence::Recorded(perf),
            None => PerformanceEvidence::NotEnoughData,
        }
    }

    pub fn record(&self) -> Option<&SupplierPerformance> {
        match self {
            PerformanceEvidence::Recorded(perf) => Some(perf),
            PerformanceEvidence::NotEnoughData => None,
        }
    }

    /// Rounded average delivery days, if the supplier has a track record.
    pub fn delivery_days(&self) -> Option<u32> {
        self.record()
            .and_then(|p| p.avg_delivery_days)
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u32)
    }
}

/// Probability that the supplier delivers successfully, in `[0.1, 0.99]`.
pub fn delivery_success_probability(
    evidence: &PerformanceEvidence,
    category: Option<&SupplierCategoryPerformance>,
    defaults: &ColdStartDefaults,
) -> f64 {
    let mut probability = evidence
        .record()
        .map(|p| p.delivery_success_rate)
        .unwrap_or(defaults.delivery_success_rate);

    if let Some(category_rate) = category.and_then(|c| c.success_rate()) {
        probability =
            (1.0 - CATEGORY_BLEND_WEIGHT) * probability + CATEGORY_BLEND_WEIGHT * category_rate;
    }

    if let Some(perf) = evidence.record() {
        if let Some(late_ratio) = perf.ratio_of(perf.late_deliveries) {
            probability *= 1.0 - late_ratio * LATE_DELIVERY_PENALTY;
        }
        if perf.total_orders > HIGH_VOLUME_ORDER_COUNT {
            probability = (probability * HIGH_VOLUME_BONUS).min(MAX_DELIVERY_PROBABILITY);
        }
    }

    probability.clamp(MIN_DELIVERY_PROBABILITY, MAX_DELIVERY_PROBABILITY)
}

/// Quality risk in `[0, 1]`; higher is riskier.
pub fn quality_risk_score(evidence: &PerformanceEvidence, defaults: &ColdStartDefaults) -> f64 {
    let risk = match evidence.record() {
        None => defaults.quality_risk,
        Some(perf) => {
            let mut risk = 1.0 - perf.quality_score;
            if let Some(rejection_rate) = perf.ratio_of(perf.quality_rejections) {
                risk += rejection_rate * REJECTION_WEIGHT;
            }
            if let Some(complaint_rate) = perf.ratio_of(perf.quality_complaints) {
                risk += complaint_rate * COMPLAINT_WEIGHT;
            }
            risk
        }
    };
    risk.clamp(0.0, 1.0)
}

/// Probability, risk, and the reasoning lines that explain them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub delivery_success_probability: f64,
    pub quality_risk_score: f64,
    pub reasoning: Vec<String>,
}

pub fn assess(
    evidence: &PerformanceEvidence,
    category: Option<&SupplierCategoryPerformance>,
    defaults: &ColdStartDefaults,
) -> RiskAssessment {
    let delivery_success_probability = delivery_success_probability(evidence, category, defaults);
    let quality_risk_score = quality_risk_score(evidence, defaults);

    let mut reasoning = Vec::new();
    match evidence.record() {
        None => reasoning.push(
            "No performance history: new-supplier defaults applied".to_string(),
        ),
        Some(perf) => {
            if perf.total_orders > HIGH_VOLUME_ORDER_COUNT {
                reasoning.push(format!(
                    "High-volume supplier ({} completed orders)",
                    perf.total_orders
                ));
            }
            if perf.late_deliveries > 0 {
                reasoning.push(format!(
                    "{} late deliveries out of {} orders",
                    perf.late_deliveries, perf.total_orders
                ));
            }
        }
    }
    if let Some(cat) = category {
        if cat.l1_wins > 0 {
            reasoning.push(format!(
                "{} previous L1 wins in {}",
                cat.l1_wins, cat.category
            ));
        }
    }
    reasoning.push(format!(
        "Delivery success probability {:.1}%",
        delivery_success_probability * 100.0
    ));
    reasoning.push(format!("Quality risk {:.1}%", quality_risk_score * 100.0));

    RiskAssessment {
        delivery_success_probability,
        quality_risk_score,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::supplier::SupplierId;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn defaults() -> ColdStartDefaults {
        ColdStartDefaults::default()
    }

    fn perf(rate: f64, quality: f64) -> SupplierPerformance {
        SupplierPerformance::new(SupplierId::new("S-1"), rate, quality)
    }

    #[test]
    fn test_new_supplier_defaults() {
        let evidence = PerformanceEvidence::NotEnoughData;
        assert_relative_eq!(delivery_success_probability(&evidence, None, &defaults()), 0.85);
        assert_relative_eq!(quality_risk_score(&evidence, &defaults()), 0.15);
        assert_eq!(evidence.delivery_days(), None);
    }

    #[test]
    fn test_category_blend() {
        let evidence = PerformanceEvidence::Recorded(perf(0.9, 0.9));
        let cat = SupplierCategoryPerformance::new(SupplierId::new("S-1"), "steel", 2, dec!(10))
            .with_deliveries(5, 10);
        // 0.6 * 0.9 + 0.4 * 0.5
        assert_relative_eq!(
            delivery_success_probability(&evidence, Some(&cat), &defaults()),
            0.74,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_category_without_orders_is_ignored() {
        let evidence = PerformanceEvidence::Recorded(perf(0.9, 0.9));
        let cat = SupplierCategoryPerformance::new(SupplierId::new("S-1"), "steel", 2, dec!(10));
        assert_relative_eq!(
            delivery_success_probability(&evidence, Some(&cat), &defaults()),
            0.9
        );
    }

    #[test]
    fn test_late_penalty_and_volume_bonus() {
        // 0.9 * (1 - 0.25 * 0.2) = 0.855, then * 1.05 = 0.89775
        let evidence =
            PerformanceEvidence::Recorded(perf(0.9, 0.9).with_orders(20).with_late_deliveries(5));
        assert_relative_eq!(
            delivery_success_probability(&evidence, None, &defaults()),
            0.89775,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_volume_bonus_capped() {
        let evidence = PerformanceEvidence::Recorded(perf(0.98, 0.9).with_orders(50));
        assert_relative_eq!(delivery_success_probability(&evidence, None, &defaults()), 0.99);
    }

    #[test]
    fn test_probability_floor() {
        let evidence = PerformanceEvidence::Recorded(perf(0.0, 0.9).with_orders(3));
        assert_relative_eq!(delivery_success_probability(&evidence, None, &defaults()), 0.1);
    }

    #[test]
    fn test_quality_risk_components() {
        // (1 - 0.8) + 0.25 * 0.3 + 0.1 * 0.2 = 0.295
        let evidence = PerformanceEvidence::Recorded(
            perf(0.9, 0.8).with_orders(20).with_quality_issues(5, 2),
        );
        assert_relative_eq!(quality_risk_score(&evidence, &defaults()), 0.295, epsilon = 1e-12);
    }

    #[test]
    fn test_quality_risk_capped() {
        let evidence = PerformanceEvidence::Recorded(
            perf(0.9, 0.1).with_orders(20).with_quality_issues(20, 20),
        );
        assert_relative_eq!(quality_risk_score(&evidence, &defaults()), 1.0);
    }

    #[test]
    fn test_delivery_days_rounded() {
        let evidence = PerformanceEvidence::Recorded(perf(0.9, 0.9).with_avg_delivery_days(4.6));
        assert_eq!(evidence.delivery_days(), Some(5));
    }

    #[test]
    fn test_assess_reasoning_for_new_supplier() {
        let assessment = assess(&PerformanceEvidence::NotEnoughData, None, &defaults());
        assert!(assessment.reasoning[0].contains("new-supplier defaults"));
        assert_eq!(assessment.reasoning.len(), 3);
    }
}
