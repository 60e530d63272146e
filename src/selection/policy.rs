use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the caller wants the supplier chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Compete the pending bids on the requirement.
    Bidding,
    /// No live bids: pick from historical category winners or inventory.
    AutoAssign,
}

impl SelectionMode {
    /// Only the literal `auto_assign` selects auto-assignment; anything
    /// else, including no value at all, means bidding.
    pub fn from_request(mode: Option<&str>) -> Self {
        match mode {
            Some("auto_assign") => SelectionMode::AutoAssign,
            _ => SelectionMode::Bidding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Bidding => "bidding",
            SelectionMode::AutoAssign => "auto_assign",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weights of the three composite-score terms. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub cost: f64,
    pub delivery_risk: f64,
    pub quality_risk: f64,
}

impl ScoringWeights {
    /// Live bidding trusts price competition: 60 / 25 / 15.
    pub const BIDDING: ScoringWeights = ScoringWeights {
        cost: 0.60,
        delivery_risk: 0.25,
        quality_risk: 0.15,
    };

    /// Historical auto-assignment leans on reliability: 40 / 35 / 25.
    pub const AUTO_ASSIGN: ScoringWeights = ScoringWeights {
        cost: 0.40,
        delivery_risk: 0.35,
        quality_risk: 0.25,
    };

    pub fn total(&self) -> f64 {
        self.cost + self.delivery_risk + self.quality_risk
    }
}

/// Hard limits the failsafe checks the top candidate against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// A candidate is too risky above this quality risk.
    pub max_quality_risk: f64,
    /// A candidate is too risky below this delivery probability.
    pub min_delivery_probability: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            max_quality_risk: 0.7,
            min_delivery_probability: 0.5,
        }
    }
}

/// Assumptions applied to suppliers without a performance record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColdStartDefaults {
    pub delivery_success_rate: f64,
    pub quality_risk: f64,
    pub delivery_days: u32,
}

impl Default for ColdStartDefaults {
    fn default() -> Self {
        Self {
            delivery_success_rate: 0.85,
            quality_risk: 0.15,
            delivery_days: 7,
        }
    }
}

/// Every tunable number in the selection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    pub bidding_weights: ScoringWeights,
    pub auto_assign_weights: ScoringWeights,
    /// Fixed composite score for inventory-fallback candidates.
    pub inventory_placeholder_score: f64,
    pub thresholds: RiskThresholds,
    pub cold_start: ColdStartDefaults,
    /// Unit price assumed for inventory candidates when the buyer gave no budget floor.
    pub placeholder_unit_price: Decimal,
    /// Auto-assign logistics estimate as a share of material cost.
    pub logistics_estimate_rate: Decimal,
    /// Budget stand-in multiplier when the requirement has no ceiling.
    pub missing_budget_multiplier: f64,
    pub max_runner_ups: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            bidding_weights: ScoringWeights::BIDDING,
            auto_assign_weights: ScoringWeights::AUTO_ASSIGN,
            inventory_placeholder_score: 0.5,
            thresholds: RiskThresholds::default(),
            cold_start: ColdStartDefaults::default(),
            placeholder_unit_price: dec!(1000),
            logistics_estimate_rate: dec!(0.05),
            missing_budget_multiplier: 1.5,
            max_runner_ups: 3,
        }
    }
}

impl SelectionPolicy {
    pub fn weights_for(&self, mode: SelectionMode) -> ScoringWeights {
        match mode {
            SelectionMode::Bidding => self.bidding_weights,
            SelectionMode::AutoAssign => self.auto_assign_weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mode_from_request() {
        assert_eq!(SelectionMode::from_request(None), SelectionMode::Bidding);
        assert_eq!(SelectionMode::from_request(Some("bidding")), SelectionMode::Bidding);
        assert_eq!(SelectionMode::from_request(Some("AUTO_ASSIGN")), SelectionMode::Bidding);
        assert_eq!(
            SelectionMode::from_request(Some("auto_assign")),
            SelectionMode::AutoAssign
        );
    }

    #[test]
    fn test_documented_weights() {
        let policy = SelectionPolicy::default();
        let bidding = policy.weights_for(SelectionMode::Bidding);
        assert_relative_eq!(bidding.cost, 0.60);
        assert_relative_eq!(bidding.delivery_risk, 0.25);
        assert_relative_eq!(bidding.quality_risk, 0.15);

        let auto = policy.weights_for(SelectionMode::AutoAssign);
        assert_relative_eq!(auto.cost, 0.40);
        assert_relative_eq!(auto.delivery_risk, 0.35);
        assert_relative_eq!(auto.quality_risk, 0.25);
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_relative_eq!(ScoringWeights::BIDDING.total(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(ScoringWeights::AUTO_ASSIGN.total(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mode_wire_format() {
        assert_eq!(
            serde_json::to_string(&SelectionMode::AutoAssign).unwrap(),
            "\"auto_assign\""
        );
        assert_eq!(SelectionMode::Bidding.to_string(), "bidding");
    }
}
