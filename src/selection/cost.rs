use crate::core::bid::LogisticsBid;
use crate::core::error::SelectionError;
use crate::core::requirement::Requirement;
use crate::selection::candidates::{Candidate, CandidateOrigin};
use crate::selection::policy::SelectionPolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a material cost figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBasis {
    /// Supplier-stated bid amount.
    BidAmount,
    /// Category average unit price times requested quantity.
    CategoryAverage,
    /// Buyer's budget floor, used as a rough stand-in.
    BudgetFloor,
    /// Quantity times the placeholder unit price.
    PlaceholderUnitPrice,
}

/// Material + logistics = landed cost, for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub material_cost: Decimal,
    pub logistics_cost: Decimal,
    pub total_landed_cost: Decimal,
    pub basis: CostBasis,
}

impl CostEstimate {
    /// `None` when the landed cost does not fit in a `Decimal`.
    pub fn new(material_cost: Decimal, logistics_cost: Decimal, basis: CostBasis) -> Option<Self> {
        Some(Self {
            material_cost,
            logistics_cost,
            total_landed_cost: material_cost.checked_add(logistics_cost)?,
            basis,
        })
    }

    /// Human-readable justification line for the decision log.
    pub fn describe(&self) -> String {
        let source = match self.basis {
            CostBasis::BidAmount => "bid amount",
            CostBasis::CategoryAverage => "category average price",
            CostBasis::BudgetFloor => "buyer budget floor (rough estimate)",
            CostBasis::PlaceholderUnitPrice => "placeholder unit price (rough estimate)",
        };
        format!(
            "Material cost {} from {}, logistics {}, landed {}",
            self.material_cost.round_dp(2),
            source,
            self.logistics_cost.round_dp(2),
            self.total_landed_cost.round_dp(2)
        )
    }
}

/// Estimate the landed cost of one candidate.
///
/// Bids use the accepted logistics quote for the requirement when one
/// exists (zero otherwise); auto-assigned candidates estimate logistics as
/// a fixed share of material cost. Amounts that overflow `Decimal` fail
/// with [`SelectionError::CostOverflow`].
pub fn estimate_cost(
    candidate: &Candidate,
    requirement: &Requirement,
    accepted_logistics: Option<&LogisticsBid>,
    policy: &SelectionPolicy,
) -> Result<CostEstimate, SelectionError> {
    let estimate = match &candidate.origin {
        CandidateOrigin::Bid(bid) => {
            let logistics = accepted_logistics
                .map(|l| l.bid_amount)
                .unwrap_or(Decimal::ZERO);
            CostEstimate::new(bid.bid_amount, logistics, CostBasis::BidAmount)
        }
        CandidateOrigin::CategoryHistory(row) => row
            .avg_price_per_unit
            .checked_mul(requirement.quantity)
            .and_then(|material| {
                with_estimated_logistics(material, CostBasis::CategoryAverage, policy)
            }),
        CandidateOrigin::Inventory(_) => match requirement.budget().floor() {
            Some(floor) => with_estimated_logistics(floor, CostBasis::BudgetFloor, policy),
            None => requirement
                .quantity
                .checked_mul(policy.placeholder_unit_price)
                .and_then(|material| {
                    with_estimated_logistics(material, CostBasis::PlaceholderUnitPrice, policy)
                }),
        },
    };

    estimate.ok_or_else(|| {
        log::warn!(
            "requirement {}: cost for supplier {} overflowed (quantity {})",
            requirement.id,
            candidate.supplier_id,
            requirement.quantity
        );
        SelectionError::CostOverflow {
            supplier_id: candidate.supplier_id.clone(),
        }
    })
}

fn with_estimated_logistics(
    material: Decimal,
    basis: CostBasis,
    policy: &SelectionPolicy,
) -> Option<CostEstimate> {
    let logistics = material.checked_mul(policy.logistics_estimate_rate)?;
    CostEstimate::new(material, logistics, basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bid::{Bid, BidId};
    use crate::core::requirement::RequirementId;
    use crate::core::supplier::{SupplierCategoryPerformance, SupplierId, SupplierInventorySignal};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn requirement() -> Requirement {
        Requirement::new(RequirementId::new("R-1"), "steel", dec!(100))
    }

    fn bid_candidate(amount: Decimal) -> Candidate {
        Candidate::from_bid(Bid::pending(
            BidId::new("B-1"),
            RequirementId::new("R-1"),
            SupplierId::new("S-1"),
            amount,
        ))
    }

    #[test]
    fn test_bid_without_logistics() {
        let cost = estimate_cost(
            &bid_candidate(dec!(80000)),
            &requirement(),
            None,
            &SelectionPolicy::default(),
        )
        .unwrap();
        assert_eq!(cost.material_cost, dec!(80000));
        assert_eq!(cost.logistics_cost, Decimal::ZERO);
        assert_eq!(cost.total_landed_cost, dec!(80000));
        assert_eq!(cost.basis, CostBasis::BidAmount);
    }

    #[test]
    fn test_bid_with_accepted_logistics() {
        let logistics = LogisticsBid::accepted(BidId::new("L-1"), RequirementId::new("R-1"), dec!(2500));
        let cost = estimate_cost(
            &bid_candidate(dec!(80000)),
            &requirement(),
            Some(&logistics),
            &SelectionPolicy::default(),
        )
        .unwrap();
        assert_eq!(cost.total_landed_cost, dec!(82500));
    }

    #[test]
    fn test_category_average() {
        let candidate = Candidate::from_category_history(SupplierCategoryPerformance::new(
            SupplierId::new("S-2"),
            "steel",
            5,
            dec!(500),
        ));
        let cost =
            estimate_cost(&candidate, &requirement(), None, &SelectionPolicy::default()).unwrap();
        assert_eq!(cost.material_cost, dec!(50000));
        assert_eq!(cost.logistics_cost, dec!(2500));
        assert_eq!(cost.total_landed_cost, dec!(52500));
    }

    #[test]
    fn test_inventory_budget_floor_then_placeholder() {
        let candidate = Candidate::from_inventory(SupplierInventorySignal::new(
            SupplierId::new("S-3"),
            "steel",
            dec!(1000),
            Utc::now(),
        ));
        let policy = SelectionPolicy::default();

        let with_floor = requirement().with_budget(Some(dec!(40000)), None);
        let cost = estimate_cost(&candidate, &with_floor, None, &policy).unwrap();
        assert_eq!(cost.material_cost, dec!(40000));
        assert_eq!(cost.basis, CostBasis::BudgetFloor);

        let cost = estimate_cost(&candidate, &requirement(), None, &policy).unwrap();
        assert_eq!(cost.material_cost, dec!(100000));
        assert_eq!(cost.logistics_cost, dec!(5000));
        assert_eq!(cost.basis, CostBasis::PlaceholderUnitPrice);
    }

    #[test]
    fn test_overflowing_costs_are_errors() {
        let policy = SelectionPolicy::default();
        let candidate = Candidate::from_inventory(SupplierInventorySignal::new(
            SupplierId::new("S-3"),
            "steel",
            Decimal::MAX,
            Utc::now(),
        ));
        let huge = Requirement::new(RequirementId::new("R-1"), "steel", Decimal::MAX);
        let err = estimate_cost(&candidate, &huge, None, &policy).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::CostOverflow { ref supplier_id } if supplier_id.as_str() == "S-3"
        ));

        let logistics =
            LogisticsBid::accepted(BidId::new("L-1"), RequirementId::new("R-1"), dec!(1));
        let err = estimate_cost(
            &bid_candidate(Decimal::MAX),
            &requirement(),
            Some(&logistics),
            &policy,
        )
        .unwrap_err();
        assert!(matches!(err, SelectionError::CostOverflow { .. }));
    }
}
