use crate::core::bid::LogisticsBid;
use crate::core::error::SelectionError;
use crate::core::requirement::{Requirement, RequirementId};
use crate::selection::audit::DecisionLogger;
use crate::selection::candidates::{Candidate, CandidatePipeline, CandidateTier};
use crate::selection::cost::estimate_cost;
use crate::selection::failsafe::{SelectionResult, SelectionState};
use crate::selection::policy::{SelectionMode, SelectionPolicy};
use crate::selection::response::BuyerQuote;
use crate::selection::risk::{assess, PerformanceEvidence};
use crate::selection::scoring::{rank, score_candidate, SupplierScore};
use crate::store::Stores;
use futures::future::try_join_all;

/// A finished selection: the internal decision and the buyer-facing quote.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub result: SelectionResult,
    pub quote: BuyerQuote,
    /// Whether the audit entry was persisted.
    pub logged: bool,
}

/// Runs the full selection pipeline for one requirement per call.
///
/// Stateless between calls; the stores are the only shared resource.
#[derive(Clone)]
pub struct SelectionEngine {
    stores: Stores,
    policy: SelectionPolicy,
    logger: DecisionLogger,
}

impl SelectionEngine {
    pub fn new(stores: Stores) -> Self {
        Self::with_policy(stores, SelectionPolicy::default())
    }

    pub fn with_policy(stores: Stores, policy: SelectionPolicy) -> Self {
        let logger = DecisionLogger::new(stores.selection_log.clone());
        Self {
            stores,
            policy,
            logger,
        }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// The single input check: a blank id fails before any store is touched.
    pub async fn load_requirement(
        &self,
        requirement_id: &RequirementId,
    ) -> Result<Requirement, SelectionError> {
        if requirement_id.is_blank() {
            return Err(SelectionError::MissingRequirementId);
        }
        self.stores
            .requirements
            .get_requirement(requirement_id)
            .await?
            .ok_or_else(|| SelectionError::RequirementNotFound(requirement_id.clone()))
    }

    /// Select a supplier, write the audit entry, and build the buyer quote.
    pub async fn select(
        &self,
        requirement_id: &RequirementId,
        mode: SelectionMode,
    ) -> Result<SelectionOutcome, SelectionError> {
        let result = self.decide(requirement_id, mode).await?;
        let logged = self.logger.record(&result).await;
        let quote = BuyerQuote::from_result(&result, &self.policy.cold_start);
        Ok(SelectionOutcome {
            result,
            quote,
            logged,
        })
    }

    /// Reach a decision without writing the audit log.
    pub async fn decide(
        &self,
        requirement_id: &RequirementId,
        mode: SelectionMode,
    ) -> Result<SelectionResult, SelectionError> {
        let requirement = self.load_requirement(requirement_id).await?;
        let gathered = CandidatePipeline::for_mode(mode)
            .gather(&requirement, &self.stores)
            .await?;

        let logistics = match gathered.tier {
            CandidateTier::PendingBids => {
                self.stores
                    .logistics
                    .accepted_logistics_bid(&requirement.id)
                    .await?
            }
            _ => None,
        };

        let scores = try_join_all(
            gathered
                .candidates
                .iter()
                .map(|c| self.evaluate(c, &requirement, logistics.as_ref())),
        )
        .await?;

        let ranked = rank(scores);
        let result = SelectionState::resolve(
            ranked,
            &self.policy.thresholds,
            self.policy.max_runner_ups,
        )
        .and_then(|state| {
            SelectionResult::from_state(
                requirement.id.clone(),
                state,
                mode,
                gathered.tier,
                gathered.fallback_reason(),
            )
        })
        .ok_or_else(|| SelectionError::NoSuppliersAvailable {
            category: requirement.product_category.clone(),
        })?;

        log::info!(
            "requirement {}: selected {} via {} (score {:.4}, fallback: {})",
            result.requirement_id,
            result.selected_supplier.supplier_id,
            result.mode,
            result.selected_supplier.composite_score,
            result.fallback_triggered
        );
        Ok(result)
    }

    /// Performance lookup, cost, risk and composite score for one candidate.
    async fn evaluate(
        &self,
        candidate: &Candidate,
        requirement: &Requirement,
        logistics: Option<&LogisticsBid>,
    ) -> Result<SupplierScore, SelectionError> {
        let (performance, category) = futures::try_join!(
            self.stores
                .performance
                .supplier_performance(&candidate.supplier_id),
            self.stores
                .performance
                .category_performance(&candidate.supplier_id, &requirement.product_category),
        )?;

        let evidence = PerformanceEvidence::from_lookup(performance);
        let cost = estimate_cost(candidate, requirement, logistics, &self.policy)?;
        let risk = assess(&evidence, category.as_ref(), &self.policy.cold_start);
        let score = score_candidate(
            candidate,
            cost,
            risk,
            evidence.delivery_days(),
            requirement,
            &self.policy,
        );

        log::debug!(
            "requirement {}: candidate {} landed {} p={:.3} q={:.3} score={:.4}",
            requirement.id,
            score.supplier_id,
            score.total_landed_cost,
            score.delivery_success_probability,
            score.quality_risk_score,
            score.composite_score
        );
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bid::{Bid, BidId};
    use crate::core::supplier::{SupplierId, SupplierPerformance};
    use crate::store::InMemoryMarketplace;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_blank_id_is_validation_error() {
        let engine = SelectionEngine::new(Stores::in_memory(Arc::new(InMemoryMarketplace::new())));
        let err = engine
            .select(&RequirementId::new(""), SelectionMode::Bidding)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unknown_requirement() {
        let engine = SelectionEngine::new(Stores::in_memory(Arc::new(InMemoryMarketplace::new())));
        let err = engine
            .select(&RequirementId::new("NOPE"), SelectionMode::Bidding)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_accepted_logistics_added_to_bids() {
        let market = Arc::new(InMemoryMarketplace::new());
        let req = RequirementId::new("R-1");
        market
            .add_requirement(
                Requirement::new(req.clone(), "steel", dec!(10)).with_budget(None, Some(dec!(20000))),
            )
            .await;
        market
            .add_bid(Bid::pending(BidId::new("B-1"), req.clone(), SupplierId::new("S-1"), dec!(10000)))
            .await;
        market
            .add_performance(
                SupplierPerformance::new(SupplierId::new("S-1"), 0.9, 0.9).with_avg_delivery_days(3.2),
            )
            .await;
        market
            .add_logistics_bid(LogisticsBid::accepted(BidId::new("L-1"), req.clone(), dec!(750)))
            .await;

        let engine = SelectionEngine::new(Stores::in_memory(market.clone()));
        let outcome = engine.select(&req, SelectionMode::Bidding).await.unwrap();
        assert_eq!(outcome.quote.final_price, dec!(10750));
        assert_eq!(outcome.quote.estimated_delivery_days, 3);
        assert_eq!(outcome.quote.selection_id, "B-1");
        assert!(outcome.logged);
        assert_eq!(market.selection_log().await.len(), 1);
    }
}
