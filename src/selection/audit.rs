use crate::core::bid::BidId;
use crate::core::requirement::RequirementId;
use crate::core::supplier::SupplierId;
use crate::selection::failsafe::SelectionResult;
use crate::selection::policy::SelectionMode;
use crate::store::SelectionLogStore;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Identity, cost and score of a supplier that was not picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerUpSummary {
    pub supplier_id: SupplierId,
    pub total_landed_cost: Decimal,
    pub composite_score: f64,
}

/// Immutable audit record of one selection decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionLogEntry {
    pub id: Uuid,
    pub requirement_id: RequirementId,
    pub selection_mode: SelectionMode,
    pub selected_supplier_id: SupplierId,
    pub selected_bid_id: Option<BidId>,
    pub material_cost: Decimal,
    pub logistics_cost: Decimal,
    pub total_landed_cost: Decimal,
    pub delivery_success_probability: f64,
    pub quality_risk_score: f64,
    pub composite_score: f64,
    pub reasoning: serde_json::Value,
    pub runner_ups: Vec<RunnerUpSummary>,
    pub fallback_triggered: bool,
    pub fallback_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SelectionLogEntry {
    pub fn from_result(result: &SelectionResult) -> Self {
        let selected = &result.selected_supplier;
        Self {
            id: Uuid::new_v4(),
            requirement_id: result.requirement_id.clone(),
            selection_mode: result.mode,
            selected_supplier_id: selected.supplier_id.clone(),
            selected_bid_id: selected.bid_id.clone(),
            material_cost: selected.material_cost,
            logistics_cost: selected.logistics_cost,
            total_landed_cost: selected.total_landed_cost,
            delivery_success_probability: selected.delivery_success_probability,
            quality_risk_score: selected.quality_risk_score,
            composite_score: selected.composite_score,
            reasoning: serde_json::json!({
                "requested_mode": result.requested_mode,
                "candidate_tier": result.tier,
                "selected": selected.reasoning,
            }),
            runner_ups: result
                .runner_ups
                .iter()
                .map(|r| RunnerUpSummary {
                    supplier_id: r.supplier_id.clone(),
                    total_landed_cost: r.total_landed_cost,
                    composite_score: r.composite_score,
                })
                .collect(),
            fallback_triggered: result.fallback_triggered,
            fallback_reason: result.fallback_reason.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Writes one audit entry per decision. Never fails the caller.
#[derive(Clone)]
pub struct DecisionLogger {
    store: Arc<dyn SelectionLogStore>,
}

impl DecisionLogger {
    pub fn new(store: Arc<dyn SelectionLogStore>) -> Self {
        Self { store }
    }

    /// Persist the decision. Returns whether the write succeeded; a failed
    /// write is logged and otherwise ignored.
    pub async fn record(&self, result: &SelectionResult) -> bool {
        let entry = SelectionLogEntry::from_result(result);
        let entry_id = entry.id;
        match self.store.insert_selection_log(entry).await {
            Ok(()) => {
                log::debug!(
                    "selection log {} written for requirement {}",
                    entry_id,
                    result.requirement_id
                );
                true
            }
            Err(e) => {
                log::error!(
                    "failed to write selection log for requirement {}: {}",
                    result.requirement_id,
                    e
                );
                false
            }
        }
    }
}
