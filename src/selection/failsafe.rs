//! Final pick with a risk failsafe.
//!
//! `Scored → RiskChecked → Confirmed | Substituted`. A risky top candidate
//! is swapped for the best runner-up that clears both thresholds; when no
//! runner-up does, the top candidate is kept.

use crate::core::requirement::RequirementId;
use crate::core::supplier::SupplierId;
use crate::selection::candidates::CandidateTier;
use crate::selection::policy::{RiskThresholds, SelectionMode};
use crate::selection::scoring::SupplierScore;
use serde::{Deserialize, Serialize};

/// Top candidate breaches at least one hard limit.
pub fn exceeds_thresholds(score: &SupplierScore, thresholds: &RiskThresholds) -> bool {
    score.quality_risk_score > thresholds.max_quality_risk
        || score.delivery_success_probability < thresholds.min_delivery_probability
}

/// Runner-up is safe enough to substitute.
pub fn clears_thresholds(score: &SupplierScore, thresholds: &RiskThresholds) -> bool {
    score.quality_risk_score < thresholds.max_quality_risk
        && score.delivery_success_probability >= thresholds.min_delivery_probability
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    /// Candidates sorted best-first.
    Scored { ranked: Vec<SupplierScore> },
    RiskChecked {
        selected: SupplierScore,
        runner_ups: Vec<SupplierScore>,
        too_risky: bool,
    },
    Confirmed {
        selected: SupplierScore,
        runner_ups: Vec<SupplierScore>,
    },
    Substituted {
        selected: SupplierScore,
        runner_ups: Vec<SupplierScore>,
        replaced: SupplierId,
        reason: String,
    },
}

impl SelectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SelectionState::Confirmed { .. } | SelectionState::Substituted { .. }
        )
    }

    /// Advance one transition. Returns `None` only for an empty `Scored` set.
    pub fn step(self, thresholds: &RiskThresholds, max_runner_ups: usize) -> Option<Self> {
        match self {
            SelectionState::Scored { ranked } => {
                let mut iter = ranked.into_iter();
                let selected = iter.next()?;
                let runner_ups: Vec<SupplierScore> = iter.take(max_runner_ups).collect();
                let too_risky = exceeds_thresholds(&selected, thresholds);
                Some(SelectionState::RiskChecked {
                    selected,
                    runner_ups,
                    too_risky,
                })
            }
            SelectionState::RiskChecked {
                selected,
                runner_ups,
                too_risky: false,
            } => Some(SelectionState::Confirmed {
                selected,
                runner_ups,
            }),
            SelectionState::RiskChecked {
                selected,
                mut runner_ups,
                too_risky: true,
            } => {
                let safer = runner_ups
                    .iter()
                    .position(|r| clears_thresholds(r, thresholds));
                match safer {
                    Some(idx) => {
                        let substitute = runner_ups.remove(idx);
                        let replaced = selected.supplier_id.clone();
                        let reason = format!(
                            "Primary candidate {} exceeded risk thresholds (quality risk {:.2}, delivery probability {:.2}); switched to safer runner-up {}",
                            replaced,
                            selected.quality_risk_score,
                            selected.delivery_success_probability,
                            substitute.supplier_id
                        );
                        log::warn!("{}", reason);
                        runner_ups.insert(0, selected);
                        Some(SelectionState::Substituted {
                            selected: substitute,
                            runner_ups,
                            replaced,
                            reason,
                        })
                    }
                    None => {
                        log::warn!(
                            "candidate {} exceeds risk thresholds but no safer runner-up exists; keeping it",
                            selected.supplier_id
                        );
                        Some(SelectionState::Confirmed {
                            selected,
                            runner_ups,
                        })
                    }
                }
            }
            terminal => Some(terminal),
        }
    }

    /// Drive a scored set to a terminal state.
    pub fn resolve(
        ranked: Vec<SupplierScore>,
        thresholds: &RiskThresholds,
        max_runner_ups: usize,
    ) -> Option<Self> {
        let mut state = SelectionState::Scored { ranked };
        while !state.is_terminal() {
            state = state.step(thresholds, max_runner_ups)?;
        }
        Some(state)
    }
}

/// The internal decision for one requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub requirement_id: RequirementId,
    pub selected_supplier: SupplierScore,
    /// Best-to-worst, excluding the selected supplier.
    pub runner_ups: Vec<SupplierScore>,
    /// The strategy that actually produced the candidates.
    pub mode: SelectionMode,
    pub requested_mode: SelectionMode,
    pub tier: CandidateTier,
    pub fallback_triggered: bool,
    pub fallback_reason: Option<String>,
}

impl SelectionResult {
    /// Assemble the result from a terminal state and any gather-stage fallback.
    /// Returns `None` for a state that has not been resolved yet.
    pub fn from_state(
        requirement_id: RequirementId,
        state: SelectionState,
        requested_mode: SelectionMode,
        tier: CandidateTier,
        gather_fallback: Option<&str>,
    ) -> Option<Self> {
        let (selected_supplier, runner_ups, failsafe_reason) = match state {
            SelectionState::Confirmed {
                selected,
                runner_ups,
            } => (selected, runner_ups, None),
            SelectionState::Substituted {
                selected,
                runner_ups,
                reason,
                ..
            } => (selected, runner_ups, Some(reason)),
            SelectionState::Scored { .. } | SelectionState::RiskChecked { .. } => return None,
        };

        let reasons: Vec<String> = gather_fallback
            .map(str::to_string)
            .into_iter()
            .chain(failsafe_reason)
            .collect();
        let fallback_reason = if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        };

        Some(Self {
            requirement_id,
            selected_supplier,
            runner_ups,
            mode: tier.executed_mode(),
            requested_mode,
            tier,
            fallback_triggered: fallback_reason.is_some(),
            fallback_reason,
        })
    }
}
