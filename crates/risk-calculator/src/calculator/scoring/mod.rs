mod gating;
mod policy;

pub use gating::{
    blocking_criterion, effective_gate, BlockedEvaluation, LEGACY_GATED_PLATFORM,
    LEGACY_GATING_CRITERION,
};
pub use policy::{Recommendation, APPROVE_THRESHOLD, CONDITIONAL_THRESHOLD};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    AppRequestId, CriterionId, CriterionOption, OptionId, PlatformType, PlatformTypeId,
};

/// Chosen option per criterion, keyed by criterion id.
pub type Selections = BTreeMap<CriterionId, OptionId>;

/// Stateless evaluator that turns a complete set of selections into a weighted score.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Scores every criterion of `platform_type`. Fails on the first criterion without a
    /// selection that matches one of its options; selections for unknown criteria are
    /// ignored.
    pub fn score(
        &self,
        platform_type: &PlatformType,
        selections: &Selections,
    ) -> Result<CalculationResult, ScoringError> {
        let criteria_scores = platform_type
            .criteria
            .iter()
            .map(|criterion| {
                let selected_option = selections
                    .get(&criterion.id)
                    .and_then(|option_id| criterion.option(option_id))
                    .ok_or_else(|| ScoringError::IncompleteSelection {
                        criterion_id: criterion.id.clone(),
                        criterion_name: criterion.name.clone(),
                    })?;

                Ok(CriterionScore {
                    criterion_id: criterion.id.clone(),
                    criterion_name: criterion.name.clone(),
                    weight: criterion.weight,
                    selected_option: selected_option.clone(),
                    weighted_score: weighted_score(selected_option.value, criterion.weight),
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        let total_score = criteria_scores
            .iter()
            .map(|score| score.weighted_score)
            .sum();

        Ok(CalculationResult {
            criteria_scores,
            total_score,
            recommendation: Recommendation::from_score(total_score),
            platform_type: platform_type.clone(),
        })
    }
}

/// Linear scaling of a raw 0-100 option value into a weight-sized contribution.
pub fn weighted_score(option_value: f64, weight: f64) -> f64 {
    (option_value / 100.0) * weight
}

/// Contribution of one criterion, fully resolved for exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub criterion_id: CriterionId,
    pub criterion_name: String,
    pub weight: f64,
    pub selected_option: CriterionOption,
    pub weighted_score: f64,
}

/// Immutable outcome of one calculation, including a snapshot of the platform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub criteria_scores: Vec<CriterionScore>,
    pub total_score: f64,
    pub recommendation: Recommendation,
    pub platform_type: PlatformType,
}

/// Outcome of a blocked-aware evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Scored(CalculationResult),
    Blocked(BlockedEvaluation),
}

impl Evaluation {
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Evaluation::Scored(result) => Some(result),
            Evaluation::Blocked(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("app request {0} not found")]
    AppRequestNotFound(AppRequestId),
    #[error("platform type {0} not found")]
    PlatformTypeNotFound(PlatformTypeId),
    #[error("no selection made for criterion: {criterion_name}")]
    IncompleteSelection {
        criterion_id: CriterionId,
        criterion_name: String,
    },
}

/// Formats a score without trailing decimals when it is integral.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
