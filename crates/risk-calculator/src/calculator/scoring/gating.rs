use serde::{Deserialize, Serialize};

use super::super::domain::{CriterionId, EvaluationGate, PlatformType};
use super::Selections;

/// Platform type that carried the hard-coded manager approval rule before gates were
/// stored on criteria.
pub const LEGACY_GATED_PLATFORM: &str = "Whitelisting websites";
pub const LEGACY_GATING_CRITERION: &str = "Approved by user's manager";
const LEGACY_GATE_MESSAGE: &str =
    "Evaluation blocked - manager approval is required before the website can be evaluated";

/// Gating criterion that currently withholds the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedEvaluation {
    pub criterion_id: CriterionId,
    pub criterion_name: String,
    pub message: String,
}

/// Gate that applies to the criterion, falling back to the legacy name match when the
/// stored configuration predates explicit gates.
pub fn effective_gate(
    platform_type: &PlatformType,
    criterion_id: &CriterionId,
) -> Option<EvaluationGate> {
    let criterion = platform_type.criterion(criterion_id)?;
    if let Some(gate) = &criterion.gate {
        return Some(gate.clone());
    }

    if platform_type.name == LEGACY_GATED_PLATFORM && criterion.name == LEGACY_GATING_CRITERION {
        return Some(EvaluationGate {
            blocking_value: 0.0,
            message: LEGACY_GATE_MESSAGE.to_string(),
        });
    }

    None
}

/// Checks the current selections against every gating criterion. Unanswered gating
/// criteria never block, and the remaining criteria do not need to be answered.
pub fn blocking_criterion(
    platform_type: &PlatformType,
    selections: &Selections,
) -> Option<BlockedEvaluation> {
    platform_type.criteria.iter().find_map(|criterion| {
        let gate = effective_gate(platform_type, &criterion.id)?;
        let option = criterion.option(selections.get(&criterion.id)?)?;
        (option.value == gate.blocking_value).then(|| BlockedEvaluation {
            criterion_id: criterion.id.clone(),
            criterion_name: criterion.name.clone(),
            message: gate.message,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::domain::{Criterion, CriterionOption, OptionId, PlatformTypeId};

    fn option(id: &str, value: f64) -> CriterionOption {
        CriterionOption {
            id: OptionId::from(id),
            label: id.to_string(),
            value,
            description: None,
        }
    }

    fn whitelisting(gate: Option<EvaluationGate>, criterion_name: &str) -> PlatformType {
        PlatformType {
            id: PlatformTypeId::from("wl"),
            name: LEGACY_GATED_PLATFORM.to_string(),
            description: String::new(),
            criteria: vec![
                Criterion {
                    id: CriterionId::from("manager"),
                    name: criterion_name.to_string(),
                    description: String::new(),
                    weight: 50.0,
                    options: vec![option("yes", 100.0), option("no", 0.0)],
                    gate,
                },
                Criterion {
                    id: CriterionId::from("justification"),
                    name: "Has a Business Justification?".to_string(),
                    description: String::new(),
                    weight: 50.0,
                    options: vec![option("critical", 100.0), option("none", 0.0)],
                    gate: None,
                },
            ],
        }
    }

    fn select(pairs: &[(&str, &str)]) -> Selections {
        pairs
            .iter()
            .map(|(criterion, option)| (CriterionId::from(*criterion), OptionId::from(*option)))
            .collect()
    }

    #[test]
    fn legacy_manager_rule_blocks_on_zero_value() {
        let platform = whitelisting(None, LEGACY_GATING_CRITERION);
        let blocked = blocking_criterion(&platform, &select(&[("manager", "no")]))
            .expect("manager refusal blocks");
        assert_eq!(blocked.criterion_id, CriterionId::from("manager"));
        assert!(blocked.message.contains("manager approval"));
    }

    #[test]
    fn approval_or_missing_answer_does_not_block() {
        let platform = whitelisting(None, LEGACY_GATING_CRITERION);
        assert!(blocking_criterion(&platform, &select(&[("manager", "yes")])).is_none());
        assert!(blocking_criterion(&platform, &select(&[("justification", "none")])).is_none());
    }

    #[test]
    fn other_criterion_names_are_not_gated_without_explicit_gate() {
        let platform = whitelisting(None, "Manager sign-off");
        assert!(blocking_criterion(&platform, &select(&[("manager", "no")])).is_none());
    }

    #[test]
    fn explicit_gate_applies_to_any_platform() {
        let mut platform = whitelisting(
            Some(EvaluationGate {
                blocking_value: 0.0,
                message: "sign-off required".to_string(),
            }),
            "Manager sign-off",
        );
        platform.name = "SaaS".to_string();

        let blocked = blocking_criterion(&platform, &select(&[("manager", "no")]))
            .expect("explicit gate blocks");
        assert_eq!(blocked.message, "sign-off required");
    }
}
