use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest total score that is approved outright.
pub const APPROVE_THRESHOLD: f64 = 80.0;
/// Lowest total score that is approved with conditions.
pub const CONDITIONAL_THRESHOLD: f64 = 60.0;

/// Three-tier outcome derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Approve")]
    Approve,
    #[serde(rename = "Approve with conditions")]
    ApproveWithConditions,
    #[serde(rename = "Reject")]
    Reject,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Approve,
        Recommendation::ApproveWithConditions,
        Recommendation::Reject,
    ];

    pub fn from_score(total_score: f64) -> Self {
        if total_score >= APPROVE_THRESHOLD {
            Recommendation::Approve
        } else if total_score >= CONDITIONAL_THRESHOLD {
            Recommendation::ApproveWithConditions
        } else {
            Recommendation::Reject
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Approve => "Approve",
            Recommendation::ApproveWithConditions => "Approve with conditions",
            Recommendation::Reject => "Reject",
        }
    }

    pub fn summary(self) -> String {
        match self {
            Recommendation::Approve => {
                "meets the security requirements and can be approved".to_string()
            }
            Recommendation::ApproveWithConditions => {
                "can be approved once the identified risks are mitigated".to_string()
            }
            Recommendation::Reject => {
                "poses unacceptable security risks and should be rejected".to_string()
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
