use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::scoring::CalculationResult;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier wrapper for platform categories.
    PlatformTypeId
);
string_id!(
    /// Identifier wrapper for criteria, unique across the whole catalog.
    CriterionId
);
string_id!(
    /// Identifier wrapper for selectable criterion answers.
    OptionId
);
string_id!(
    /// Identifier wrapper for submitted application requests.
    AppRequestId
);

/// Category of application being evaluated (SaaS, OAuth app, browser plugin, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformType {
    pub id: PlatformTypeId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl PlatformType {
    pub fn criterion(&self, id: &CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| &criterion.id == id)
    }

    pub fn criterion_mut(&mut self, id: &CriterionId) -> Option<&mut Criterion> {
        self.criteria.iter_mut().find(|criterion| &criterion.id == id)
    }

    pub fn criterion_named(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.name == name)
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.weight).sum()
    }
}

/// Weighted evaluation question owned by a platform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub description: String,
    pub weight: f64,
    #[serde(default)]
    pub options: Vec<CriterionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<EvaluationGate>,
}

impl Criterion {
    pub fn option(&self, id: &OptionId) -> Option<&CriterionOption> {
        self.options.iter().find(|option| &option.id == id)
    }

    pub fn option_mut(&mut self, id: &OptionId) -> Option<&mut CriterionOption> {
        self.options.iter_mut().find(|option| &option.id == id)
    }

    /// First option carrying the highest value.
    pub fn preferred_option(&self) -> Option<&CriterionOption> {
        self.options.iter().fold(None, |best, option| match best {
            Some(current) if option.value <= current.value => Some(current),
            _ => Some(option),
        })
    }
}

/// One selectable answer and its raw 0-100 contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionOption {
    pub id: OptionId,
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Blocking predicate attached to a criterion: selecting an option whose value
/// equals `blocking_value` withholds the whole evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationGate {
    pub blocking_value: f64,
    pub message: String,
}

/// Review state of a submitted request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// Application submitted for evaluation against one platform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRequest {
    pub id: AppRequestId,
    pub name: String,
    pub description: String,
    pub platform_type_id: PlatformTypeId,
    pub request_date: DateTime<Utc>,
    pub requestor: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_result: Option<CalculationResult>,
}

/// Fields supplied when creating a platform type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatformType {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update of a platform type; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Fields supplied when adding a criterion. Options are added individually afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCriterion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub gate: Option<EvaluationGate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<f64>,
    /// Absent leaves the gate alone, `null` removes it.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub gate: Option<Option<EvaluationGate>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCriterionOption {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionOptionPatch {
    pub label: Option<String>,
    pub value: Option<f64>,
    /// Absent leaves the description alone, `null` removes it.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

/// Application details captured before the evaluation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub platform_type_id: PlatformTypeId,
    pub requestor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRequestPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub requestor: Option<String>,
    pub status: Option<RequestStatus>,
}

/// Keeps a present `null` distinct from a missing field in patch payloads.
fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
