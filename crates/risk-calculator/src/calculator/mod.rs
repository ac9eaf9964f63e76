//! Weighted multi-criteria security scoring for third-party application requests.
//!
//! Platform types own weighted criteria, criteria own scored options, and a request is
//! evaluated by picking one option per criterion. The [`service::CalculatorService`]
//! facade serializes commands over a single [`state::CalculatorState`] and persists each
//! successful mutation through a [`repository::StateRepository`].

pub mod analytics;
pub mod defaults;
pub mod domain;
pub mod export;
pub mod normalization;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;

pub use analytics::{risk_matrix, risk_trends, EvaluationFilter, RiskMatrix, TrendReport};
pub use defaults::default_platform_types;
pub use domain::{
    AppRequest, AppRequestId, AppRequestPatch, Criterion, CriterionId, CriterionOption,
    CriterionOptionPatch, CriterionPatch, EvaluationGate, NewAppRequest, NewCriterion,
    NewCriterionOption, NewPlatformType, OptionId, PlatformType, PlatformTypeId,
    PlatformTypePatch, RequestStatus,
};
pub use export::ExportError;
pub use normalization::normalize_weights;
pub use repository::{JsonFileRepository, RepositoryError, StateRepository, STORAGE_KEY};
pub use router::calculator_router;
pub use scoring::{
    BlockedEvaluation, CalculationResult, CriterionScore, Evaluation, Recommendation,
    ScoringEngine, ScoringError, Selections,
};
pub use service::{CalculatorService, CalculatorServiceError};
pub use state::{CalculatorState, CatalogError};
