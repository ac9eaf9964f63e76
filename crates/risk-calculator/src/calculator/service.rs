use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::domain::{
    AppRequest, AppRequestId, AppRequestPatch, CriterionId, CriterionOptionPatch, CriterionPatch,
    NewAppRequest, NewCriterion, NewCriterionOption, NewPlatformType, OptionId, PlatformType,
    PlatformTypeId, PlatformTypePatch,
};
use super::repository::{RepositoryError, StateRepository};
use super::scoring::{blocking_criterion, CalculationResult, Evaluation, ScoringError, Selections};
use super::state::{CalculatorState, CatalogError};

/// Single-writer facade over the calculator state.
///
/// Every command runs against a working copy under one lock; the copy is persisted and
/// only then swapped in, so readers never observe a partial update and a failed save
/// leaves the in-memory state untouched.
pub struct CalculatorService<R> {
    state: Mutex<CalculatorState>,
    repository: Arc<R>,
}

impl<R> CalculatorService<R>
where
    R: StateRepository + 'static,
{
    /// Loads the last persisted state, seeding the built-in catalog when nothing was stored.
    pub fn open(repository: Arc<R>) -> Result<Self, CalculatorServiceError> {
        let state = match repository.load()? {
            Some(state) => {
                info!(
                    platform_types = state.platform_types.len(),
                    app_requests = state.app_requests.len(),
                    "restored persisted calculator state"
                );
                state
            }
            None => {
                info!("no persisted state found, seeding default platform types");
                CalculatorState::with_defaults()
            }
        };
        Ok(Self::with_state(repository, state))
    }

    pub fn with_state(repository: Arc<R>, state: CalculatorState) -> Self {
        Self {
            state: Mutex::new(state),
            repository,
        }
    }

    pub fn snapshot(&self) -> CalculatorState {
        self.lock().clone()
    }

    pub fn platform_types(&self) -> Vec<PlatformType> {
        self.lock().platform_types.clone()
    }

    pub fn platform_type(
        &self,
        id: &PlatformTypeId,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.lock()
            .platform_type(id)
            .cloned()
            .ok_or_else(|| CatalogError::PlatformTypeNotFound(id.clone()).into())
    }

    pub fn app_requests(&self) -> Vec<AppRequest> {
        self.lock().app_requests.clone()
    }

    pub fn app_request(&self, id: &AppRequestId) -> Result<AppRequest, CalculatorServiceError> {
        self.lock()
            .app_request(id)
            .cloned()
            .ok_or_else(|| CatalogError::AppRequestNotFound(id.clone()).into())
    }

    pub fn add_platform_type(
        &self,
        input: NewPlatformType,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            let id = state.add_platform_type(input)?;
            platform_type_view(state, &id)
        })
    }

    pub fn update_platform_type(
        &self,
        id: &PlatformTypeId,
        patch: PlatformTypePatch,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            state.update_platform_type(id, patch)?;
            platform_type_view(state, id)
        })
    }

    pub fn delete_platform_type(&self, id: &PlatformTypeId) -> Result<(), CalculatorServiceError> {
        self.commit(|state| state.delete_platform_type(id))?;
        info!(platform_type_id = %id, "deleted platform type");
        Ok(())
    }

    /// Adds a criterion and returns the platform type with its renormalized weights.
    pub fn add_criterion(
        &self,
        platform_type_id: &PlatformTypeId,
        input: NewCriterion,
    ) -> Result<(CriterionId, PlatformType), CalculatorServiceError> {
        self.commit(|state| {
            let id = state.add_criterion(platform_type_id, input)?;
            Ok::<_, CatalogError>((id, platform_type_view(state, platform_type_id)?))
        })
    }

    pub fn update_criterion(
        &self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        patch: CriterionPatch,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            state.update_criterion(platform_type_id, criterion_id, patch)?;
            platform_type_view(state, platform_type_id)
        })
    }

    pub fn delete_criterion(
        &self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            state.delete_criterion(platform_type_id, criterion_id)?;
            platform_type_view(state, platform_type_id)
        })
    }

    pub fn add_criterion_option(
        &self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        input: NewCriterionOption,
    ) -> Result<(OptionId, PlatformType), CalculatorServiceError> {
        self.commit(|state| {
            let id = state.add_criterion_option(platform_type_id, criterion_id, input)?;
            Ok::<_, CatalogError>((id, platform_type_view(state, platform_type_id)?))
        })
    }

    pub fn update_criterion_option(
        &self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        option_id: &OptionId,
        patch: CriterionOptionPatch,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            state.update_criterion_option(platform_type_id, criterion_id, option_id, patch)?;
            platform_type_view(state, platform_type_id)
        })
    }

    pub fn delete_criterion_option(
        &self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        option_id: &OptionId,
    ) -> Result<PlatformType, CalculatorServiceError> {
        self.commit(|state| {
            state.delete_criterion_option(platform_type_id, criterion_id, option_id)?;
            platform_type_view(state, platform_type_id)
        })
    }

    pub fn normalize_criteria_weights(
        &self,
        platform_type_id: &PlatformTypeId,
    ) -> Result<PlatformType, CalculatorServiceError> {
        let platform_type = self.commit(|state| {
            state.normalize_criteria_weights(platform_type_id)?;
            platform_type_view(state, platform_type_id)
        })?;
        debug!(
            platform_type = %platform_type.name,
            total_weight = platform_type.total_weight(),
            "normalized criteria weights"
        );
        Ok(platform_type)
    }

    pub fn add_app_request(
        &self,
        input: NewAppRequest,
    ) -> Result<AppRequest, CalculatorServiceError> {
        let request = self.commit(|state| {
            let id = state.add_app_request(input)?;
            app_request_view(state, &id)
        })?;
        info!(app_request_id = %request.id, name = %request.name, "app request submitted");
        Ok(request)
    }

    pub fn update_app_request(
        &self,
        id: &AppRequestId,
        patch: AppRequestPatch,
    ) -> Result<AppRequest, CalculatorServiceError> {
        self.commit(|state| {
            state.update_app_request(id, patch)?;
            app_request_view(state, id)
        })
    }

    pub fn delete_app_request(&self, id: &AppRequestId) -> Result<(), CalculatorServiceError> {
        self.commit(|state| state.delete_app_request(id))
    }

    /// Scores the request and attaches the result. Gates are not consulted here.
    pub fn calculate_score(
        &self,
        app_request_id: &AppRequestId,
        selections: &Selections,
    ) -> Result<CalculationResult, CalculatorServiceError> {
        let result = self.commit(|state| state.calculate_score(app_request_id, selections))?;
        info!(
            app_request_id = %app_request_id,
            total_score = result.total_score,
            recommendation = %result.recommendation,
            "calculated app request score"
        );
        Ok(result)
    }

    /// Gate-aware calculation: a blocked evaluation yields no score and attaches nothing.
    ///
    /// The gate check and the scoring share one lock, so a concurrent catalog edit can
    /// never slip between them.
    pub fn evaluate(
        &self,
        app_request_id: &AppRequestId,
        selections: &Selections,
    ) -> Result<Evaluation, CalculatorServiceError> {
        let mut guard = self.lock();
        let request = guard
            .app_request(app_request_id)
            .ok_or_else(|| ScoringError::AppRequestNotFound(app_request_id.clone()))?;
        let platform_type = guard.platform_type(&request.platform_type_id).ok_or_else(|| {
            ScoringError::PlatformTypeNotFound(request.platform_type_id.clone())
        })?;

        if let Some(blocked) = blocking_criterion(platform_type, selections) {
            info!(
                app_request_id = %app_request_id,
                criterion = %blocked.criterion_name,
                "evaluation blocked by gating criterion"
            );
            return Ok(Evaluation::Blocked(blocked));
        }

        let result = self.apply(&mut guard, |state| {
            state.calculate_score(app_request_id, selections)
        })?;
        drop(guard);
        info!(
            app_request_id = %app_request_id,
            total_score = result.total_score,
            recommendation = %result.recommendation,
            "calculated app request score"
        );
        Ok(Evaluation::Scored(result))
    }

    fn lock(&self) -> MutexGuard<'_, CalculatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit<T, E>(
        &self,
        command: impl FnOnce(&mut CalculatorState) -> Result<T, E>,
    ) -> Result<T, CalculatorServiceError>
    where
        CalculatorServiceError: From<E>,
    {
        let mut guard = self.lock();
        self.apply(&mut guard, command)
    }

    /// Runs `command` on a copy of the locked state, saves it and swaps it in.
    fn apply<T, E>(
        &self,
        guard: &mut MutexGuard<'_, CalculatorState>,
        command: impl FnOnce(&mut CalculatorState) -> Result<T, E>,
    ) -> Result<T, CalculatorServiceError>
    where
        CalculatorServiceError: From<E>,
    {
        let mut working = (**guard).clone();
        let output = command(&mut working)?;
        self.repository.save(&working)?;
        **guard = working;
        Ok(output)
    }
}

fn platform_type_view(
    state: &CalculatorState,
    id: &PlatformTypeId,
) -> Result<PlatformType, CatalogError> {
    state
        .platform_type(id)
        .cloned()
        .ok_or_else(|| CatalogError::PlatformTypeNotFound(id.clone()))
}

fn app_request_view(
    state: &CalculatorState,
    id: &AppRequestId,
) -> Result<AppRequest, CatalogError> {
    state
        .app_request(id)
        .cloned()
        .ok_or_else(|| CatalogError::AppRequestNotFound(id.clone()))
}

/// Error raised by the calculator service.
#[derive(Debug, thiserror::Error)]
pub enum CalculatorServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
