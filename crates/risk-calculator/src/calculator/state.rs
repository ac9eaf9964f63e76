use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::defaults::default_platform_types;
use super::domain::{
    AppRequest, AppRequestId, AppRequestPatch, Criterion, CriterionId, CriterionOption,
    CriterionOptionPatch, CriterionPatch, NewAppRequest, NewCriterion, NewCriterionOption,
    NewPlatformType, OptionId, PlatformType, PlatformTypeId, PlatformTypePatch, RequestStatus,
};
use super::normalization::normalize_weights;
use super::scoring::{CalculationResult, ScoringEngine, ScoringError, Selections};

/// Complete data model: the configuration tree plus every submitted request.
///
/// All mutation goes through the command methods below. Each command validates its
/// input before touching the tree, so a failed command leaves the state unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    #[serde(default)]
    pub platform_types: Vec<PlatformType>,
    #[serde(default)]
    pub app_requests: Vec<AppRequest>,
}

impl CalculatorState {
    /// State seeded with the built-in platform types and no requests.
    pub fn with_defaults() -> Self {
        Self {
            platform_types: default_platform_types(),
            app_requests: Vec::new(),
        }
    }

    pub fn platform_type(&self, id: &PlatformTypeId) -> Option<&PlatformType> {
        self.platform_types
            .iter()
            .find(|platform_type| &platform_type.id == id)
    }

    pub fn platform_type_named(&self, name: &str) -> Option<&PlatformType> {
        self.platform_types
            .iter()
            .find(|platform_type| platform_type.name.eq_ignore_ascii_case(name))
    }

    pub fn app_request(&self, id: &AppRequestId) -> Option<&AppRequest> {
        self.app_requests.iter().find(|request| &request.id == id)
    }

    pub fn add_platform_type(
        &mut self,
        input: NewPlatformType,
    ) -> Result<PlatformTypeId, CatalogError> {
        require_text("platform type name", &input.name)?;

        let id = PlatformTypeId::generate();
        self.platform_types.push(PlatformType {
            id: id.clone(),
            name: input.name,
            description: input.description,
            criteria: Vec::new(),
        });
        Ok(id)
    }

    pub fn update_platform_type(
        &mut self,
        id: &PlatformTypeId,
        patch: PlatformTypePatch,
    ) -> Result<(), CatalogError> {
        if let Some(name) = &patch.name {
            require_text("platform type name", name)?;
        }

        let platform_type = self.platform_type_mut(id)?;
        if let Some(name) = patch.name {
            platform_type.name = name;
        }
        if let Some(description) = patch.description {
            platform_type.description = description;
        }
        Ok(())
    }

    /// Removes the platform type together with its criteria and options. Requests that
    /// reference it keep their id and any result snapshot.
    pub fn delete_platform_type(&mut self, id: &PlatformTypeId) -> Result<(), CatalogError> {
        let before = self.platform_types.len();
        self.platform_types
            .retain(|platform_type| &platform_type.id != id);
        if self.platform_types.len() == before {
            return Err(CatalogError::PlatformTypeNotFound(id.clone()));
        }
        Ok(())
    }

    pub fn add_criterion(
        &mut self,
        platform_type_id: &PlatformTypeId,
        input: NewCriterion,
    ) -> Result<CriterionId, CatalogError> {
        require_text("criterion name", &input.name)?;
        require_weight(input.weight)?;

        let platform_type = self.platform_type_mut(platform_type_id)?;
        let id = CriterionId::generate();
        platform_type.criteria.push(Criterion {
            id: id.clone(),
            name: input.name,
            description: input.description,
            weight: input.weight,
            options: Vec::new(),
            gate: input.gate,
        });
        normalize_weights(&mut platform_type.criteria);
        Ok(id)
    }

    pub fn update_criterion(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        patch: CriterionPatch,
    ) -> Result<(), CatalogError> {
        if let Some(name) = &patch.name {
            require_text("criterion name", name)?;
        }
        if let Some(weight) = patch.weight {
            require_weight(weight)?;
        }

        let platform_type = self.platform_type_mut(platform_type_id)?;
        let criterion = platform_type
            .criterion_mut(criterion_id)
            .ok_or_else(|| CatalogError::CriterionNotFound(criterion_id.clone()))?;
        if let Some(name) = patch.name {
            criterion.name = name;
        }
        if let Some(description) = patch.description {
            criterion.description = description;
        }
        if let Some(weight) = patch.weight {
            criterion.weight = weight;
        }
        if let Some(gate) = patch.gate {
            criterion.gate = gate;
        }
        normalize_weights(&mut platform_type.criteria);
        Ok(())
    }

    pub fn delete_criterion(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
    ) -> Result<(), CatalogError> {
        let platform_type = self.platform_type_mut(platform_type_id)?;
        let before = platform_type.criteria.len();
        platform_type
            .criteria
            .retain(|criterion| &criterion.id != criterion_id);
        if platform_type.criteria.len() == before {
            return Err(CatalogError::CriterionNotFound(criterion_id.clone()));
        }
        normalize_weights(&mut platform_type.criteria);
        Ok(())
    }

    pub fn add_criterion_option(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        input: NewCriterionOption,
    ) -> Result<OptionId, CatalogError> {
        require_text("option label", &input.label)?;
        require_option_value(input.value)?;

        let criterion = self.criterion_mut(platform_type_id, criterion_id)?;
        let id = OptionId::generate();
        criterion.options.push(CriterionOption {
            id: id.clone(),
            label: input.label,
            value: input.value,
            description: input.description,
        });
        Ok(id)
    }

    pub fn update_criterion_option(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        option_id: &OptionId,
        patch: CriterionOptionPatch,
    ) -> Result<(), CatalogError> {
        if let Some(label) = &patch.label {
            require_text("option label", label)?;
        }
        if let Some(value) = patch.value {
            require_option_value(value)?;
        }

        let option = self
            .criterion_mut(platform_type_id, criterion_id)?
            .option_mut(option_id)
            .ok_or_else(|| CatalogError::OptionNotFound(option_id.clone()))?;
        if let Some(label) = patch.label {
            option.label = label;
        }
        if let Some(value) = patch.value {
            option.value = value;
        }
        if let Some(description) = patch.description {
            option.description = description;
        }
        Ok(())
    }

    pub fn delete_criterion_option(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
        option_id: &OptionId,
    ) -> Result<(), CatalogError> {
        let criterion = self.criterion_mut(platform_type_id, criterion_id)?;
        let before = criterion.options.len();
        criterion.options.retain(|option| &option.id != option_id);
        if criterion.options.len() == before {
            return Err(CatalogError::OptionNotFound(option_id.clone()));
        }
        Ok(())
    }

    /// On-demand rebalance of one platform type's weights.
    pub fn normalize_criteria_weights(
        &mut self,
        platform_type_id: &PlatformTypeId,
    ) -> Result<(), CatalogError> {
        let platform_type = self.platform_type_mut(platform_type_id)?;
        normalize_weights(&mut platform_type.criteria);
        Ok(())
    }

    pub fn add_app_request(
        &mut self,
        input: NewAppRequest,
    ) -> Result<AppRequestId, CatalogError> {
        require_text("application name", &input.name)?;
        require_text("requestor", &input.requestor)?;
        if self.platform_type(&input.platform_type_id).is_none() {
            return Err(CatalogError::PlatformTypeNotFound(input.platform_type_id));
        }

        let id = AppRequestId::generate();
        self.app_requests.push(AppRequest {
            id: id.clone(),
            name: input.name,
            description: input.description,
            platform_type_id: input.platform_type_id,
            request_date: Utc::now(),
            requestor: input.requestor,
            status: RequestStatus::Pending,
            calculation_result: None,
        });
        Ok(id)
    }

    pub fn update_app_request(
        &mut self,
        id: &AppRequestId,
        patch: AppRequestPatch,
    ) -> Result<(), CatalogError> {
        if let Some(name) = &patch.name {
            require_text("application name", name)?;
        }
        if let Some(requestor) = &patch.requestor {
            require_text("requestor", requestor)?;
        }

        let request = self.app_request_mut(id)?;
        if let Some(name) = patch.name {
            request.name = name;
        }
        if let Some(description) = patch.description {
            request.description = description;
        }
        if let Some(requestor) = patch.requestor {
            request.requestor = requestor;
        }
        if let Some(status) = patch.status {
            request.status = status;
        }
        Ok(())
    }

    pub fn delete_app_request(&mut self, id: &AppRequestId) -> Result<(), CatalogError> {
        let before = self.app_requests.len();
        self.app_requests.retain(|request| &request.id != id);
        if self.app_requests.len() == before {
            return Err(CatalogError::AppRequestNotFound(id.clone()));
        }
        Ok(())
    }

    /// Scores the request against its platform type and attaches the result, replacing
    /// any earlier one. Nothing is attached when scoring fails.
    pub fn calculate_score(
        &mut self,
        app_request_id: &AppRequestId,
        selections: &Selections,
    ) -> Result<CalculationResult, ScoringError> {
        let request = self
            .app_request(app_request_id)
            .ok_or_else(|| ScoringError::AppRequestNotFound(app_request_id.clone()))?;
        let platform_type = self
            .platform_type(&request.platform_type_id)
            .ok_or_else(|| ScoringError::PlatformTypeNotFound(request.platform_type_id.clone()))?;

        let result = ScoringEngine::new().score(platform_type, selections)?;

        if let Some(request) = self
            .app_requests
            .iter_mut()
            .find(|request| &request.id == app_request_id)
        {
            request.calculation_result = Some(result.clone());
        }
        Ok(result)
    }

    fn platform_type_mut(
        &mut self,
        id: &PlatformTypeId,
    ) -> Result<&mut PlatformType, CatalogError> {
        self.platform_types
            .iter_mut()
            .find(|platform_type| &platform_type.id == id)
            .ok_or_else(|| CatalogError::PlatformTypeNotFound(id.clone()))
    }

    fn criterion_mut(
        &mut self,
        platform_type_id: &PlatformTypeId,
        criterion_id: &CriterionId,
    ) -> Result<&mut Criterion, CatalogError> {
        self.platform_type_mut(platform_type_id)?
            .criterion_mut(criterion_id)
            .ok_or_else(|| CatalogError::CriterionNotFound(criterion_id.clone()))
    }

    fn app_request_mut(&mut self, id: &AppRequestId) -> Result<&mut AppRequest, CatalogError> {
        self.app_requests
            .iter_mut()
            .find(|request| &request.id == id)
            .ok_or_else(|| CatalogError::AppRequestNotFound(id.clone()))
    }
}

fn require_text(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn require_weight(weight: f64) -> Result<(), CatalogError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(CatalogError::Validation(format!(
            "criterion weight must be a non-negative number, got {weight}"
        )));
    }
    Ok(())
}

fn require_option_value(value: f64) -> Result<(), CatalogError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(CatalogError::Validation(format!(
            "option value must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Failures raised by configuration and request commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("platform type {0} not found")]
    PlatformTypeNotFound(PlatformTypeId),
    #[error("criterion {0} not found")]
    CriterionNotFound(CriterionId),
    #[error("option {0} not found")]
    OptionNotFound(OptionId),
    #[error("app request {0} not found")]
    AppRequestNotFound(AppRequestId),
    #[error("invalid input: {0}")]
    Validation(String),
}
