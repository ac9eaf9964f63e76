use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::calculator::domain::{
    AppRequest, AppRequestId, Criterion, CriterionId, CriterionOption, OptionId, PlatformType,
    PlatformTypeId, RequestStatus,
};
use crate::calculator::repository::{RepositoryError, StateRepository};
use crate::calculator::scoring::{Selections, LEGACY_GATED_PLATFORM, LEGACY_GATING_CRITERION};
use crate::calculator::service::CalculatorService;
use crate::calculator::state::CalculatorState;

pub(super) const OAUTH_WEIGHTS: [f64; 5] = [20.0, 24.0, 20.0, 16.0, 20.0];

fn option(id: &str, label: &str, value: f64) -> CriterionOption {
    CriterionOption {
        id: OptionId::from(id),
        label: label.to_string(),
        value,
        description: None,
    }
}

fn three_level_criterion(prefix: &str, name: &str, weight: f64) -> Criterion {
    Criterion {
        id: CriterionId::from(prefix),
        name: name.to_string(),
        description: format!("{name} assessment"),
        weight,
        options: vec![
            option(&format!("{prefix}-high"), "High", 100.0),
            option(&format!("{prefix}-mid"), "Medium", 50.0),
            option(&format!("{prefix}-low"), "Low", 0.0),
        ],
        gate: None,
    }
}

/// OAuth platform with the stock weights and deterministic ids.
pub(super) fn oauth_platform() -> PlatformType {
    let names = [
        "Internal Alternative Exists?",
        "Permissions Scope",
        "App Verification",
        "User Base",
        "Data Access",
    ];
    PlatformType {
        id: PlatformTypeId::from("oauth"),
        name: "OAuth".to_string(),
        description: "Third-party apps using OAuth".to_string(),
        criteria: names
            .iter()
            .zip(OAUTH_WEIGHTS)
            .enumerate()
            .map(|(index, (name, weight))| {
                three_level_criterion(&format!("oauth-{index}"), name, weight)
            })
            .collect(),
    }
}

/// Website whitelisting platform carrying the manager approval question.
pub(super) fn whitelisting_platform() -> PlatformType {
    let mut manager = three_level_criterion("wl-manager", LEGACY_GATING_CRITERION, 30.0);
    manager.options = vec![
        option("wl-manager-yes", "Yes", 100.0),
        option("wl-manager-no", "No", 0.0),
    ];

    PlatformType {
        id: PlatformTypeId::from("whitelisting"),
        name: LEGACY_GATED_PLATFORM.to_string(),
        description: "Requests to unblock websites".to_string(),
        criteria: vec![
            three_level_criterion("wl-misclassified", "Probably misclassified", 35.0),
            manager,
            three_level_criterion("wl-justification", "Has a Business Justification?", 35.0),
        ],
    }
}

pub(super) fn app_request(id: &str, platform_type: &PlatformType) -> AppRequest {
    AppRequest {
        id: AppRequestId::from(id),
        name: format!("App {id}"),
        description: String::new(),
        platform_type_id: platform_type.id.clone(),
        request_date: Utc
            .with_ymd_and_hms(2025, 5, 2, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        requestor: "j.smith".to_string(),
        status: RequestStatus::Pending,
        calculation_result: None,
    }
}

/// State holding the OAuth and whitelisting fixtures plus one pending request for each.
pub(super) fn fixture_state() -> CalculatorState {
    let oauth = oauth_platform();
    let whitelisting = whitelisting_platform();
    CalculatorState {
        app_requests: vec![
            app_request("req-oauth", &oauth),
            app_request("req-web", &whitelisting),
        ],
        platform_types: vec![oauth, whitelisting],
    }
}

/// Selects the option with `label` for every criterion that offers it.
pub(super) fn select_all(platform_type: &PlatformType, label: &str) -> Selections {
    platform_type
        .criteria
        .iter()
        .filter_map(|criterion| {
            criterion
                .options
                .iter()
                .find(|option| option.label == label)
                .map(|option| (criterion.id.clone(), option.id.clone()))
        })
        .collect()
}

pub(super) fn build_service() -> (CalculatorService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CalculatorService::with_state(repository.clone(), fixture_state());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) stored: Arc<Mutex<Option<CalculatorState>>>,
    pub(super) saves: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn seeded(state: CalculatorState) -> Self {
        Self {
            stored: Arc::new(Mutex::new(Some(state))),
            saves: Arc::default(),
        }
    }

    pub(super) fn stored(&self) -> Option<CalculatorState> {
        self.stored.lock().expect("repository mutex poisoned").clone()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("repository mutex poisoned")
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self) -> Result<Option<CalculatorState>, RepositoryError> {
        Ok(self.stored())
    }

    fn save(&self, state: &CalculatorState) -> Result<(), RepositoryError> {
        *self.stored.lock().expect("repository mutex poisoned") = Some(state.clone());
        *self.saves.lock().expect("repository mutex poisoned") += 1;
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl StateRepository for UnavailableRepository {
    fn load(&self) -> Result<Option<CalculatorState>, RepositoryError> {
        Ok(None)
    }

    fn save(&self, _state: &CalculatorState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
