use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use risk_calculator::calculator::{
    CalculatorServiceError, CalculatorState, JsonFileRepository, PlatformType, RepositoryError,
    Selections, StateRepository,
};
use risk_calculator::config::AppConfig;
use risk_calculator::error::AppError;

use crate::cli::StorageArgs;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps the state in memory only; used by the CLI so ad-hoc runs never touch stored data.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStateRepository {
    state: Arc<Mutex<Option<CalculatorState>>>,
}

impl StateRepository for InMemoryStateRepository {
    fn load(&self) -> Result<Option<CalculatorState>, RepositoryError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("state mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &CalculatorState) -> Result<(), RepositoryError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("state mutex poisoned".to_string()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

/// Data directory from the flag, else from `APP_DATA_DIR`.
pub(crate) fn data_dir(storage: &StorageArgs) -> Result<PathBuf, AppError> {
    match &storage.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(AppConfig::load()?.storage.data_dir),
    }
}

/// Persisted state, or the built-in catalog when nothing was stored yet.
pub(crate) fn load_state(storage: &StorageArgs) -> Result<CalculatorState, AppError> {
    let repository = JsonFileRepository::in_dir(data_dir(storage)?);
    let stored = repository.load().map_err(CalculatorServiceError::from)?;
    Ok(stored.unwrap_or_else(CalculatorState::with_defaults))
}

pub(crate) fn find_platform<'a>(
    state: &'a CalculatorState,
    name: &str,
) -> Result<&'a PlatformType, AppError> {
    state.platform_type_named(name).ok_or_else(|| {
        let known: Vec<&str> = state
            .platform_types
            .iter()
            .map(|platform_type| platform_type.name.as_str())
            .collect();
        AppError::Input(format!(
            "unknown platform type '{name}' (known: {})",
            known.join(", ")
        ))
    })
}

/// Clap value parser for `--select "CRITERION=OPTION LABEL"`.
pub(crate) fn parse_selection(raw: &str) -> Result<(String, String), String> {
    let (criterion, option) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CRITERION=OPTION, got '{raw}'"))?;
    let (criterion, option) = (criterion.trim(), option.trim());
    if criterion.is_empty() || option.is_empty() {
        return Err(format!("expected CRITERION=OPTION, got '{raw}'"));
    }
    Ok((criterion.to_string(), option.to_string()))
}

/// Resolves criterion names and option labels (case-insensitive) into ids.
pub(crate) fn resolve_selections(
    platform_type: &PlatformType,
    pairs: &[(String, String)],
) -> Result<Selections, AppError> {
    let mut selections = Selections::new();
    for (criterion_name, option_label) in pairs {
        let criterion = platform_type
            .criteria
            .iter()
            .find(|criterion| criterion.name.eq_ignore_ascii_case(criterion_name))
            .ok_or_else(|| {
                AppError::Input(format!(
                    "{} has no criterion named '{criterion_name}'",
                    platform_type.name
                ))
            })?;
        let option = criterion
            .options
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(option_label))
            .ok_or_else(|| {
                let labels: Vec<&str> = criterion
                    .options
                    .iter()
                    .map(|option| option.label.as_str())
                    .collect();
                AppError::Input(format!(
                    "'{}' has no option '{option_label}' (options: {})",
                    criterion.name,
                    labels.join(", ")
                ))
            })?;
        selections.insert(criterion.id.clone(), option.id.clone());
    }
    Ok(selections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_selection_splits_on_first_equals() {
        assert_eq!(
            parse_selection("Permissions Scope = Read-only").expect("parses"),
            ("Permissions Scope".to_string(), "Read-only".to_string())
        );
        assert_eq!(
            parse_selection("Note=a=b").expect("parses"),
            ("Note".to_string(), "a=b".to_string())
        );
        assert!(parse_selection("Permissions Scope").is_err());
        assert!(parse_selection("=Read-only").is_err());
    }

    #[test]
    fn resolve_selections_matches_names_case_insensitively() {
        let state = CalculatorState::with_defaults();
        let oauth = find_platform(&state, "oauth").expect("OAuth exists");

        let selections = resolve_selections(
            oauth,
            &[("permissions scope".to_string(), "READ-ONLY".to_string())],
        )
        .expect("resolves");

        let criterion = oauth
            .criterion_named("Permissions Scope")
            .expect("criterion");
        let option = &criterion.options[0];
        assert_eq!(selections.get(&criterion.id), Some(&option.id));
    }

    #[test]
    fn resolve_selections_reports_unknown_labels() {
        let state = CalculatorState::with_defaults();
        let oauth = find_platform(&state, "OAuth").expect("OAuth exists");

        let err = resolve_selections(
            oauth,
            &[("Permissions Scope".to_string(), "Everything".to_string())],
        )
        .expect_err("unknown option");
        assert!(err.to_string().contains("Read-only"));
        assert!(find_platform(&state, "Mainframe").is_err());
    }

    #[test]
    fn in_memory_repository_round_trips_state() {
        let repository = InMemoryStateRepository::default();
        assert!(repository.load().expect("loads").is_none());

        let state = CalculatorState::with_defaults();
        repository.save(&state).expect("saves");
        assert_eq!(repository.load().expect("loads"), Some(state));
    }
}
