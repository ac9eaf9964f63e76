use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::CalculatorState;

/// Fixed key under which the whole data model is persisted.
pub const STORAGE_KEY: &str = "max-security-calculator-storage";
const STORAGE_VERSION: u32 = 0;

/// Storage abstraction for the single JSON blob holding the data model.
pub trait StateRepository: Send + Sync {
    /// Returns the last persisted state, or `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<CalculatorState>, RepositoryError>;
    fn save(&self, state: &CalculatorState) -> Result<(), RepositoryError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored state is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a CalculatorState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: CalculatorState,
}

/// Encodes the state as the persisted blob `{ "state": ..., "version": 0 }`.
pub fn encode_state(state: &CalculatorState) -> Result<String, RepositoryError> {
    let envelope = EnvelopeRef {
        state,
        version: STORAGE_VERSION,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn decode_state(raw: &str) -> Result<CalculatorState, RepositoryError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    Ok(envelope.state)
}

/// File-backed repository writing `<dir>/max-security-calculator-storage.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<CalculatorState>, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        debug!(path = %self.path.display(), "loaded persisted calculator state");
        decode_state(&raw).map(Some)
    }

    fn save(&self, state: &CalculatorState) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let encoded = encode_state(state)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::domain::{NewAppRequest, NewPlatformType};

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = JsonFileRepository::in_dir(dir.path());
        assert!(repository.load().expect("load succeeds").is_none());
    }

    #[test]
    fn save_then_load_replaces_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = JsonFileRepository::in_dir(dir.path().join("nested"));

        let mut state = CalculatorState::default();
        let platform_type_id = state
            .add_platform_type(NewPlatformType {
                name: "Mobile apps".to_string(),
                description: "Phone and tablet applications".to_string(),
            })
            .expect("platform type added");
        state
            .add_app_request(NewAppRequest {
                name: "Notes".to_string(),
                description: String::new(),
                platform_type_id,
                requestor: "j.doe".to_string(),
            })
            .expect("request added");

        repository.save(&state).expect("save succeeds");
        assert!(repository.path().ends_with("max-security-calculator-storage.json"));

        let loaded = repository
            .load()
            .expect("load succeeds")
            .expect("state present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn persisted_blob_uses_camel_case_keys() {
        let state = CalculatorState::with_defaults();
        let encoded = encode_state(&state).expect("encodes");
        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid json");

        assert_eq!(value["version"], 0);
        assert!(value["state"]["platformTypes"].is_array());
        assert!(value["state"]["appRequests"].is_array());
        assert!(value["state"]["platformTypes"][0]["criteria"][0]["options"].is_array());
    }

    #[test]
    fn corrupt_blob_reports_serialization_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = JsonFileRepository::in_dir(dir.path());
        fs::write(repository.path(), "{ not json").expect("write corrupt file");

        match repository.load() {
            Err(RepositoryError::Serialization(_)) => {}
            other => panic!("expected serialization error, got {other:?}"),
        }
    }
}
