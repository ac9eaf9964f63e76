use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::calculator::router::error_response;
use crate::calculator::{CalculatorServiceError, ExportError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Calculator(CalculatorServiceError),
    Export(ExportError),
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Calculator(err) => write!(f, "calculator error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Calculator(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Calculator(err) => return error_response(err),
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CalculatorServiceError> for AppError {
    fn from(value: CalculatorServiceError) -> Self {
        Self::Calculator(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{
        CalculatorServiceError, CatalogError, PlatformTypeId, RepositoryError, ScoringError,
    };

    #[test]
    fn calculator_errors_use_the_router_status_codes() {
        let cases = [
            (
                CalculatorServiceError::Catalog(CatalogError::PlatformTypeNotFound(
                    PlatformTypeId::from("missing"),
                )),
                StatusCode::NOT_FOUND,
            ),
            (
                CalculatorServiceError::Catalog(CatalogError::Validation("blank".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CalculatorServiceError::Scoring(ScoringError::PlatformTypeNotFound(
                    PlatformTypeId::from("missing"),
                )),
                StatusCode::NOT_FOUND,
            ),
            (
                CalculatorServiceError::Repository(RepositoryError::Unavailable(
                    "disk full".to_string(),
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn input_errors_are_bad_requests() {
        let response = AppError::Input("unknown criterion".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
