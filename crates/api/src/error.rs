//! API Error Mapping

use access_policy::PolicyError;
use archival::ArchivalError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use origin_policy::OriginError;
use serde::Serialize;
use thiserror::Error;

/// Error surfaced by a handler
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Origin(#[from] OriginError),
    #[error(transparent)]
    Archival(#[from] ArchivalError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Policy(PolicyError::NotFound(_))
            | ApiError::Origin(OriginError::NotFound(_))
            | ApiError::Archival(ArchivalError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Archival(ArchivalError::RuleDisabled(_)) => StatusCode::CONFLICT,
            ApiError::Archival(ArchivalError::Catalog(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            // Validation failures
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_maps_to_404() {
        let response =
            ApiError::Policy(PolicyError::NotFound(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let response = ApiError::Policy(PolicyError::NameRequired).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response =
            ApiError::Origin(OriginError::InvalidPattern("([".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_disabled_rule_maps_to_409() {
        let response =
            ApiError::Archival(ArchivalError::RuleDisabled(Uuid::new_v4())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
