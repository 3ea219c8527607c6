use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courier_optimizer::json::optimize::OptimizeError;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UnprocessableEntity(String),
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(message)
            | ApiError::UnprocessableEntity(message)
            | ApiError::InternalServerError(message) => message,
        }
    }
}

impl From<OptimizeError> for ApiError {
    fn from(error: OptimizeError) -> Self {
        match error {
            OptimizeError::InvalidRequest(message) => ApiError::UnprocessableEntity(message),
            OptimizeError::Upstream(err) => {
                error!("Distance provider failed: {err}");
                ApiError::InternalServerError(String::from("distance provider unavailable"))
            }
            OptimizeError::NoRouteFound => {
                warn!("No feasible assignment found");
                ApiError::BadRequest(String::from("no route found"))
            }
            OptimizeError::Task(err) => {
                error!("Search task failed: {err}");
                ApiError::InternalServerError(String::from("search failed"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use courier_matrix_providers::error::ProviderError;

    use super::*;

    #[test]
    fn test_upstream_failure_is_internal_error() {
        let error = ApiError::from(OptimizeError::Upstream(ProviderError::InvalidResponse(
            "no distances".to_string(),
        )));

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "distance provider unavailable");
    }

    #[test]
    fn test_no_route_is_bad_request() {
        let error = ApiError::from(OptimizeError::NoRouteFound);

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "no route found");
    }

    #[test]
    fn test_invalid_request_keeps_message() {
        let error = ApiError::from(OptimizeError::InvalidRequest("jobs is empty".to_string()));

        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.message(), "jobs is empty");
    }
}
