use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use worldgraph_core::WorldGraphError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    WorldGraph(#[from] WorldGraphError),

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::WorldGraph(err) => match err {
                WorldGraphError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                WorldGraphError::NodeNotFound(_) => StatusCode::NOT_FOUND,
                WorldGraphError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::WorldGraph(WorldGraphError::InvalidInput(msg)) => msg.clone(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        let cases = [
            (WorldGraphError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (WorldGraphError::NodeNotFound("x".into()), StatusCode::NOT_FOUND),
            (WorldGraphError::Conflict("x".into()), StatusCode::CONFLICT),
            (WorldGraphError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(
            ApiError::BadRequest("maxDepth".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
