use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ragcore_llm::LlmError;
use ragcore_pipeline::PipelineError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    envelope: ErrorEnvelope,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, code: &str, message: String) -> Self {
        let hint = match code {
            "invalid_request" => {
                Some("Verify the request body is valid JSON with the documented fields.".to_string())
            }
            "upstream_error" => {
                Some("The model backend rejected or failed the call; check RAGCORE_LLM_BASE_URL and the backend logs.".to_string())
            }
            _ => None,
        };
        Self {
            status,
            envelope: ErrorEnvelope {
                code: code.to_string(),
                message,
                hint,
            },
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::EmptyQuery | PipelineError::EmptyDocument => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
            }
            PipelineError::Llm(llm_err) => match llm_err {
                LlmError::InvalidMetadata { .. } => Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "invalid_metadata",
                    err.to_string(),
                ),
                _ => Self::new(StatusCode::BAD_GATEWAY, "upstream_error", err.to_string()),
            },
            PipelineError::Retriever(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "retriever_error",
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
