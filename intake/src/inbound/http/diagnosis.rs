//! Diagnosis request API handlers.
//!
//! ```text
//! POST /api/v1/diagnosis-requests {"url":"example.com","email":"a@b.co"}
//! GET  /api/v1/diagnosis-requests
//! ```
//!
//! Both endpoints answer with small JSON envelopes rather than the shared
//! error schema, so the form can read `success` and `message` directly.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::DiagnosisSubmission;
use crate::domain::{Error, TRACE_ID_HEADER};
use crate::inbound::http::error::{redact_if_internal, status_for};
use crate::inbound::http::state::HttpState;

/// Message returned by the status probe.
pub const API_RUNNING_MESSAGE: &str = "AI集客診断 API is running";

const BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Request body for `POST /api/v1/diagnosis-requests`.
///
/// Missing or `null` fields are treated as empty strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DiagnosisRequestBody {
    /// Website URL to diagnose.
    #[serde(default)]
    #[schema(example = "example.com")]
    pub url: Option<String>,
    /// Address the report is sent to.
    #[serde(default)]
    #[schema(example = "a@b.co")]
    pub email: Option<String>,
}

impl From<DiagnosisRequestBody> for DiagnosisSubmission {
    fn from(body: DiagnosisRequestBody) -> Self {
        Self {
            url: body.url.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
        }
    }
}

/// `{success, message}` acknowledgment envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct IntakeEnvelope {
    /// Whether the request was recorded.
    pub success: bool,
    /// Confirmation or failure reason.
    #[schema(example = "登録完了")]
    pub message: String,
    /// Request correlation id, present on failures.
    #[serde(rename = "traceId", default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl IntakeEnvelope {
    /// Envelope for a recorded request.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            trace_id: None,
        }
    }

    /// Envelope for a refused request.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            trace_id: None,
        }
    }

    /// Attach the request's trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Body of the status probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ApiStatus {
    /// Always `ok`.
    pub status: String,
    /// Human-readable banner.
    pub message: String,
}

fn envelope_error(error: &Error) -> HttpResponse {
    let visible = redact_if_internal(error);
    let mut builder = HttpResponse::build(status_for(error.code()));
    let mut envelope = IntakeEnvelope::rejected(visible.message());
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        envelope = envelope.with_trace_id(id);
    }
    builder.json(envelope)
}

/// JSON extractor settings for the intake endpoint.
///
/// The form posts JSON without always declaring it, so any content type is
/// accepted; malformed bodies get a rejection envelope instead of plain text.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT_BYTES)
        .content_type_required(false)
        .error_handler(|err, _req| {
            debug!(error = %err, "diagnosis request body rejected");
            let response = HttpResponse::BadRequest()
                .json(IntakeEnvelope::rejected(format!("invalid request body: {err}")));
            InternalError::from_response(err, response).into()
        })
}

/// Record a diagnosis request.
#[utoipa::path(
    post,
    path = "/api/v1/diagnosis-requests",
    request_body = DiagnosisRequestBody,
    responses(
        (status = 200, description = "Request recorded", body = IntakeEnvelope),
        (status = 400, description = "Validation failed", body = IntakeEnvelope),
        (status = 503, description = "Ledger unavailable", body = IntakeEnvelope),
        (status = 500, description = "Internal server error", body = IntakeEnvelope)
    ),
    tags = ["diagnosis"],
    operation_id = "submitDiagnosisRequest"
)]
#[post("/diagnosis-requests")]
pub async fn submit_diagnosis_request(
    state: web::Data<HttpState>,
    payload: web::Json<DiagnosisRequestBody>,
) -> HttpResponse {
    match state.intake.receive(payload.into_inner().into()).await {
        Ok(ack) => HttpResponse::Ok().json(IntakeEnvelope::accepted(ack.message)),
        Err(error) => envelope_error(&error),
    }
}

/// Report that the intake API is up.
#[utoipa::path(
    get,
    path = "/api/v1/diagnosis-requests",
    responses((status = 200, description = "API is running", body = ApiStatus)),
    tags = ["diagnosis"],
    operation_id = "diagnosisApiStatus"
)]
#[get("/diagnosis-requests")]
pub async fn diagnosis_api_status() -> HttpResponse {
    HttpResponse::Ok().json(ApiStatus {
        status: "ok".to_owned(),
        message: API_RUNNING_MESSAGE.to_owned(),
    })
}

#[cfg(test)]
#[path = "diagnosis_tests.rs"]
mod tests;
