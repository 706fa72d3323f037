//! OpenAPI documentation for the intake HTTP surface.
//!
//! Served through Swagger UI in debug builds only.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::diagnosis::{ApiStatus, DiagnosisRequestBody, IntakeEnvelope};

/// OpenAPI document for the intake API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI集客診断 intake API",
        description = "Receives landing-form diagnosis requests and serves the sample report."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::diagnosis::submit_diagnosis_request,
        crate::inbound::http::diagnosis::diagnosis_api_status,
        crate::inbound::http::sample_report::sample_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(DiagnosisRequestBody, IntakeEnvelope, ApiStatus, Error, ErrorCode)),
    tags(
        (name = "diagnosis", description = "Diagnosis request intake"),
        (name = "assets", description = "Static downloads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
