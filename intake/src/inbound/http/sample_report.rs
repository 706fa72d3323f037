//! Download endpoint for the sample diagnosis report.
//!
//! The PDF is read from the configured report directory through `cap-std`
//! on every request, so replacing the file needs no restart.

use std::io;
use std::path::Path;

use actix_web::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION};
use actix_web::{HttpResponse, get, web};
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// File name of the sample report, also its public path.
pub const SAMPLE_REPORT_FILE: &str = "SEO_Report_sample.pdf";

fn read_sample_report(report_dir: &Path) -> io::Result<Vec<u8>> {
    let dir = Dir::open_ambient_dir(report_dir, ambient_authority())?;
    dir.read(SAMPLE_REPORT_FILE)
}

fn map_read_error(error: io::Error) -> Error {
    if error.kind() == io::ErrorKind::NotFound {
        Error::not_found("sample report is not available")
    } else {
        Error::internal(format!("failed to read sample report: {error}"))
    }
}

/// Serve the sample SEO report.
#[utoipa::path(
    get,
    path = "/SEO_Report_sample.pdf",
    responses(
        (
            status = 200,
            description = "Sample report",
            body = [u8],
            content_type = "application/pdf"
        ),
        (status = 404, description = "No sample report deployed", body = Error)
    ),
    tags = ["assets"],
    operation_id = "sampleReport"
)]
#[get("/SEO_Report_sample.pdf")]
pub async fn sample_report(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let report_dir = state.report_dir.clone();
    let bytes = web::block(move || read_sample_report(&report_dir))
        .await
        .map_err(|error| Error::internal(format!("sample report task failed: {error}")))?
        .map_err(map_read_error)?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            CONTENT_DISPOSITION,
            format!("inline; filename=\"{SAMPLE_REPORT_FILE}\""),
        ))
        .insert_header((CACHE_CONTROL, "public, max-age=3600"))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;
    use std::sync::Arc;

    use crate::domain::ports::FixtureDiagnosisIntake;

    fn state_for(dir: &Path) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(Arc::new(FixtureDiagnosisIntake), dir))
    }

    #[actix_web::test]
    async fn serves_pdf_from_report_dir() {
        let tmp = tempfile::tempdir().expect("temp dir");
        Dir::open_ambient_dir(tmp.path(), ambient_authority())
            .expect("open temp dir")
            .write(SAMPLE_REPORT_FILE, b"%PDF-1.4 sample")
            .expect("write sample");
        let app = actix_test::init_service(
            App::new()
                .app_data(state_for(tmp.path()))
                .service(sample_report),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/SEO_Report_sample.pdf")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("application/pdf")
        );
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), b"%PDF-1.4 sample");
    }

    #[actix_web::test]
    async fn missing_report_is_a_json_404() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let app = actix_test::init_service(
            App::new()
                .app_data(state_for(tmp.path()))
                .service(sample_report),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/SEO_Report_sample.pdf")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "not_found");
    }

    #[test]
    fn missing_directory_maps_to_not_found() {
        let error = read_sample_report(Path::new("/nonexistent/intake-report-dir"))
            .expect_err("directory is absent");
        assert_eq!(
            map_read_error(error).code(),
            crate::domain::ErrorCode::NotFound
        );
    }
}
