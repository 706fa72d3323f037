//! HTTP inbound adapter exposing the intake endpoints.

pub mod diagnosis;
pub mod error;
pub mod health;
pub mod sample_report;
pub mod state;
pub mod trace;

use actix_web::web;

pub use error::ApiResult;

/// Register every intake route.
///
/// Callers provide `web::Data<state::HttpState>` and
/// `web::Data<health::HealthState>` as app data.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use intake::inbound::http::{configure, health::HealthState, state::HttpState};
///
/// let _app = App::new()
///     .app_data(web::Data::new(HttpState::default()))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(diagnosis::json_config())
            .service(diagnosis::submit_diagnosis_request)
            .service(diagnosis::diagnosis_api_status),
    )
    .service(sample_report::sample_report)
    .service(health::ready)
    .service(health::live);
}
