//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they only depend on
//! domain ports and stay testable without I/O.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::ports::{DiagnosisIntake, FixtureDiagnosisIntake};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Intake use-case behind `POST /api/v1/diagnosis-requests`.
    pub intake: Arc<dyn DiagnosisIntake>,
    /// Directory holding the downloadable sample report.
    pub report_dir: PathBuf,
}

impl HttpState {
    /// Construct state from the intake port and report directory.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use intake::domain::ports::FixtureDiagnosisIntake;
    /// use intake::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureDiagnosisIntake), "public");
    /// assert_eq!(state.report_dir.to_str(), Some("public"));
    /// ```
    pub fn new(intake: Arc<dyn DiagnosisIntake>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            intake,
            report_dir: report_dir.into(),
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureDiagnosisIntake), "public")
    }
}
