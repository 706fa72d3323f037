//! Adapter selection for the intake use-case.

use std::io;
use std::sync::Arc;

use intake::domain::DiagnosisIntakeService;
use intake::domain::ports::{DiagnosisIntake, NoOpIntakeNotifier};
use intake::inbound::http::state::HttpState;
use intake::outbound::ledger::InMemoryIntakeLedger;
use intake::outbound::notify::SmtpIntakeNotifier;
use mockable::DefaultClock;
use tracing::{info, warn};

use super::ServerConfig;

/// Build the intake service, attaching the SMTP notifier when configured.
///
/// # Errors
/// Returns [`io::Error`] when the SMTP transport cannot be built.
pub(super) fn build_intake_service(
    config: &ServerConfig,
) -> io::Result<Arc<dyn DiagnosisIntake>> {
    let ledger = Arc::new(InMemoryIntakeLedger::new());
    warn!(
        sheet = %config.sheet_name,
        "intake ledger is in-memory; recorded requests are lost on restart"
    );
    let clock = Arc::new(DefaultClock);

    match &config.notifier {
        Some(notifier_config) => {
            info!(host = %notifier_config.host, "staff notifications enabled");
            let notifier = SmtpIntakeNotifier::new(notifier_config.clone())
                .map_err(|e| io::Error::other(format!("configure SMTP notifier: {e}")))?;
            Ok(Arc::new(
                DiagnosisIntakeService::new(ledger, Arc::new(notifier), clock)
                    .with_sheet_name(config.sheet_name.clone()),
            ))
        }
        None => {
            warn!(
                "INTAKE_NOTIFY_RECIPIENT or INTAKE_SMTP_HOST unset; staff notifications disabled"
            );
            Ok(Arc::new(
                DiagnosisIntakeService::new(ledger, Arc::new(NoOpIntakeNotifier), clock)
                    .with_sheet_name(config.sheet_name.clone()),
            ))
        }
    }
}

/// Assemble handler state from the configured intake service.
pub(super) fn build_http_state(
    config: &ServerConfig,
    intake: Arc<dyn DiagnosisIntake>,
) -> HttpState {
    HttpState::new(intake, config.report_dir.clone())
}
