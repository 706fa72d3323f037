//! Intake use-case: validate a diagnosis request, record it, notify staff.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    DiagnosisIntake, DiagnosisSubmission, IntakeAcknowledgement, IntakeLedger, IntakeLedgerError,
    IntakeNotifier,
};
use crate::domain::validation::validate;
use crate::domain::{
    DEFAULT_SHEET_NAME, DiagnosisPayload, Error, FormInput, INTAKE_ACCEPTED_MESSAGE,
    ReceivedDiagnosis, email_fingerprint,
};

const LEDGER_UNAVAILABLE_MESSAGE: &str =
    "現在受付を停止しています。しばらくしてから再度お試しください。";

/// Diagnosis intake service backed by a ledger and a notifier.
#[derive(Clone)]
pub struct DiagnosisIntakeService<L, N> {
    ledger: Arc<L>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    sheet_name: String,
}

impl<L, N> DiagnosisIntakeService<L, N> {
    /// Create a service writing to the default sheet.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use intake::domain::DiagnosisIntakeService;
    /// # use intake::domain::ports::{FixtureIntakeLedger, NoOpIntakeNotifier};
    /// # use mockable::DefaultClock;
    /// let service = DiagnosisIntakeService::new(
    ///     Arc::new(FixtureIntakeLedger),
    ///     Arc::new(NoOpIntakeNotifier),
    ///     Arc::new(DefaultClock),
    /// );
    /// assert_eq!(service.sheet_name(), "診断依頼");
    /// ```
    pub fn new(ledger: Arc<L>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger,
            notifier,
            clock,
            sheet_name: DEFAULT_SHEET_NAME.to_owned(),
        }
    }

    /// Write rows to `sheet_name` instead of the default sheet.
    #[must_use]
    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    /// Sheet that receives new rows.
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }
}

impl<L, N> DiagnosisIntakeService<L, N>
where
    L: IntakeLedger,
    N: IntakeNotifier,
{
    fn map_ledger_error(error: IntakeLedgerError) -> Error {
        let reason = match &error {
            IntakeLedgerError::Unavailable { .. } => "unavailable",
            IntakeLedgerError::Write { .. } => "write_failed",
        };
        warn!(error = %error, reason, "intake ledger append failed");
        Error::service_unavailable(LEDGER_UNAVAILABLE_MESSAGE)
            .with_details(json!({ "code": "ledger_unavailable", "reason": reason }))
    }

    fn validated_payload(submission: &DiagnosisSubmission) -> Result<DiagnosisPayload, Error> {
        let input = FormInput::new(submission.url.as_str(), submission.email.as_str());
        let result = validate(&input);
        match result.errors().next() {
            Some(first) => {
                let fields: Vec<_> = result
                    .errors()
                    .map(|error| json!({ "field": error.field().as_str(), "code": error.code() }))
                    .collect();
                Err(Error::invalid_request(first.to_string())
                    .with_details(json!({ "fields": fields })))
            }
            None => Ok(input.payload()),
        }
    }
}

#[async_trait]
impl<L, N> DiagnosisIntake for DiagnosisIntakeService<L, N>
where
    L: IntakeLedger,
    N: IntakeNotifier,
{
    async fn receive(
        &self,
        submission: DiagnosisSubmission,
    ) -> Result<IntakeAcknowledgement, Error> {
        let payload = Self::validated_payload(&submission)?;
        let received = ReceivedDiagnosis::new(self.clock.utc(), payload);
        let email_hash = email_fingerprint(received.email());

        let appended = self
            .ledger
            .append(&self.sheet_name, &received.to_row())
            .await
            .map_err(Self::map_ledger_error)?;
        info!(
            sheet = %self.sheet_name,
            row = appended.row_number,
            sheet_created = appended.sheet_created,
            %email_hash,
            "diagnosis request recorded"
        );

        if let Err(error) = self.notifier.notify(&received).await {
            warn!(error = %error, %email_hash, "diagnosis notification failed");
        }

        Ok(IntakeAcknowledgement {
            message: INTAKE_ACCEPTED_MESSAGE.to_owned(),
            row_number: appended.row_number,
        })
    }
}

#[cfg(test)]
#[path = "intake_service_tests.rs"]
mod tests;
