//! Driving port for accepting diagnosis requests on the server side.

use async_trait::async_trait;

use crate::domain::{Error, INTAKE_ACCEPTED_MESSAGE};

/// Raw request body as received from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisSubmission {
    /// Website URL, untrimmed.
    pub url: String,
    /// E-mail address, untrimmed.
    pub email: String,
}

/// Result of a recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeAcknowledgement {
    /// Message returned to the caller.
    pub message: String,
    /// Ledger row the request was written to.
    pub row_number: usize,
}

/// Use-case port for recording a diagnosis request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosisIntake: Send + Sync {
    /// Validate and record `submission`.
    ///
    /// Validation failures surface as [`crate::domain::ErrorCode::InvalidRequest`]
    /// and record nothing.
    async fn receive(&self, submission: DiagnosisSubmission)
    -> Result<IntakeAcknowledgement, Error>;
}

/// Fixture intake that acknowledges everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDiagnosisIntake;

#[async_trait]
impl DiagnosisIntake for FixtureDiagnosisIntake {
    async fn receive(
        &self,
        _submission: DiagnosisSubmission,
    ) -> Result<IntakeAcknowledgement, Error> {
        Ok(IntakeAcknowledgement {
            message: INTAKE_ACCEPTED_MESSAGE.to_owned(),
            row_number: 2,
        })
    }
}
