//! Submission state machine for the diagnosis form.
//!
//! [`SubmissionController`] owns the form input, the touched flags and the
//! submission state. Every transition takes `&mut self`, so a controller can
//! only ever have one request in flight.
//!
//! Submitting is split into three steps so callers (and tests) can observe the
//! `Submitting` state while the request is outstanding:
//!
//! 1. [`SubmissionController::begin_submit`] validates and moves to
//!    `Submitting`, handing back a [`PendingSubmission`];
//! 2. [`PendingSubmission::deliver`] performs the single outbound call;
//! 3. [`SubmissionController::finish`] records the outcome.
//!
//! [`SubmissionController::submit`] runs all three in one await.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::ports::{DeliveryReceipt, DiagnosisSink, DiagnosisSinkError};
use super::validation::{FieldError, ValidationResult, validate};
use super::{DiagnosisPayload, FormField, FormInput, TouchedState, email_fingerprint};

/// Banner text shown after a failed submission.
pub const FAILURE_NOTICE: &str = "送信に失敗しました。もう一度お試しください。";

/// Why the last submission failed, plus the banner shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    notice: &'static str,
    cause: DiagnosisSinkError,
}

impl SubmissionFailure {
    fn new(cause: DiagnosisSinkError) -> Self {
        Self {
            notice: FAILURE_NOTICE,
            cause,
        }
    }

    /// User-facing banner text.
    #[must_use]
    pub fn notice(&self) -> &str {
        self.notice
    }

    /// Underlying delivery error.
    #[must_use]
    pub fn cause(&self) -> &DiagnosisSinkError {
        &self.cause
    }
}

/// Lifecycle of one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Editing; nothing sent yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Submitting,
    /// The request was handed off; the payload backs the confirmation view.
    Submitted(DiagnosisPayload),
    /// The last request failed; the banner is visible until dismissed.
    Failed(SubmissionFailure),
}

/// Controller misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// A submission is already in flight.
    #[error("a submission is already in flight")]
    InFlight,
    /// The form was already submitted; reset it first.
    #[error("the form was already submitted")]
    AlreadySubmitted,
    /// No submission is in flight.
    #[error("no submission is in flight")]
    NotSubmitting,
}

/// Result of [`SubmissionController::begin_submit`].
#[derive(Debug)]
pub enum SubmitStep {
    /// Validation failed; the state did not change.
    Blocked(ValidationResult),
    /// No endpoint is configured; the form went straight to `Submitted`.
    Completed,
    /// The form is `Submitting`; deliver the request and pass it to
    /// [`SubmissionController::finish`].
    Dispatched(PendingSubmission),
}

/// Result of [`SubmissionController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Blocked(ValidationResult),
    /// The form reached `Submitted`.
    Submitted,
    /// Delivery failed; the form is `Failed`.
    Failed,
}

/// A request that has been dispatched but not yet delivered.
pub struct PendingSubmission {
    sink: Arc<dyn DiagnosisSink>,
    payload: DiagnosisPayload,
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl PendingSubmission {
    /// Trimmed payload that will be sent.
    #[must_use]
    pub fn payload(&self) -> &DiagnosisPayload {
        &self.payload
    }

    /// Send the payload once.
    pub async fn deliver(&self) -> Result<DeliveryReceipt, DiagnosisSinkError> {
        self.sink.deliver(&self.payload).await
    }
}

/// Form state plus the submission lifecycle for one form instance.
///
/// # Examples
/// ```
/// use intake::domain::{FormField, SubmissionController, SubmissionState, SubmitStep};
///
/// let mut form = SubmissionController::new(None);
/// form.set_url("example.com");
/// form.set_email("a@b.co");
/// assert!(matches!(form.begin_submit(), Ok(SubmitStep::Completed)));
/// assert!(matches!(form.state(), SubmissionState::Submitted(_)));
/// ```
pub struct SubmissionController {
    sink: Option<Arc<dyn DiagnosisSink>>,
    input: FormInput,
    touched: TouchedState,
    state: SubmissionState,
}

impl std::fmt::Debug for SubmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionController")
            .field("configured", &self.sink.is_some())
            .field("input", &self.input)
            .field("touched", &self.touched)
            .field("state", &self.state)
            .finish()
    }
}

impl SubmissionController {
    /// Create an idle controller. `None` runs in degraded mode: submissions
    /// complete locally without any network call.
    #[must_use]
    pub fn new(sink: Option<Arc<dyn DiagnosisSink>>) -> Self {
        Self {
            sink,
            input: FormInput::default(),
            touched: TouchedState::default(),
            state: SubmissionState::Idle,
        }
    }

    /// Whether an endpoint is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.sink.is_some()
    }

    /// Current raw input.
    #[must_use]
    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// Current touched flags.
    #[must_use]
    pub fn touched(&self) -> TouchedState {
        self.touched
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Replace the URL text.
    pub fn set_url(&mut self, value: impl Into<String>) {
        self.input.set(FormField::Url, value);
    }

    /// Replace the e-mail text.
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.input.set(FormField::Email, value);
    }

    /// Mark `field` as touched (the blur event).
    pub fn touch(&mut self, field: FormField) {
        self.touched.touch(field);
    }

    /// Validate the current input.
    #[must_use]
    pub fn validation(&self) -> ValidationResult {
        validate(&self.input)
    }

    /// Error to show under `field`, only once it has been touched.
    #[must_use]
    pub fn visible_error(&self, field: FormField) -> Option<FieldError> {
        if self.touched.is_touched(field) {
            self.validation().error(field)
        } else {
            None
        }
    }

    /// Whether the submit control is disabled.
    #[must_use]
    pub fn is_submit_disabled(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting)
            || (self.touched.all_touched() && self.validation().has_errors())
    }

    /// Payload shown on the confirmation view, once submitted.
    #[must_use]
    pub fn confirmation(&self) -> Option<&DiagnosisPayload> {
        match &self.state {
            SubmissionState::Submitted(payload) => Some(payload),
            _ => None,
        }
    }

    /// Banner text while the failure banner is visible.
    #[must_use]
    pub fn failure_notice(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(failure) => Some(failure.notice()),
            _ => None,
        }
    }

    /// Start a submission.
    ///
    /// Marks both fields touched and clears any failure banner, then
    /// validates. Invalid input yields [`SubmitStep::Blocked`] with the
    /// state left at `Idle`.
    ///
    /// # Errors
    /// [`SubmissionError::InFlight`] while `Submitting`;
    /// [`SubmissionError::AlreadySubmitted`] once `Submitted`.
    pub fn begin_submit(&mut self) -> Result<SubmitStep, SubmissionError> {
        match self.state {
            SubmissionState::Submitting => return Err(SubmissionError::InFlight),
            SubmissionState::Submitted(_) => return Err(SubmissionError::AlreadySubmitted),
            SubmissionState::Idle | SubmissionState::Failed(_) => {}
        }

        self.touched = TouchedState::all();
        self.state = SubmissionState::Idle;
        let result = self.validation();
        if result.has_errors() {
            return Ok(SubmitStep::Blocked(result));
        }

        let payload = self.input.payload();
        let Some(sink) = self.sink.clone() else {
            warn!(
                email_hash = %email_fingerprint(payload.email()),
                "diagnosis endpoint not configured; treating submission as sent"
            );
            self.state = SubmissionState::Submitted(payload);
            return Ok(SubmitStep::Completed);
        };

        info!(
            email_hash = %email_fingerprint(payload.email()),
            "dispatching diagnosis request"
        );
        self.state = SubmissionState::Submitting;
        Ok(SubmitStep::Dispatched(PendingSubmission { sink, payload }))
    }

    /// Record the outcome of a dispatched submission.
    ///
    /// # Errors
    /// [`SubmissionError::NotSubmitting`] unless the state is `Submitting`.
    pub fn finish(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<DeliveryReceipt, DiagnosisSinkError>,
    ) -> Result<&SubmissionState, SubmissionError> {
        if !matches!(self.state, SubmissionState::Submitting) {
            return Err(SubmissionError::NotSubmitting);
        }
        self.state = match outcome {
            Ok(receipt) => {
                info!(?receipt, "diagnosis request delivered");
                SubmissionState::Submitted(pending.payload)
            }
            Err(cause) => {
                error!(error = %cause, "diagnosis request failed");
                SubmissionState::Failed(SubmissionFailure::new(cause))
            }
        };
        Ok(&self.state)
    }

    /// Validate, deliver and record the outcome in one step.
    ///
    /// # Errors
    /// As for [`Self::begin_submit`].
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmissionError> {
        let pending = match self.begin_submit()? {
            SubmitStep::Blocked(result) => return Ok(SubmitOutcome::Blocked(result)),
            SubmitStep::Completed => return Ok(SubmitOutcome::Submitted),
            SubmitStep::Dispatched(pending) => pending,
        };
        let outcome = pending.deliver().await;
        match self.finish(pending, outcome)? {
            SubmissionState::Failed(_) => Ok(SubmitOutcome::Failed),
            _ => Ok(SubmitOutcome::Submitted),
        }
    }

    /// Dismiss the failure banner. Only affects the `Failed` state; the
    /// input is kept so the user can retry.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SubmissionState::Failed(_)) {
            self.state = SubmissionState::Idle;
        }
    }

    /// Clear the form and return to `Idle`.
    ///
    /// # Errors
    /// [`SubmissionError::InFlight`] while `Submitting`; in-flight requests
    /// cannot be cancelled.
    pub fn reset(&mut self) -> Result<(), SubmissionError> {
        if matches!(self.state, SubmissionState::Submitting) {
            return Err(SubmissionError::InFlight);
        }
        self.input = FormInput::default();
        self.touched = TouchedState::default();
        self.state = SubmissionState::Idle;
        Ok(())
    }
}
