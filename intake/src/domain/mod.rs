//! Domain primitives, ports and services.
//!
//! Purpose: hold the form rules and the submission lifecycle, plus the
//! server-side intake use-case, without any transport or storage detail.
//!
//! Public surface:
//! - `validation`: URL/e-mail normalisation and validation.
//! - `SubmissionController`: per-form submission state machine.
//! - `DiagnosisIntakeService`: records validated requests in a ledger.
//! - `ports`: driven and driving port traits.
//! - `Error`/`ErrorCode`: transport-agnostic error payload.

pub mod error;
pub mod form;
pub mod intake;
pub mod intake_service;
pub mod ports;
pub mod submission;
pub mod trace_id;
pub mod validation;

pub use self::error::{Error, ErrorCode};
pub use self::form::{DiagnosisPayload, FormField, FormInput, TouchedState};
pub use self::intake::{
    DEFAULT_SHEET_NAME, INTAKE_ACCEPTED_MESSAGE, IntakeStatus, LEDGER_HEADER, LedgerRow,
    ReceivedDiagnosis, email_fingerprint,
};
pub use self::intake_service::DiagnosisIntakeService;
pub use self::submission::{
    FAILURE_NOTICE, PendingSubmission, SubmissionController, SubmissionError, SubmissionFailure,
    SubmissionState, SubmitOutcome, SubmitStep,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
