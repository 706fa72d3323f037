//! Diagnosis request form and intake service for the AI集客診断 landing page.
//!
//! The form side ([`domain::SubmissionController`]) validates a website URL
//! and an e-mail address and hands the request to a
//! [`domain::ports::DiagnosisSink`]. The server side
//! ([`domain::DiagnosisIntakeService`]) records requests in a sheet-style
//! ledger and optionally notifies staff.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
