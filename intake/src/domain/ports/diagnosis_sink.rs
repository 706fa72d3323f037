//! Driven port through which the form controller hands off a submission.
//!
//! The controller only knows that delivery either produced a receipt or
//! failed; whether the receipt was inferred or acknowledged is an adapter
//! concern selected by configuration.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::DiagnosisPayload;

/// Outcome of a delivery that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// Fire-and-forget: the request left without a transport error and the
    /// response was not inspected.
    Assumed,
    /// The endpoint replied with a success envelope.
    Acknowledged {
        /// Message carried by the envelope.
        message: String,
    },
}

define_port_error! {
    /// Failures raised while delivering a submission.
    pub enum DiagnosisSinkError {
        /// The request could not be sent or the connection broke.
        Transport { message: String } =>
            "diagnosis endpoint transport failed: {message}",
        /// The HTTP client gave up waiting.
        Timeout { message: String } =>
            "diagnosis endpoint timed out: {message}",
        /// The endpoint answered but refused the submission.
        Rejected { message: String } =>
            "diagnosis endpoint rejected the submission: {message}",
        /// The acknowledgment could not be decoded.
        Decode { message: String } =>
            "diagnosis endpoint response decode failed: {message}",
    }
}

/// Port for sending one diagnosis request to the intake endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosisSink: Send + Sync {
    /// Deliver `payload` once. Implementations must not retry.
    async fn deliver(&self, payload: &DiagnosisPayload)
    -> Result<DeliveryReceipt, DiagnosisSinkError>;
}

/// Fixture sink that reports every delivery as assumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDiagnosisSink;

#[async_trait]
impl DiagnosisSink for FixtureDiagnosisSink {
    async fn deliver(
        &self,
        _payload: &DiagnosisPayload,
    ) -> Result<DeliveryReceipt, DiagnosisSinkError> {
        Ok(DeliveryReceipt::Assumed)
    }
}
