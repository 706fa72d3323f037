//! Driven port for staff notifications about new requests.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::ReceivedDiagnosis;

define_port_error! {
    /// Errors raised by notifier adapters.
    pub enum IntakeNotifierError {
        /// The message could not be built.
        Compose { message: String } => "notification compose failed: {message}",
        /// The relay refused or dropped the message.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Port announcing that a diagnosis request was recorded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntakeNotifier: Send + Sync {
    /// Notify staff about `received`.
    async fn notify(&self, received: &ReceivedDiagnosis) -> Result<(), IntakeNotifierError>;
}

/// Notifier used when no recipient is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpIntakeNotifier;

#[async_trait]
impl IntakeNotifier for NoOpIntakeNotifier {
    async fn notify(&self, _received: &ReceivedDiagnosis) -> Result<(), IntakeNotifierError> {
        Ok(())
    }
}
