//! Wire types exchanged with the intake endpoint.

use serde::Deserialize;

/// `{success, message}` envelope returned by the intake endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct IntakeEnvelopeDto {
    pub(super) success: bool,
    #[serde(default)]
    pub(super) message: String,
}
