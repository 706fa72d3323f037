//! Reqwest-backed diagnosis sink.
//!
//! This adapter owns transport details only: JSON request encoding, transport
//! error mapping, and, in acknowledged mode, decoding the `{success, message}`
//! envelope. It never retries.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::DeliveryMode;
use super::dto::IntakeEnvelopeDto;
use crate::domain::DiagnosisPayload;
use crate::domain::ports::{DeliveryReceipt, DiagnosisSink, DiagnosisSinkError};

const USER_AGENT: &str = concat!("intake-diagnosis-form/", env!("CARGO_PKG_VERSION"));

/// Diagnosis sink that POSTs `{url, email}` JSON to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpDiagnosisSink {
    client: Client,
    endpoint: Url,
    mode: DeliveryMode,
}

impl HttpDiagnosisSink {
    /// Build a sink for `endpoint`. The client sets no request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, mode: DeliveryMode) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client, endpoint, mode))
    }

    /// Build a sink around an existing client.
    #[must_use]
    pub fn with_client(client: Client, endpoint: Url, mode: DeliveryMode) -> Self {
        Self {
            client,
            endpoint,
            mode,
        }
    }

    /// Endpoint submissions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Configured delivery mode.
    #[must_use]
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }
}

#[async_trait]
impl DiagnosisSink for HttpDiagnosisSink {
    async fn deliver(
        &self,
        payload: &DiagnosisPayload,
    ) -> Result<DeliveryReceipt, DiagnosisSinkError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        match self.mode {
            DeliveryMode::FireAndForget => {
                debug!(endpoint = %self.endpoint, "diagnosis request handed off");
                Ok(DeliveryReceipt::Assumed)
            }
            DeliveryMode::Acknowledged => {
                let status = response.status();
                let body = response.bytes().await.map_err(map_transport_error)?;
                interpret_acknowledgement(status, body.as_ref())
            }
        }
    }
}

fn interpret_acknowledgement(
    status: StatusCode,
    body: &[u8],
) -> Result<DeliveryReceipt, DiagnosisSinkError> {
    match serde_json::from_slice::<IntakeEnvelopeDto>(body) {
        Ok(envelope) if envelope.success => Ok(DeliveryReceipt::Acknowledged {
            message: envelope.message,
        }),
        Ok(envelope) => {
            let message = if envelope.message.is_empty() {
                format!("status {}", status.as_u16())
            } else {
                envelope.message
            };
            Err(DiagnosisSinkError::rejected(message))
        }
        Err(_) if !status.is_success() => Err(map_status_error(status, body)),
        Err(error) => Err(DiagnosisSinkError::decode(format!(
            "invalid acknowledgment JSON: {error}; body: {}",
            body_preview(body)
        ))),
    }
}

fn map_transport_error(error: reqwest::Error) -> DiagnosisSinkError {
    if error.is_timeout() {
        DiagnosisSinkError::timeout(error.to_string())
    } else {
        DiagnosisSinkError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DiagnosisSinkError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            DiagnosisSinkError::timeout(message)
        }
        _ if status.is_client_error() => DiagnosisSinkError::rejected(message),
        _ => DiagnosisSinkError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().nth(PREVIEW_CHAR_LIMIT).is_some() {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    //! Coverage for acknowledgment decoding and status mapping.

    use super::*;
    use rstest::rstest;

    #[test]
    fn success_envelope_is_acknowledged() {
        let receipt = interpret_acknowledgement(
            StatusCode::OK,
            r#"{"success":true,"message":"登録完了"}"#.as_bytes(),
        )
        .expect("acknowledged");
        assert_eq!(
            receipt,
            DeliveryReceipt::Acknowledged {
                message: "登録完了".to_owned()
            }
        );
    }

    #[rstest]
    #[case::ok_status(StatusCode::OK)]
    #[case::bad_request(StatusCode::BAD_REQUEST)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE)]
    fn failure_envelope_is_rejected_with_server_message(#[case] status: StatusCode) {
        let error = interpret_acknowledgement(
            status,
            r#"{"success":false,"message":"URLを入力してください"}"#.as_bytes(),
        )
        .expect_err("rejected");
        assert_eq!(error, DiagnosisSinkError::rejected("URLを入力してください"));
    }

    #[test]
    fn failure_envelope_without_message_reports_status() {
        let error = interpret_acknowledgement(StatusCode::OK, br#"{"success":false}"#)
            .expect_err("rejected");
        assert_eq!(error, DiagnosisSinkError::rejected("status 200"));
    }

    #[test]
    fn undecodable_success_body_is_a_decode_error() {
        let error = interpret_acknowledgement(StatusCode::OK, b"<html>moved</html>")
            .expect_err("decode failure");
        assert!(matches!(error, DiagnosisSinkError::Decode { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::not_found(StatusCode::NOT_FOUND, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn undecodable_error_body_maps_by_status(#[case] status: StatusCode, #[case] expected: &str) {
        let error = interpret_acknowledgement(status, b"upstream exploded")
            .expect_err("status failure");
        let actual = match error {
            DiagnosisSinkError::Timeout { .. } => "Timeout",
            DiagnosisSinkError::Rejected { .. } => "Rejected",
            DiagnosisSinkError::Transport { .. } => "Transport",
            DiagnosisSinkError::Decode { .. } => "Decode",
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn body_preview_compacts_and_truncates() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(body_preview(b"  a \n b  "), "a b");
    }
}
