//! SMTP notifier for newly recorded diagnosis requests.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::domain::ReceivedDiagnosis;
use crate::domain::ports::{IntakeNotifier, IntakeNotifierError};

/// Subject line of every notification.
pub const NOTIFICATION_SUBJECT: &str = "【AI集客診断】新規診断依頼";

/// Relay and addressing settings for [`SmtpIntakeNotifier`].
#[derive(Debug, Clone)]
pub struct SmtpNotifierConfig {
    /// STARTTLS relay host.
    pub host: String,
    /// Relay login, when the relay requires authentication.
    pub username: Option<String>,
    /// Relay password, paired with `username`.
    pub password: Option<String>,
    /// `From` address.
    pub sender: String,
    /// Staff address that receives notifications.
    pub recipient: String,
}

/// Notifier that mails staff through an SMTP relay.
pub struct SmtpIntakeNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl std::fmt::Debug for SmtpIntakeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpIntakeNotifier")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl SmtpIntakeNotifier {
    /// Build a notifier; no connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// [`IntakeNotifierError::Compose`] when an address does not parse and
    /// [`IntakeNotifierError::Delivery`] when the relay settings are unusable.
    pub fn new(config: SmtpNotifierConfig) -> Result<Self, IntakeNotifierError> {
        let sender = parse_mailbox("sender", &config.sender)?;
        let recipient = parse_mailbox("recipient", &config.recipient)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|error| {
                IntakeNotifierError::delivery(format!(
                    "invalid SMTP relay {}: {error}",
                    config.host
                ))
            })?;
        if let (Some(username), Some(password)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
            recipient,
        })
    }

    fn compose(&self, received: &ReceivedDiagnosis) -> Result<Message, IntakeNotifierError> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(NOTIFICATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(notification_body(received))
            .map_err(|error| IntakeNotifierError::compose(error.to_string()))
    }
}

fn parse_mailbox(role: &str, raw: &str) -> Result<Mailbox, IntakeNotifierError> {
    raw.trim().parse().map_err(|error| {
        IntakeNotifierError::compose(format!("invalid {role} address: {error}"))
    })
}

fn notification_body(received: &ReceivedDiagnosis) -> String {
    format!(
        "新しい診断依頼を受け付けました。\n\n\
         ■ サイトURL\n{url}\n\n\
         ■ メールアドレス\n{email}\n\n\
         ■ 受付日時\n{received_at}\n\n\
         台帳を確認のうえ対応してください。\n",
        url = received.url(),
        email = received.email(),
        received_at = received.received_at_display(),
    )
}

#[async_trait]
impl IntakeNotifier for SmtpIntakeNotifier {
    async fn notify(&self, received: &ReceivedDiagnosis) -> Result<(), IntakeNotifierError> {
        let message = self.compose(received)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|error| IntakeNotifierError::delivery(error.to_string()))?;
        debug!(code = %response.code(), "diagnosis notification accepted by relay");
        Ok(())
    }
}
