//! Intake server settings loaded via OrthoConfig.
//!
//! Every field can be set through `INTAKE_*` environment variables; unset
//! fields fall back to the defaults exposed by the accessors.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_SHEET_NAME;
use crate::outbound::notify::SmtpNotifierConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REPORT_DIR: &str = "public";

/// Configuration for the intake HTTP server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INTAKE")]
pub struct IntakeSettings {
    /// Socket address to listen on.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// Ledger sheet receiving new requests.
    pub sheet_name: Option<String>,
    /// Directory holding `SEO_Report_sample.pdf`.
    pub report_dir: Option<PathBuf>,
    /// Staff address notified about new requests; unset disables e-mail.
    pub notify_recipient: Option<String>,
    /// `From` address for notifications; defaults to the recipient.
    pub notify_sender: Option<String>,
    /// STARTTLS relay used for notifications.
    pub smtp_host: Option<String>,
    /// Relay login.
    pub smtp_username: Option<String>,
    /// Relay password.
    pub smtp_password: Option<String>,
}

impl std::fmt::Debug for IntakeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeSettings")
            .field("bind_addr", &self.bind_addr)
            .field("sheet_name", &self.sheet_name)
            .field("report_dir", &self.report_dir)
            .field("notify_recipient", &self.notify_recipient)
            .field("notify_sender", &self.notify_sender)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A setting that is present but unusable.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {name}='{value}'; expected {expected}")]
pub struct InvalidSetting {
    name: &'static str,
    value: String,
    expected: &'static str,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl IntakeSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSetting`] when `INTAKE_BIND_ADDR` is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, InvalidSetting> {
        let raw = match self.bind_addr.trim() {
            "" => DEFAULT_BIND_ADDR,
            trimmed => trimmed,
        };
        raw.parse().map_err(|_| InvalidSetting {
            name: "INTAKE_BIND_ADDR",
            value: raw.to_owned(),
            expected: "host:port socket address",
        })
    }

    /// Sheet name, defaulting to `診断依頼`.
    #[must_use]
    pub fn sheet_name(&self) -> &str {
        non_blank(self.sheet_name.as_ref()).unwrap_or(DEFAULT_SHEET_NAME)
    }

    /// Report directory, defaulting to `public`.
    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR))
    }

    /// SMTP notifier settings when both a recipient and a relay are set.
    #[must_use]
    pub fn notifier_config(&self) -> Option<SmtpNotifierConfig> {
        let recipient = non_blank(self.notify_recipient.as_ref())?;
        let host = non_blank(self.smtp_host.as_ref())?;
        let sender = non_blank(self.notify_sender.as_ref()).unwrap_or(recipient);
        Some(SmtpNotifierConfig {
            host: host.to_owned(),
            username: non_blank(self.smtp_username.as_ref()).map(str::to_owned),
            password: self.smtp_password.clone(),
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
        })
    }
}
