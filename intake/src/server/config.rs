//! HTTP server configuration object and helpers.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use intake::config::IntakeSettings;
use intake::outbound::notify::SmtpNotifierConfig;

/// Resolved settings for creating the intake server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) sheet_name: String,
    pub(crate) report_dir: PathBuf,
    pub(crate) notifier: Option<SmtpNotifierConfig>,
}

impl ServerConfig {
    /// Resolve defaults and validate the loaded settings.
    ///
    /// # Errors
    /// Returns [`io::Error`] when the bind address is malformed.
    pub fn from_settings(settings: &IntakeSettings) -> io::Result<Self> {
        let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
        Ok(Self {
            bind_addr,
            sheet_name: settings.sheet_name().to_owned(),
            report_dir: settings.report_dir(),
            notifier: settings.notifier_config(),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
