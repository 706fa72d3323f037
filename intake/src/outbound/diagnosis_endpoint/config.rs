//! Environment-driven settings for the diagnosis endpoint.
//!
//! A missing or blank endpoint URL is not an error: the form then runs in
//! degraded mode and completes submissions locally.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use mockable::Env;
use tracing::warn;
use url::Url;

use super::HttpDiagnosisSink;
use crate::domain::ports::DiagnosisSink;

/// Endpoint that receives `{url, email}` submissions.
pub const ENDPOINT_URL_ENV: &str = "DIAGNOSIS_ENDPOINT_URL";
/// How delivery success is judged.
pub const DELIVERY_MODE_ENV: &str = "DIAGNOSIS_DELIVERY_MODE";

const URL_EXPECTED: &str = "absolute http(s) URL";
const MODE_EXPECTED: &str = "fire-and-forget|acknowledged";

/// How the sink decides that a delivery succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Success unless the transport fails; the response is never read.
    #[default]
    FireAndForget,
    /// Success only when the endpoint returns `{"success": true}`.
    Acknowledged,
}

impl DeliveryMode {
    /// Configuration spelling of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FireAndForget => "fire-and-forget",
            Self::Acknowledged => "acknowledged",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fire-and-forget" => Ok(Self::FireAndForget),
            "acknowledged" => Ok(Self::Acknowledged),
            _ => Err(()),
        }
    }
}

/// Resolved endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Where submissions are posted.
    pub endpoint: Url,
    /// How delivery success is judged.
    pub mode: DeliveryMode,
}

/// Errors raised while reading endpoint settings.
#[derive(Debug, thiserror::Error)]
pub enum EndpointConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The HTTP client could not be built.
    #[error("failed to build diagnosis endpoint client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Read endpoint settings; `Ok(None)` means degraded mode.
///
/// # Examples
///
/// ```rust
/// use intake::outbound::diagnosis_endpoint::{endpoint_config_from_env, DeliveryMode};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "DIAGNOSIS_ENDPOINT_URL" => Some("https://intake.example/api".to_owned()),
///     _ => None,
/// });
///
/// let config = endpoint_config_from_env(&env)?.expect("endpoint configured");
/// assert_eq!(config.mode, DeliveryMode::FireAndForget);
/// # Ok::<(), intake::outbound::diagnosis_endpoint::EndpointConfigError>(())
/// ```
///
/// # Errors
///
/// [`EndpointConfigError::InvalidEnv`] when the URL does not parse as an
/// absolute `http`/`https` URL or the mode is unknown.
pub fn endpoint_config_from_env<E: Env>(
    env: &E,
) -> Result<Option<EndpointConfig>, EndpointConfigError> {
    let mode = delivery_mode_from_env(env)?;
    let Some(raw) = env
        .string(ENDPOINT_URL_ENV)
        .filter(|value| !value.trim().is_empty())
    else {
        return Ok(None);
    };

    let invalid = || EndpointConfigError::InvalidEnv {
        name: ENDPOINT_URL_ENV,
        value: raw.clone(),
        expected: URL_EXPECTED,
    };
    let endpoint = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(Some(EndpointConfig { endpoint, mode }))
}

fn delivery_mode_from_env<E: Env>(env: &E) -> Result<DeliveryMode, EndpointConfigError> {
    match env.string(DELIVERY_MODE_ENV) {
        None => Ok(DeliveryMode::default()),
        Some(value) if value.trim().is_empty() => Ok(DeliveryMode::default()),
        Some(value) => value.parse().map_err(|()| EndpointConfigError::InvalidEnv {
            name: DELIVERY_MODE_ENV,
            value,
            expected: MODE_EXPECTED,
        }),
    }
}

/// Build the sink the form controller should use.
///
/// Returns `Ok(None)`, after logging a warning, when no endpoint is
/// configured.
///
/// # Errors
///
/// Propagates [`endpoint_config_from_env`] errors and client build failures.
pub fn diagnosis_sink_from_env<E: Env>(
    env: &E,
) -> Result<Option<Arc<dyn DiagnosisSink>>, EndpointConfigError> {
    match endpoint_config_from_env(env)? {
        Some(config) => {
            let sink = HttpDiagnosisSink::new(config.endpoint, config.mode)?;
            Ok(Some(Arc::new(sink)))
        }
        None => {
            warn!(
                env = ENDPOINT_URL_ENV,
                "diagnosis endpoint not configured; submissions will not be sent"
            );
            Ok(None)
        }
    }
}
