//! Submit one diagnosis request through the form controller.
//!
//! Reads the endpoint from `DIAGNOSIS_ENDPOINT_URL` unless `--endpoint` is
//! given. Without an endpoint the form runs in degraded mode and confirms
//! without sending anything.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use clap::Parser;
use intake::domain::ports::DiagnosisSink;
use intake::domain::{FormField, SubmissionController, SubmissionState, SubmitOutcome};
use intake::outbound::diagnosis_endpoint::{
    DeliveryMode, HttpDiagnosisSink, diagnosis_sink_from_env,
};
use mockable::DefaultEnv;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

/// `submit-diagnosis` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "submit-diagnosis",
    about = "Validate and submit an AI集客診断 request",
    version
)]
struct CliArgs {
    /// Website to diagnose; `https://` is assumed when no scheme is given.
    #[arg(long, value_name = "url")]
    url: String,
    /// Address the report is sent to.
    #[arg(long, value_name = "address")]
    email: String,
    /// Intake endpoint. Falls back to `DIAGNOSIS_ENDPOINT_URL` when omitted.
    #[arg(long, value_name = "url")]
    endpoint: Option<Url>,
    /// Delivery mode used with `--endpoint`.
    #[arg(long, value_name = "fire-and-forget|acknowledged", value_parser = parse_mode)]
    mode: Option<DeliveryMode>,
}

fn parse_mode(raw: &str) -> Result<DeliveryMode, String> {
    raw.parse()
        .map_err(|()| format!("expected fire-and-forget or acknowledged, got '{raw}'"))
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

fn resolve_sink(args: &CliArgs) -> io::Result<Option<Arc<dyn DiagnosisSink>>> {
    match &args.endpoint {
        Some(endpoint) => {
            let sink = HttpDiagnosisSink::new(endpoint.clone(), args.mode.unwrap_or_default())
                .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;
            Ok(Some(Arc::new(sink)))
        }
        None => diagnosis_sink_from_env(&DefaultEnv::new())
            .map_err(|error| io::Error::other(format!("resolve diagnosis endpoint: {error}"))),
    }
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut form = SubmissionController::new(resolve_sink(&args)?);
    form.set_url(args.url);
    form.set_email(args.email);
    form.touch(FormField::Url);
    form.touch(FormField::Email);

    let outcome = form
        .submit()
        .await
        .map_err(|error| io::Error::other(format!("submit: {error}")))?;

    match outcome {
        SubmitOutcome::Blocked(result) => {
            for error in result.errors() {
                println!("{}: {error}", error.field().as_str());
            }
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "diagnosis request is invalid",
            ))
        }
        SubmitOutcome::Failed => {
            if let SubmissionState::Failed(failure) = form.state() {
                println!("{}", failure.notice());
                return Err(io::Error::other(format!("delivery failed: {}", failure.cause())));
            }
            Err(io::Error::other("delivery failed"))
        }
        SubmitOutcome::Submitted => {
            if let Some(payload) = form.confirmation() {
                println!("送信完了");
                println!("URL: {}", payload.url());
                println!("メールアドレス: {}", payload.email());
            }
            if !form.is_configured() {
                println!("(endpoint not configured; nothing was sent)");
            }
            Ok(())
        }
    }
}
