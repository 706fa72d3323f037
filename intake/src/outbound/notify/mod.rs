//! Staff notification adapters.

mod smtp;

pub use smtp::{SmtpIntakeNotifier, SmtpNotifierConfig};
