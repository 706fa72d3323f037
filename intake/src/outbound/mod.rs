//! Outbound adapters implementing domain ports.
//!
//! - **diagnosis_endpoint**: reqwest client posting form submissions
//! - **ledger**: in-process sheet store for intake rows
//! - **notify**: SMTP notifications via lettre
//!
//! Adapters translate between domain types and transport representations and
//! contain no business rules.

pub mod diagnosis_endpoint;
pub mod ledger;
pub mod notify;
