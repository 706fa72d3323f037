//! Driven port for the sheet-style ledger that records intake rows.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::LedgerRow;

/// Where an appended row landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerAppend {
    /// One-based row number, counting the header row.
    pub row_number: usize,
    /// Whether the sheet was created (and its header written) by this append.
    pub sheet_created: bool,
}

define_port_error! {
    /// Errors raised by ledger adapters.
    pub enum IntakeLedgerError {
        /// The backing store cannot be reached.
        Unavailable { message: String } => "intake ledger unavailable: {message}",
        /// The store refused or failed the write.
        Write { message: String } => "intake ledger write failed: {message}",
    }
}

/// Port for appending rows to a named sheet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntakeLedger: Send + Sync {
    /// Append `row` to `sheet`.
    ///
    /// A sheet that does not exist yet is created with
    /// [`crate::domain::LEDGER_HEADER`] as its first row before `row` is
    /// appended.
    async fn append(&self, sheet: &str, row: &LedgerRow)
    -> Result<LedgerAppend, IntakeLedgerError>;
}

/// Fixture ledger that accepts every row without storing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIntakeLedger;

#[async_trait]
impl IntakeLedger for FixtureIntakeLedger {
    async fn append(
        &self,
        _sheet: &str,
        _row: &LedgerRow,
    ) -> Result<LedgerAppend, IntakeLedgerError> {
        Ok(LedgerAppend {
            row_number: 2,
            sheet_created: true,
        })
    }
}
