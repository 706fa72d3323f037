//! In-process sheet store for intake rows.
//!
//! Sheets live for the lifetime of the process: every recorded row is lost
//! when the server restarts. Each sheet starts with the ledger header row,
//! mirroring how the production spreadsheet is laid out.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{IntakeLedger, IntakeLedgerError, LedgerAppend};
use crate::domain::{LEDGER_HEADER, LedgerRow};

type Sheets = BTreeMap<String, Vec<Vec<String>>>;

/// Ledger keeping every sheet in memory.
#[derive(Debug, Default)]
pub struct InMemoryIntakeLedger {
    sheets: Mutex<Sheets>,
}

impl InMemoryIntakeLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row in `sheet`, header included.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeLedgerError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, IntakeLedgerError> {
        Ok(self.lock()?.get(sheet).cloned().unwrap_or_default())
    }

    /// Names of all sheets created so far.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeLedgerError::Unavailable`] when the store lock is
    /// poisoned.
    pub fn sheet_names(&self) -> Result<Vec<String>, IntakeLedgerError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sheets>, IntakeLedgerError> {
        self.sheets
            .lock()
            .map_err(|_| IntakeLedgerError::unavailable("ledger lock poisoned"))
    }
}

#[async_trait]
impl IntakeLedger for InMemoryIntakeLedger {
    async fn append(
        &self,
        sheet: &str,
        row: &LedgerRow,
    ) -> Result<LedgerAppend, IntakeLedgerError> {
        if sheet.trim().is_empty() {
            return Err(IntakeLedgerError::write("sheet name must not be blank"));
        }
        let mut sheets = self.lock()?;
        let sheet_created = !sheets.contains_key(sheet);
        let rows = sheets.entry(sheet.to_owned()).or_insert_with(|| {
            vec![LEDGER_HEADER.iter().map(|cell| (*cell).to_owned()).collect()]
        });
        rows.push(row.to_vec());
        Ok(LedgerAppend {
            row_number: rows.len(),
            sheet_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str) -> LedgerRow {
        [
            "2024/3/5 9:07:03".to_owned(),
            url.to_owned(),
            "a@b.co".to_owned(),
            "未対応".to_owned(),
        ]
    }

    #[tokio::test]
    async fn first_append_writes_header_then_row() {
        let ledger = InMemoryIntakeLedger::new();

        let first = ledger.append("診断依頼", &row("a.example")).await.expect("append");
        assert_eq!(
            first,
            LedgerAppend {
                row_number: 2,
                sheet_created: true
            }
        );
        let second = ledger.append("診断依頼", &row("b.example")).await.expect("append");
        assert_eq!(second.row_number, 3);
        assert!(!second.sheet_created);

        let rows = ledger.rows("診断依頼").expect("rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], LEDGER_HEADER.to_vec());
        assert_eq!(rows[2][1], "b.example");
    }

    #[tokio::test]
    async fn rows_do_not_outlive_the_ledger() {
        let ledger = InMemoryIntakeLedger::new();
        ledger.append("診断依頼", &row("a.example")).await.expect("append");
        drop(ledger);

        let restarted = InMemoryIntakeLedger::new();
        assert!(restarted.sheet_names().expect("names").is_empty());
        assert!(restarted.rows("診断依頼").expect("rows").is_empty());
    }

    #[tokio::test]
    async fn sheets_are_independent() {
        let ledger = InMemoryIntakeLedger::new();
        ledger.append("one", &row("a.example")).await.expect("append");
        let other = ledger.append("two", &row("b.example")).await.expect("append");

        assert!(other.sheet_created);
        assert_eq!(ledger.sheet_names().expect("names"), ["one", "two"]);
        assert!(ledger.rows("missing").expect("rows").is_empty());
    }

    #[tokio::test]
    async fn blank_sheet_name_is_refused() {
        let ledger = InMemoryIntakeLedger::new();
        let error = ledger.append("  ", &row("a.example")).await.expect_err("refused");
        assert!(matches!(error, IntakeLedgerError::Write { .. }));
    }
}
