//! Server-side records for received diagnosis requests.
//!
//! A request that passed validation becomes a [`ReceivedDiagnosis`], which is
//! flattened into one ledger row of display strings.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::DiagnosisPayload;

/// Sheet that receives new requests unless configured otherwise.
pub const DEFAULT_SHEET_NAME: &str = "診断依頼";

/// Header row written when a sheet is first used.
pub const LEDGER_HEADER: [&str; 4] = ["受付日時", "サイトURL", "メールアドレス", "ステータス"];

/// Acknowledgment message for an accepted request.
pub const INTAKE_ACCEPTED_MESSAGE: &str = "登録完了";

const JST_OFFSET_SECONDS: i32 = 9 * 3600;
const RECEIVED_AT_FORMAT: &str = "%Y/%-m/%-d %-H:%M:%S";

/// Processing status of a received request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeStatus {
    /// Waiting for manual review.
    #[default]
    Pending,
}

impl IntakeStatus {
    /// Label stored in the ledger status column.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "未対応",
        }
    }
}

/// One ledger row, in header order.
pub type LedgerRow = [String; 4];

/// A validated diagnosis request as recorded by the intake service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedDiagnosis {
    received_at: DateTime<Utc>,
    payload: DiagnosisPayload,
    status: IntakeStatus,
}

impl ReceivedDiagnosis {
    /// Record `payload` as received at `received_at`, pending review.
    #[must_use]
    pub fn new(received_at: DateTime<Utc>, payload: DiagnosisPayload) -> Self {
        Self {
            received_at,
            payload,
            status: IntakeStatus::Pending,
        }
    }

    /// Receipt instant.
    #[must_use]
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Submitted website URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.payload.url()
    }

    /// Submitted e-mail address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.payload.email()
    }

    /// Review status.
    #[must_use]
    pub fn status(&self) -> IntakeStatus {
        self.status
    }

    /// Receipt time rendered in Japan time, e.g. `2024/3/5 9:07:03`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use intake::domain::{DiagnosisPayload, ReceivedDiagnosis};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 3, 5, 0, 7, 3).single().expect("valid instant");
    /// let received = ReceivedDiagnosis::new(at, DiagnosisPayload::new("example.com", "a@b.co"));
    /// assert_eq!(received.received_at_display(), "2024/3/5 9:07:03");
    /// ```
    #[must_use]
    pub fn received_at_display(&self) -> String {
        match FixedOffset::east_opt(JST_OFFSET_SECONDS) {
            Some(jst) => self
                .received_at
                .with_timezone(&jst)
                .format(RECEIVED_AT_FORMAT)
                .to_string(),
            None => self.received_at.format(RECEIVED_AT_FORMAT).to_string(),
        }
    }

    /// Flatten into a ledger row matching [`LEDGER_HEADER`].
    #[must_use]
    pub fn to_row(&self) -> LedgerRow {
        [
            self.received_at_display(),
            self.url().to_owned(),
            self.email().to_owned(),
            self.status.label().to_owned(),
        ]
    }
}

/// Short SHA-256 fingerprint of an e-mail address for log fields.
///
/// Addresses are lower-cased before hashing so the same mailbox always maps to
/// the same fingerprint.
#[must_use]
pub fn email_fingerprint(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("valid instant")
    }

    #[rstest]
    #[case(at(2024, 3, 5, 0, 7, 3), "2024/3/5 9:07:03")]
    #[case(at(2024, 12, 31, 15, 0, 0), "2025/1/1 0:00:00")]
    #[case(at(2024, 11, 20, 4, 30, 59), "2024/11/20 13:30:59")]
    fn received_at_renders_in_japan_time(#[case] instant: DateTime<Utc>, #[case] expected: &str) {
        let received = ReceivedDiagnosis::new(instant, DiagnosisPayload::new("x.jp", "a@b.co"));
        assert_eq!(received.received_at_display(), expected);
    }

    #[test]
    fn row_follows_header_order() {
        let received = ReceivedDiagnosis::new(
            at(2024, 3, 5, 0, 7, 3),
            DiagnosisPayload::new(" example.com ", "a@b.co"),
        );
        assert_eq!(
            received.to_row(),
            [
                "2024/3/5 9:07:03".to_owned(),
                "example.com".to_owned(),
                "a@b.co".to_owned(),
                "未対応".to_owned(),
            ]
        );
    }

    #[test]
    fn fingerprint_ignores_case_and_hides_address() {
        let fingerprint = email_fingerprint("A@B.co");
        assert_eq!(fingerprint, email_fingerprint("a@b.co "));
        assert_eq!(fingerprint.len(), 12);
        assert!(!fingerprint.contains('@'));
    }
}
