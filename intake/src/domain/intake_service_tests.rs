//! Tests for the diagnosis intake service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    LedgerAppend, MockIntakeLedger, MockIntakeNotifier, NoOpIntakeNotifier,
};
use crate::test_support::FixtureClock;

fn clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2024, 3, 5, 0, 7, 3)
        .single()
        .expect("valid instant");
    Arc::new(FixtureClock(now))
}

fn submission(url: &str, email: &str) -> DiagnosisSubmission {
    DiagnosisSubmission {
        url: url.to_owned(),
        email: email.to_owned(),
    }
}

fn appended(row_number: usize) -> LedgerAppend {
    LedgerAppend {
        row_number,
        sheet_created: row_number == 2,
    }
}

#[fixture]
fn quiet_notifier() -> MockIntakeNotifier {
    let mut notifier = MockIntakeNotifier::new();
    notifier.expect_notify().returning(|_| Ok(()));
    notifier
}

#[rstest]
#[tokio::test]
async fn valid_request_appends_one_trimmed_row(quiet_notifier: MockIntakeNotifier) {
    let mut ledger = MockIntakeLedger::new();
    ledger
        .expect_append()
        .withf(|sheet, row| {
            sheet == "診断依頼"
                && row
                    == &[
                        "2024/3/5 9:07:03".to_owned(),
                        "example.com".to_owned(),
                        "a@b.co".to_owned(),
                        "未対応".to_owned(),
                    ]
        })
        .times(1)
        .return_once(|_, _| Ok(appended(2)));
    let service = DiagnosisIntakeService::new(Arc::new(ledger), Arc::new(quiet_notifier), clock());

    let ack = service
        .receive(submission(" example.com ", "a@b.co "))
        .await
        .expect("request accepted");
    assert_eq!(ack.message, "登録完了");
    assert_eq!(ack.row_number, 2);
}

#[rstest]
#[case("", "a@b.co", "URLを入力してください")]
#[case("exa mple.com", "a@b.co", "URLの形式が正しくありません")]
#[case("example.com", "", "メールアドレスを入力してください")]
#[case("", "nope", "URLを入力してください")]
#[tokio::test]
async fn invalid_request_records_nothing(
    #[case] url: &str,
    #[case] email: &str,
    #[case] message: &str,
) {
    let mut ledger = MockIntakeLedger::new();
    ledger.expect_append().times(0);
    let mut notifier = MockIntakeNotifier::new();
    notifier.expect_notify().times(0);
    let service = DiagnosisIntakeService::new(Arc::new(ledger), Arc::new(notifier), clock());

    let error = service
        .receive(submission(url, email))
        .await
        .expect_err("request rejected");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), message);
    assert!(error.details().is_some());
}

#[rstest]
#[case(IntakeLedgerError::unavailable("sheet api down"))]
#[case(IntakeLedgerError::write("quota exceeded"))]
#[tokio::test]
async fn ledger_failure_is_service_unavailable(#[case] failure: IntakeLedgerError) {
    let mut ledger = MockIntakeLedger::new();
    ledger
        .expect_append()
        .times(1)
        .return_once(move |_, _| Err(failure));
    let mut notifier = MockIntakeNotifier::new();
    notifier.expect_notify().times(0);
    let service = DiagnosisIntakeService::new(Arc::new(ledger), Arc::new(notifier), clock());

    let error = service
        .receive(submission("example.com", "a@b.co"))
        .await
        .expect_err("ledger failure surfaces");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert!(!error.message().contains("quota"));
}

#[tokio::test]
async fn notifier_failure_still_acknowledges() {
    let mut ledger = MockIntakeLedger::new();
    ledger
        .expect_append()
        .times(1)
        .return_once(|_, _| Ok(appended(5)));
    let mut notifier = MockIntakeNotifier::new();
    notifier
        .expect_notify()
        .times(1)
        .return_once(|_| Err(crate::domain::ports::IntakeNotifierError::delivery("relay down")));
    let service = DiagnosisIntakeService::new(Arc::new(ledger), Arc::new(notifier), clock());

    let ack = service
        .receive(submission("example.com", "a@b.co"))
        .await
        .expect("request accepted");
    assert_eq!(ack.row_number, 5);
}

#[tokio::test]
async fn configured_sheet_name_is_used() {
    let mut ledger = MockIntakeLedger::new();
    ledger
        .expect_append()
        .withf(|sheet, _| sheet == "test-sheet")
        .times(1)
        .return_once(|_, _| Ok(appended(2)));
    let service =
        DiagnosisIntakeService::new(Arc::new(ledger), Arc::new(NoOpIntakeNotifier), clock())
            .with_sheet_name("test-sheet");

    service
        .receive(submission("example.com", "a@b.co"))
        .await
        .expect("request accepted");
}
