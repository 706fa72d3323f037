//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and the `test-support` feature only.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::domain::DiagnosisPayload;
use crate::domain::ports::{DeliveryReceipt, DiagnosisSink, DiagnosisSinkError};

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Sink that records every payload and replays scripted outcomes.
///
/// Once the script is exhausted every delivery succeeds with
/// [`DeliveryReceipt::Assumed`].
#[derive(Debug, Default)]
pub struct RecordingDiagnosisSink {
    delivered: Mutex<Vec<DiagnosisPayload>>,
    script: Mutex<VecDeque<Result<DeliveryReceipt, DiagnosisSinkError>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl RecordingDiagnosisSink {
    /// Sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unscripted delivery.
    pub fn push_outcome(&self, outcome: Result<DeliveryReceipt, DiagnosisSinkError>) {
        lock(&self.script).push_back(outcome);
    }

    /// Payloads delivered so far, in order.
    #[must_use]
    pub fn delivered(&self) -> Vec<DiagnosisPayload> {
        lock(&self.delivered).clone()
    }

    /// Number of deliveries attempted.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.delivered).len()
    }
}

#[async_trait]
impl DiagnosisSink for RecordingDiagnosisSink {
    async fn deliver(
        &self,
        payload: &DiagnosisPayload,
    ) -> Result<DeliveryReceipt, DiagnosisSinkError> {
        lock(&self.delivered).push(payload.clone());
        lock(&self.script)
            .pop_front()
            .unwrap_or(Ok(DeliveryReceipt::Assumed))
    }
}
