//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod diagnosis_intake;
mod diagnosis_sink;
mod intake_ledger;
mod intake_notifier;

#[cfg(test)]
pub use diagnosis_intake::MockDiagnosisIntake;
pub use diagnosis_intake::{
    DiagnosisIntake, DiagnosisSubmission, FixtureDiagnosisIntake, IntakeAcknowledgement,
};
#[cfg(test)]
pub use diagnosis_sink::MockDiagnosisSink;
pub use diagnosis_sink::{
    DeliveryReceipt, DiagnosisSink, DiagnosisSinkError, FixtureDiagnosisSink,
};
#[cfg(test)]
pub use intake_ledger::MockIntakeLedger;
pub use intake_ledger::{FixtureIntakeLedger, IntakeLedger, IntakeLedgerError, LedgerAppend};
#[cfg(test)]
pub use intake_notifier::MockIntakeNotifier;
pub use intake_notifier::{IntakeNotifier, IntakeNotifierError, NoOpIntakeNotifier};
