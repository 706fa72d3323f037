//! Intake ledger adapters.

mod memory;

pub use memory::InMemoryIntakeLedger;
