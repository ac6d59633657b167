//! `chitledger-ledger` — the ledger reconciliation engine.
//!
//! Pure computation: (member, receipts, auctions, optional range) to an
//! ordered sequence of monthly ledger rows with a running outstanding
//! balance. No I/O, no shared state; concurrent invocations never interact.

pub mod engine;
pub mod month;

pub use engine::{compute_ledger, LedgerMonth, LedgerRange};
pub use month::MonthKey;
