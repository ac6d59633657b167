//! `chitledger-store` — collaborator contracts for record lookup, plus an
//! in-memory implementation for tests and the CLI.
//!
//! The ledger engine never fetches anything itself; these traits are the
//! upstream boundary that completes before the engine runs.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryChitStore;
pub use traits::{AuctionStore, MemberDirectory, ReceiptStore, StoreError};
