//! `chitledger-collections` — premium collection receipts.

pub mod receipt;

pub use receipt::Receipt;
