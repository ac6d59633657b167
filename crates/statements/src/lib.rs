//! `chitledger-statements` — rendering sinks for engine output and the
//! statement service composing lookups, engine and sink.
//!
//! Numeric formatting (currency symbol, digit grouping) lives here, never in
//! the engine.

pub mod format;
pub mod service;
pub mod sink;

pub use format::format_rupees;
pub use service::{StatementError, StatementService};
pub use sink::{JsonSink, StatementDocument, StatementSink, TextSink};
