//! `chitledger-auctions` — group auction entries and settlement math.

pub mod auction;

pub use auction::{AuctionEvent, AuctionSettlement};
