//! `chitledger-members` — chit group membership records.

pub mod member;

pub use member::{GroupName, Member, MobileNumber};
