use thiserror::Error;

use chitledger_auctions::AuctionEvent;
use chitledger_collections::Receipt;
use chitledger_members::{GroupName, Member, MobileNumber};

/// Failure of an upstream store.
///
/// Surfaced before the ledger engine is invoked; the engine itself never
/// sees these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not serve the request (e.g. lock poisoned,
    /// connection lost).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Member lookup by identifying mobile number.
pub trait MemberDirectory {
    /// `Ok(None)` means no member matches; callers map that to their own
    /// not-found condition.
    fn find_by_mobile(&self, mobile: &MobileNumber) -> Result<Option<Member>, StoreError>;
}

/// Receipt lookup by member mobile number. Order is not guaranteed; the
/// engine sorts and buckets internally.
pub trait ReceiptStore {
    fn receipts_for(&self, mobile: &MobileNumber) -> Result<Vec<Receipt>, StoreError>;
}

/// Auction lookup by group name.
pub trait AuctionStore {
    fn auctions_for(&self, group: &GroupName) -> Result<Vec<AuctionEvent>, StoreError>;
}
