use std::collections::HashMap;
use std::sync::RwLock;

use chitledger_auctions::AuctionEvent;
use chitledger_collections::Receipt;
use chitledger_core::{AuctionId, ReceiptId};
use chitledger_members::{GroupName, Member, MobileNumber};

use crate::traits::{AuctionStore, MemberDirectory, ReceiptStore, StoreError};

/// In-memory member/receipt/auction store.
///
/// Intended for tests/dev. Records get an identifier on insertion, the way a
/// backing datastore would assign document ids.
#[derive(Debug, Default)]
pub struct InMemoryChitStore {
    members: RwLock<HashMap<MobileNumber, Member>>,
    receipts: RwLock<HashMap<MobileNumber, Vec<(ReceiptId, Receipt)>>>,
    auctions: RwLock<HashMap<GroupName, Vec<(AuctionId, AuctionEvent)>>>,
}

impl InMemoryChitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member record, keyed by mobile number.
    pub fn add_member(&self, member: Member) -> Result<(), StoreError> {
        let mut members = self
            .members
            .write()
            .map_err(|_| StoreError::unavailable("member lock poisoned"))?;
        members.insert(member.mobile.clone(), member);
        Ok(())
    }

    pub fn add_receipt(&self, receipt: Receipt) -> Result<ReceiptId, StoreError> {
        let id = ReceiptId::new();
        let mut receipts = self
            .receipts
            .write()
            .map_err(|_| StoreError::unavailable("receipt lock poisoned"))?;
        receipts
            .entry(receipt.mobile.clone())
            .or_default()
            .push((id, receipt));
        Ok(id)
    }

    pub fn add_auction(&self, auction: AuctionEvent) -> Result<AuctionId, StoreError> {
        let id = AuctionId::new();
        let mut auctions = self
            .auctions
            .write()
            .map_err(|_| StoreError::unavailable("auction lock poisoned"))?;
        auctions
            .entry(auction.group.clone())
            .or_default()
            .push((id, auction));
        Ok(id)
    }
}

impl MemberDirectory for InMemoryChitStore {
    fn find_by_mobile(&self, mobile: &MobileNumber) -> Result<Option<Member>, StoreError> {
        let members = self
            .members
            .read()
            .map_err(|_| StoreError::unavailable("member lock poisoned"))?;
        Ok(members.get(mobile).cloned())
    }
}

impl ReceiptStore for InMemoryChitStore {
    fn receipts_for(&self, mobile: &MobileNumber) -> Result<Vec<Receipt>, StoreError> {
        let receipts = self
            .receipts
            .read()
            .map_err(|_| StoreError::unavailable("receipt lock poisoned"))?;
        Ok(receipts
            .get(mobile)
            .map(|rows| rows.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }
}

impl AuctionStore for InMemoryChitStore {
    fn auctions_for(&self, group: &GroupName) -> Result<Vec<AuctionEvent>, StoreError> {
        let auctions = self
            .auctions
            .read()
            .map_err(|_| StoreError::unavailable("auction lock poisoned"))?;
        Ok(auctions
            .get(group)
            .map(|rows| rows.iter().map(|(_, a)| a.clone()).collect())
            .unwrap_or_default())
    }
}
