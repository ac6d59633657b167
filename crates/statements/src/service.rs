use chrono::{NaiveDate, Utc};
use thiserror::Error;

use chitledger_ledger::{compute_ledger, LedgerMonth, LedgerRange};
use chitledger_members::{Member, MobileNumber};
use chitledger_store::{AuctionStore, MemberDirectory, ReceiptStore, StoreError};

use crate::sink::StatementSink;

/// Statement-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// No member matches the given mobile number. Propagated to the caller,
    /// never retried.
    #[error("member not found")]
    MemberNotFound,

    /// An upstream store failed before the engine could run.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The invoking boundary: fetches a member's records, runs the ledger
/// engine, and hands the ordered rows to a sink.
///
/// All fetching completes before the engine runs; the computation itself is
/// pure and stateless, so concurrent statements for different members never
/// interact.
pub struct StatementService<'a, D, R, A>
where
    D: MemberDirectory,
    R: ReceiptStore,
    A: AuctionStore,
{
    directory: &'a D,
    receipts: &'a R,
    auctions: &'a A,
}

impl<'a, D, R, A> StatementService<'a, D, R, A>
where
    D: MemberDirectory,
    R: ReceiptStore,
    A: AuctionStore,
{
    pub fn new(directory: &'a D, receipts: &'a R, auctions: &'a A) -> Self {
        Self {
            directory,
            receipts,
            auctions,
        }
    }

    /// Compute the ledger rows for a member as of today.
    pub fn rows_for(
        &self,
        mobile: &MobileNumber,
        range: &LedgerRange,
    ) -> Result<Vec<LedgerMonth>, StatementError> {
        self.rows_as_of(mobile, range, Utc::now().date_naive())
    }

    /// Compute the ledger rows for a member as of an explicit date.
    pub fn rows_as_of(
        &self,
        mobile: &MobileNumber,
        range: &LedgerRange,
        as_of: NaiveDate,
    ) -> Result<Vec<LedgerMonth>, StatementError> {
        self.member_and_rows(mobile, range, as_of).map(|(_, rows)| rows)
    }

    fn member_and_rows(
        &self,
        mobile: &MobileNumber,
        range: &LedgerRange,
        as_of: NaiveDate,
    ) -> Result<(Member, Vec<LedgerMonth>), StatementError> {
        let span = tracing::info_span!("compute_statement", mobile = %mobile);
        let _guard = span.enter();

        let member = self
            .directory
            .find_by_mobile(mobile)?
            .ok_or(StatementError::MemberNotFound)?;

        if !member.has_chargeable_premium() {
            tracing::warn!(
                member = %member.name,
                premium = %member.base_premium,
                "member premium is not chargeable; schedule will carry zero or negative dues"
            );
        }

        let receipts = self.receipts.receipts_for(mobile)?;
        let auctions = self.auctions.auctions_for(&member.group)?;

        let rows = compute_ledger(&member, &receipts, &auctions, range, as_of);
        tracing::info!(
            rows = rows.len(),
            receipts = receipts.len(),
            auctions = auctions.len(),
            "ledger computed"
        );
        Ok((member, rows))
    }

    /// Full statement: compute as of today and render through `sink`.
    pub fn statement_for<S: StatementSink>(
        &self,
        mobile: &MobileNumber,
        range: &LedgerRange,
        sink: &S,
    ) -> Result<S::Output, StatementError> {
        self.statement_as_of(mobile, range, sink, Utc::now().date_naive())
    }

    /// Full statement with an explicit `as_of` date.
    pub fn statement_as_of<S: StatementSink>(
        &self,
        mobile: &MobileNumber,
        range: &LedgerRange,
        sink: &S,
        as_of: NaiveDate,
    ) -> Result<S::Output, StatementError> {
        let (member, rows) = self.member_and_rows(mobile, range, as_of)?;
        sink.render(&member, &rows)
    }
}
