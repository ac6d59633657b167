use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use chitledger_core::{DomainError, DomainResult, Money};
use chitledger_members::GroupName;

/// Derived settlement figures for one group auction.
///
/// The winner forgoes `auction_amount` of the pot as a discount; the company
/// takes its commission out of that discount and the rest is returned to the
/// group as a bonus, lowering every member's premium for the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSettlement {
    pub company_commission: Money,
    pub bonus_amount: Money,
    pub bonus_per_person: Money,
    pub per_person_final: Money,
    pub final_amount_to_collect: Money,
    pub winning_amount: Money,
}

impl AuctionSettlement {
    /// Derive settlement figures from the auction terms.
    ///
    /// `premium_amount` is the per-person base premium, `auction_amount` the
    /// discount the winner accepted, `commission_percent` the company's cut
    /// of that discount.
    pub fn compute(
        premium_amount: Money,
        auction_amount: Money,
        commission_percent: u8,
        total_group_members: u32,
    ) -> DomainResult<Self> {
        if total_group_members == 0 {
            return Err(DomainError::validation(
                "auction requires at least one group member",
            ));
        }
        if commission_percent > 100 {
            return Err(DomainError::validation(
                "commission percent cannot exceed 100",
            ));
        }
        if auction_amount.is_negative() {
            return Err(DomainError::validation("auction amount cannot be negative"));
        }

        let pot = premium_amount.times(total_group_members);
        let company_commission = auction_amount.percent(commission_percent);
        let bonus_amount = auction_amount.saturating_sub(company_commission);
        let bonus_per_person = bonus_amount.split_among(total_group_members);
        let per_person_final = premium_amount
            .saturating_sub(bonus_per_person)
            .clamp_non_negative();

        Ok(Self {
            company_commission,
            bonus_amount,
            bonus_per_person,
            per_person_final,
            final_amount_to_collect: per_person_final.times(total_group_members),
            winning_amount: pot.saturating_sub(auction_amount),
        })
    }
}

/// One group auction entry.
///
/// At most one entry is expected per group per calendar month; when
/// duplicates exist the engine lets the latest-dated entry win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionEvent {
    pub group: GroupName,
    /// Display name of the winning member.
    pub winner_name: String,
    /// Per-person base premium at the time of the auction.
    pub premium_amount: Money,
    /// Discount the winner forgoes from the pot.
    pub auction_amount: Money,
    pub commission_percent: u8,
    pub company_commission: Money,
    pub bonus_amount: Money,
    pub bonus_per_person: Money,
    pub final_amount_to_collect: Money,
    /// Resolved per-person premium for the auction's month. `None` falls
    /// back to the member's base premium during ledger resolution.
    #[serde(default)]
    pub per_person_final: Option<Money>,
    pub winning_amount: Money,
    pub total_group_members: u32,
    pub auction_date: NaiveDate,
}

impl AuctionEvent {
    /// Build an entry for `auction_date`, filling the derived fields from
    /// [`AuctionSettlement::compute`].
    pub fn settle(
        group: GroupName,
        winner_name: impl Into<String>,
        premium_amount: Money,
        auction_amount: Money,
        commission_percent: u8,
        total_group_members: u32,
        auction_date: NaiveDate,
    ) -> DomainResult<Self> {
        let s = AuctionSettlement::compute(
            premium_amount,
            auction_amount,
            commission_percent,
            total_group_members,
        )?;
        Ok(Self {
            group,
            winner_name: winner_name.into(),
            premium_amount,
            auction_amount,
            commission_percent,
            company_commission: s.company_commission,
            bonus_amount: s.bonus_amount,
            bonus_per_person: s.bonus_per_person,
            final_amount_to_collect: s.final_amount_to_collect,
            per_person_final: Some(s.per_person_final),
            winning_amount: s.winning_amount,
            total_group_members,
            auction_date,
        })
    }

    /// `(year, month)` this auction resolves; day-of-month is irrelevant.
    pub fn year_month(&self) -> (i32, u32) {
        (self.auction_date.year(), self.auction_date.month())
    }

    /// Winner name trimmed for exact matching against member display names.
    pub fn trimmed_winner(&self) -> &str {
        self.winner_name.trim()
    }
}
