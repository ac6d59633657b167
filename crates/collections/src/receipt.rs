use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chitledger_core::Money;
use chitledger_members::{GroupName, MobileNumber};

/// Source formats accepted for a receipt's collection date.
///
/// Field agents record dates as day-month-year text; exports occasionally
/// carry slashes or ISO ordering instead.
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// A recorded premium collection.
///
/// A receipt's total contribution is `cash_amount + online_amount`. Multiple
/// receipts may fall in the same calendar month; all contribute to that
/// month's bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub member_name: String,
    pub mobile: MobileNumber,
    pub group: GroupName,
    /// Calendar day of collection, kept in its textual source form.
    /// See [`Receipt::collection_day`] for the parsed value.
    pub collection_date: String,
    pub receipt_no: String,
    pub cash_amount: Money,
    pub online_amount: Money,
    #[serde(default)]
    pub collection_agent: Option<String>,
}

impl Receipt {
    /// Total contribution of this receipt.
    pub fn total(&self) -> Money {
        self.cash_amount.saturating_add(self.online_amount)
    }

    /// Parse the collection date, trying each accepted source format.
    ///
    /// Returns `None` for unparseable input; the ledger engine skips such
    /// receipts rather than aborting the computation.
    pub fn collection_day(&self) -> Option<NaiveDate> {
        let raw = self.collection_date.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }
}
