use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chitledger_core::{DomainError, DomainResult, Money};

/// Identifying mobile number of a member.
///
/// Normalized on parse: surrounding whitespace trimmed, 10-13 digits with an
/// optional leading `+`. The number is the lookup key for members and their
/// receipts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "mobile number must be digits, got '{raw}'"
            )));
        }
        if !(10..=13).contains(&digits.len()) {
            return Err(DomainError::validation(format!(
                "mobile number must be 10-13 digits, got {} digits",
                digits.len()
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a chit group. Non-empty, trimmed; the lookup key for auctions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("group name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for GroupName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chit group member (read-only input to the ledger engine).
///
/// The first obligation month is derived from `enrolled_on`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub group: GroupName,
    pub name: String,
    pub mobile: MobileNumber,
    #[serde(default)]
    pub address: Option<String>,
    /// Base monthly premium, used whenever no auction resolves a month.
    pub base_premium: Money,
    /// Contracted duration of the chit in months.
    pub premium_months: u32,
    #[serde(default)]
    pub reference: Option<String>,
    pub enrolled_on: NaiveDate,
}

impl Member {
    /// Construct a member record, rejecting an empty display name.
    ///
    /// A non-positive `base_premium` is deliberately allowed: the ledger
    /// engine computes through it, and callers flag it upstream via
    /// [`Member::has_chargeable_premium`].
    pub fn new(
        group: GroupName,
        name: impl Into<String>,
        mobile: MobileNumber,
        base_premium: Money,
        premium_months: u32,
        enrolled_on: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("member name cannot be empty"));
        }
        Ok(Self {
            group,
            name,
            mobile,
            address: None,
            base_premium,
            premium_months,
            reference: None,
            enrolled_on,
        })
    }

    /// Display name trimmed for winner matching.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Whether the base premium would actually charge anything.
    pub fn has_chargeable_premium(&self) -> bool {
        self.base_premium.is_positive()
    }
}
