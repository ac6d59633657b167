use serde::Serialize;
use serde_json::json;

use chitledger_core::Money;
use chitledger_ledger::LedgerMonth;
use chitledger_members::Member;

use crate::format::format_rupees;
use crate::service::StatementError;

const STATEMENT_TITLE: &str = "LEDGER STATEMENT";

/// A rendering sink consuming ordered engine rows.
///
/// Implementations must preserve row order; layout and numeric formatting
/// are theirs to decide.
pub trait StatementSink {
    type Output;

    fn render(&self, member: &Member, rows: &[LedgerMonth]) -> Result<Self::Output, StatementError>;
}

/// Header, rows and totals of a rendered statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementDocument {
    pub title: String,
    pub member_name: String,
    pub group: String,
    pub mobile: String,
    pub rows: Vec<LedgerMonth>,
    pub total_due: Money,
    pub total_paid: Money,
    pub total_auto_paid: Money,
    /// Running due of the final month; zero for an empty schedule.
    pub closing_balance: Money,
}

impl StatementDocument {
    pub fn build(member: &Member, rows: &[LedgerMonth]) -> Self {
        Self {
            title: STATEMENT_TITLE.to_string(),
            member_name: member.name.clone(),
            group: member.group.to_string(),
            mobile: member.mobile.to_string(),
            rows: rows.to_vec(),
            total_due: rows.iter().map(|r| r.due).sum(),
            total_paid: rows.iter().map(|r| r.paid).sum(),
            total_auto_paid: rows.iter().map(|r| r.auto_paid).sum(),
            closing_balance: rows.last().map(|r| r.running_due).unwrap_or(Money::ZERO),
        }
    }
}

/// Renders the statement as a structured JSON payload.
///
/// Amounts appear twice per row: raw paise for machine consumers and a
/// formatted rupee string for display.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSink;

impl StatementSink for JsonSink {
    type Output = serde_json::Value;

    fn render(&self, member: &Member, rows: &[LedgerMonth]) -> Result<Self::Output, StatementError> {
        let doc = StatementDocument::build(member, rows);
        let rows: Vec<serde_json::Value> = doc
            .rows
            .iter()
            .map(|row| {
                json!({
                    "month": row.month.to_string(),
                    "label": row.month.label(),
                    "due_paise": row.due.as_paise(),
                    "due": format_rupees(row.due),
                    "paid_paise": row.paid.as_paise(),
                    "paid": format_rupees(row.paid),
                    "auto_paid_paise": row.auto_paid.as_paise(),
                    "auto_paid": format_rupees(row.auto_paid),
                    "pending_paise": row.pending().as_paise(),
                    "pending": format_rupees(row.pending()),
                    "running_due_paise": row.running_due.as_paise(),
                    "running_due": format_rupees(row.running_due),
                })
            })
            .collect();

        Ok(json!({
            "title": doc.title,
            "member": {
                "name": doc.member_name,
                "group": doc.group,
                "mobile": doc.mobile,
            },
            "rows": rows,
            "totals": {
                "due": format_rupees(doc.total_due),
                "paid": format_rupees(doc.total_paid),
                "auto_paid": format_rupees(doc.total_auto_paid),
                "closing_balance": format_rupees(doc.closing_balance),
            },
        }))
    }
}

/// Renders the statement as an aligned plain-text table.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSink;

impl StatementSink for TextSink {
    type Output = String;

    fn render(&self, member: &Member, rows: &[LedgerMonth]) -> Result<Self::Output, StatementError> {
        let doc = StatementDocument::build(member, rows);
        let mut out = String::new();

        out.push_str(&format!("{STATEMENT_TITLE}\n"));
        out.push_str(&format!(
            "{} | group {} | mobile {}\n\n",
            doc.member_name, doc.group, doc.mobile
        ));
        out.push_str(&format!(
            "{:<16} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            "Month", "Due", "Paid", "Auto Paid", "Pending", "Running Due"
        ));

        for row in &doc.rows {
            out.push_str(&format!(
                "{:<16} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                row.month.label(),
                format_rupees(row.due),
                format_rupees(row.paid),
                format_rupees(row.auto_paid),
                format_rupees(row.pending()),
                format_rupees(row.running_due),
            ));
        }

        out.push_str(&format!(
            "\nTotals: due {} | paid {} | auto paid {} | closing balance {}\n",
            format_rupees(doc.total_due),
            format_rupees(doc.total_paid),
            format_rupees(doc.total_auto_paid),
            format_rupees(doc.closing_balance),
        ));

        Ok(out)
    }
}
