//! `chitledger` — render a member's ledger statement from JSON fixtures.
//!
//! Usage: `chitledger <fixtures.json> <mobile> [--from YYYY-MM-DD]
//! [--to YYYY-MM-DD] [--json]`. Amount fields in the fixture file are paise.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use chitledger_auctions::AuctionEvent;
use chitledger_collections::Receipt;
use chitledger_ledger::LedgerRange;
use chitledger_members::{Member, MobileNumber};
use chitledger_statements::{JsonSink, StatementService, TextSink};
use chitledger_store::InMemoryChitStore;

const USAGE: &str =
    "usage: chitledger <fixtures.json> <mobile> [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--json]";

#[derive(Debug, Deserialize)]
struct Fixtures {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    receipts: Vec<Receipt>,
    #[serde(default)]
    auctions: Vec<AuctionEvent>,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    fixtures: PathBuf,
    mobile: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional: Vec<&String> = Vec::new();
    let mut from = None;
    let mut to = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--from" => {
                let value = iter.next().context("--from requires a date")?;
                from = Some(parse_date(value)?);
            }
            "--to" => {
                let value = iter.next().context("--to requires a date")?;
                to = Some(parse_date(value)?);
            }
            "--json" => json = true,
            other if other.starts_with("--") => bail!("unknown flag '{other}'\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let [fixtures, mobile] = positional.as_slice() else {
        bail!("{USAGE}");
    };
    Ok(Args {
        fixtures: PathBuf::from(fixtures.as_str()),
        mobile: (*mobile).clone(),
        from,
        to,
        json,
    })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

fn main() -> Result<()> {
    chitledger_observability::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw_args)?;

    let raw = std::fs::read_to_string(&args.fixtures)
        .with_context(|| format!("reading {}", args.fixtures.display()))?;
    let fixtures: Fixtures = serde_json::from_str(&raw).context("parsing fixture JSON")?;

    tracing::info!(
        members = fixtures.members.len(),
        receipts = fixtures.receipts.len(),
        auctions = fixtures.auctions.len(),
        "fixtures loaded"
    );

    let store = InMemoryChitStore::new();
    for member in fixtures.members {
        store.add_member(member)?;
    }
    for receipt in fixtures.receipts {
        store.add_receipt(receipt)?;
    }
    for auction in fixtures.auctions {
        store.add_auction(auction)?;
    }

    let mobile = MobileNumber::parse(&args.mobile)?;
    let range = LedgerRange::new(args.from, args.to);
    let service = StatementService::new(&store, &store, &store);

    if args.json {
        let payload = service.statement_for(&mobile, &range, &JsonSink)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let text = service.statement_for(&mobile, &range, &TextSink)?;
        print!("{text}");
    }
    Ok(())
}
