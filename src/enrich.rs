use tracing::{debug, warn};

use crate::chart::ChartOfAccounts;
use crate::importer::parse_date;
use crate::models::{EnrichedTransaction, RawTransaction};

pub struct EnrichResult {
    pub transactions: Vec<EnrichedTransaction>,
    pub dropped: usize,
}

/// Joins each record to its chart entry and derives the signed flow. Input
/// order is preserved; only rows with an unparseable date are dropped.
pub fn enrich_transactions(records: &[RawTransaction], chart: &ChartOfAccounts) -> EnrichResult {
    let mut transactions = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for rec in records {
        let Some(date) = parse_date(&rec.date) else {
            warn!(date = %rec.date, description = %rec.description, "dropping row with unparseable date");
            dropped += 1;
            continue;
        };
        let entry = chart.lookup(rec.account_code.as_deref());
        if chart.is_sentinel(entry) {
            debug!(code = ?rec.account_code, "unclassified account code");
        }
        let amount = rec.amount.abs();
        transactions.push(EnrichedTransaction {
            date,
            description: rec.description.clone(),
            amount,
            movement_kind: rec.movement_kind,
            account_code: rec.account_code.clone(),
            account_name: entry.name.clone(),
            synthetic_code: entry.synthetic_code.clone(),
            synthetic_name: entry.synthetic_name.clone(),
            activity_type: entry.activity_type,
            signed_flow: rec.movement_kind.sign(amount),
        });
    }

    EnrichResult {
        transactions,
        dropped,
    }
}
