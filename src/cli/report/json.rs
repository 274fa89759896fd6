use serde::Serialize;

use crate::analysis::Analysis;
use crate::indicators::IndicatorSet;
use crate::models::EnrichedTransaction;
use crate::score::ScoreResult;
use crate::statement::CashFlowStatement;

#[derive(Serialize)]
struct TransactionsReport<'a> {
    fingerprint: &'a str,
    dropped: usize,
    out_of_period: usize,
    transactions: &'a [EnrichedTransaction],
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    #[serde(flatten)]
    score: &'a ScoreResult,
    recommendations: Vec<&'static str>,
}

#[derive(Serialize)]
struct FullReport<'a> {
    fingerprint: &'a str,
    dropped: usize,
    out_of_period: usize,
    transactions: &'a [EnrichedTransaction],
    indicators: &'a IndicatorSet,
    score: &'a ScoreResult,
    statement: &'a CashFlowStatement,
    recommendations: Vec<&'static str>,
}

pub fn transactions(analysis: &Analysis, skipped: usize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TransactionsReport {
        fingerprint: &analysis.fingerprint,
        dropped: skipped + analysis.dropped,
        out_of_period: analysis.out_of_period,
        transactions: &analysis.transactions,
    })
}

pub fn indicators(analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&analysis.indicators)
}

pub fn score(analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ScoreReport {
        score: &analysis.score,
        recommendations: analysis.score.recommendations(),
    })
}

pub fn statement(analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&analysis.statement)
}

/// `dropped` counts rows rejected by the importer as well as by enrichment.
pub fn all(analysis: &Analysis, skipped: usize) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FullReport {
        fingerprint: &analysis.fingerprint,
        dropped: skipped + analysis.dropped,
        out_of_period: analysis.out_of_period,
        transactions: &analysis.transactions,
        indicators: &analysis.indicators,
        score: &analysis.score,
        statement: &analysis.statement,
        recommendations: analysis.score.recommendations(),
    })
}
