use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::aggregate::aggregate;
use crate::chart::{AccountEntry, ChartDocument, ChartOfAccounts};
use crate::enrich::enrich_transactions;
use crate::error::{CaixaError, Result};
use crate::indicators::{self, IndicatorSet};
use crate::locale::Locale;
use crate::models::{EnrichedTransaction, RawTransaction};
use crate::score::{self, ScoreResult};
use crate::statement::{self, CashFlowStatement};

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Period {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(CaixaError::Other(format!(
                "period start {from} is after period end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub locale: Locale,
    pub period: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub fingerprint: String,
    pub dropped: usize,
    pub out_of_period: usize,
    pub transactions: Vec<EnrichedTransaction>,
    pub indicators: IndicatorSet,
    pub score: ScoreResult,
    pub statement: CashFlowStatement,
}

impl Analysis {
    /// Fallback when the run cannot be computed at all.
    pub fn empty() -> Self {
        Self {
            fingerprint: String::new(),
            dropped: 0,
            out_of_period: 0,
            transactions: Vec::new(),
            indicators: IndicatorSet::zeroed(),
            score: ScoreResult::failed(),
            statement: CashFlowStatement::default(),
        }
    }
}

/// A run that either succeeded or degraded to [`Analysis::empty`] with the
/// single failure that caused it.
#[derive(Debug)]
pub struct Outcome {
    pub analysis: Analysis,
    pub failure: Option<CaixaError>,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    records: &'a [RawTransaction],
    chart: Vec<&'a AccountEntry>,
    locale: Locale,
    period: Option<Period>,
}

/// SHA-256 over the JSON encoding of the records, the resolved chart and the
/// options. Equal fingerprints mean equal output.
pub fn fingerprint(
    records: &[RawTransaction],
    chart: &ChartOfAccounts,
    options: &AnalysisOptions,
) -> Result<String> {
    let input = FingerprintInput {
        records,
        chart: chart.accounts().collect(),
        locale: options.locale,
        period: options.period,
    };
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, &input)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Pure pipeline: enrichment → aggregation → {indicators → score, statement}.
pub fn analyze(
    records: &[RawTransaction],
    chart: &ChartOfAccounts,
    options: &AnalysisOptions,
) -> Analysis {
    let enriched = enrich_transactions(records, chart);
    let (transactions, out_of_period) = match options.period {
        Some(period) => {
            let total = enriched.transactions.len();
            let kept: Vec<EnrichedTransaction> = enriched
                .transactions
                .into_iter()
                .filter(|t| period.contains(t.date))
                .collect();
            let excluded = total - kept.len();
            (kept, excluded)
        }
        None => (enriched.transactions, 0),
    };

    let agg = aggregate(&transactions);
    let indicators = indicators::compute(&agg);
    let score = score::compute(&indicators);
    let statement = statement::build(&agg, options.locale);

    // An empty fingerprint marks the result as not cacheable.
    let fingerprint = fingerprint(records, chart, options).unwrap_or_else(|e| {
        warn!(error = %e, "could not fingerprint input");
        String::new()
    });

    info!(
        records = records.len(),
        dropped = enriched.dropped,
        out_of_period,
        months = agg.months.len(),
        score = score.score,
        class = score.label,
        "analysis complete"
    );

    Analysis {
        fingerprint,
        dropped: enriched.dropped,
        out_of_period,
        transactions,
        indicators,
        score,
        statement,
    }
}

/// Builds the chart from its external document first. A malformed chart is
/// reported once and yields the empty analysis.
pub fn analyze_document(
    records: &[RawTransaction],
    doc: &ChartDocument,
    options: &AnalysisOptions,
) -> Outcome {
    match ChartOfAccounts::from_document(doc) {
        Ok(chart) => Outcome {
            analysis: analyze(records, &chart, options),
            failure: None,
        },
        Err(e) => {
            error!(error = %e, "analysis aborted");
            Outcome {
                analysis: Analysis::empty(),
                failure: Some(e),
            }
        }
    }
}
