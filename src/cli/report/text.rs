use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::analysis::Analysis;
use crate::fmt::{amount, indicator_value, money};
use crate::indicators::{IndicatorSet, ALL_INDICATORS};
use crate::locale::Locale;
use crate::score::{RiskClass, ScoreResult};
use crate::statement::{CashFlowStatement, RowKind};

/// Locale and currency for one rendering pass.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub locale: Locale,
    pub currency_symbol: String,
}

impl TextStyle {
    fn money(&self, val: f64) -> String {
        money(val, self.locale, &self.currency_symbol)
    }

    fn date_format(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "%d/%m/%Y",
            Locale::En => "%Y-%m-%d",
        }
    }
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Rows the importer or enrichment dropped, and rows outside `--from/--to`.
fn skipped_note(skipped: usize, analysis: &Analysis) -> Option<String> {
    let dropped = skipped + analysis.dropped;
    let mut parts = Vec::new();
    if dropped > 0 {
        parts.push(format!("{dropped} malformed row(s) ignored"));
    }
    if analysis.out_of_period > 0 {
        parts.push(format!("{} row(s) outside the period", analysis.out_of_period));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("Note: {}.", parts.join("; ")).yellow().to_string())
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

pub fn format_transactions(analysis: &Analysis, skipped: usize, style: &TextStyle) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Account", "Category", "Activity", "Amount"]);

    for t in &analysis.transactions {
        let flow = style.money(t.signed_flow);
        let flow = if t.signed_flow < 0.0 {
            flow.red().to_string()
        } else {
            flow.green().to_string()
        };
        table.add_row(vec![
            Cell::new(t.date.format(style.date_format())),
            Cell::new(&t.description),
            Cell::new(format!(
                "{} {}",
                t.account_code.as_deref().unwrap_or("-"),
                t.account_name
            )),
            Cell::new(&t.synthetic_name),
            Cell::new(t.activity_type),
            right(flow),
        ]);
    }

    let mut out = format!("Transactions ({})\n{table}", analysis.transactions.len());
    if let Some(note) = skipped_note(skipped, analysis) {
        out.push('\n');
        out.push_str(&note);
    }
    out
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

pub fn format_indicators(ind: &IndicatorSet, style: &TextStyle) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Indicator", "Key", "Value"]);
    for (i, (key, value)) in ALL_INDICATORS.iter().zip(ind.entries()) {
        table.add_row(vec![
            Cell::new(i.label()),
            Cell::new(key),
            right(indicator_value(*i, value, style.locale, &style.currency_symbol)),
        ]);
    }
    format!("Cash-flow indicators\n{table}")
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

fn class_colored(score: &ScoreResult) -> String {
    let label = score.label.bold();
    match score.class {
        RiskClass::Excellent | RiskClass::Good => label.green().to_string(),
        RiskClass::Moderate => label.yellow().to_string(),
        RiskClass::HighRisk | RiskClass::Critical => label.red().to_string(),
    }
}

pub fn format_score(score: &ScoreResult, style: &TextStyle) -> String {
    let mut out = format!(
        "Financial health score: {:.1} / 100  {}\n{}\n",
        score.score,
        class_colored(score),
        score.class.narrative()
    );

    let mut table = Table::new();
    table.set_header(vec!["Indicator", "Value", "Sub-score", "Weight", "Points"]);
    for c in &score.components {
        let weight = if c.weight > 0.0 {
            format!("{:.0}", c.weight)
        } else {
            "info".dimmed().to_string()
        };
        table.add_row(vec![
            Cell::new(c.indicator.label()),
            right(indicator_value(c.indicator, c.value, style.locale, &style.currency_symbol)),
            right(c.sub_score),
            right(weight),
            right(format!("{:.1}", c.contribution)),
        ]);
    }
    out.push_str(&table.to_string());

    let recommendations = score.recommendations();
    if !recommendations.is_empty() {
        out.push_str(&format!("\n\n{}", "Recommendations".bold()));
        for r in recommendations {
            out.push_str(&format!("\n  - {r}"));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

pub fn format_statement(statement: &CashFlowStatement, style: &TextStyle) -> String {
    let mut table = Table::new();
    let mut header = vec!["Code".to_string(), "Account".to_string()];
    header.extend(statement.columns.iter().map(|c| c.label.clone()));
    table.set_header(header);

    let width = statement.columns.len();
    let blank = || vec![Cell::new(""); width];

    for row in &statement.rows {
        let mut cells = match row.kind {
            RowKind::Header => vec![Cell::new(""), Cell::new(row.label.as_str().bold())],
            RowKind::Item => vec![
                Cell::new(row.code.as_deref().unwrap_or("")),
                Cell::new(format!("  {}", row.label)),
            ],
            RowKind::Total => vec![Cell::new(""), Cell::new(row.label.as_str().bold())],
            RowKind::Separator => vec![Cell::new("──"), Cell::new("──")],
            RowKind::Blank => vec![Cell::new(""), Cell::new("")],
        };
        if row.values.is_empty() {
            cells.extend(blank());
        } else {
            for v in &row.values {
                let text = amount(*v, style.locale);
                let text = match (row.kind, *v < 0.0) {
                    (RowKind::Total, true) => text.red().bold().to_string(),
                    (RowKind::Total, false) => text.bold().to_string(),
                    (_, true) => text.red().to_string(),
                    _ => text,
                };
                cells.push(right(text));
            }
        }
        table.add_row(cells);
    }

    format!("Cash-flow statement ({})\n{table}", style.currency_symbol)
}

// ---------------------------------------------------------------------------
// All
// ---------------------------------------------------------------------------

pub fn format_all(analysis: &Analysis, skipped: usize, style: &TextStyle) -> String {
    [
        format_score(&analysis.score, style),
        format_indicators(&analysis.indicators, style),
        format_statement(&analysis.statement, style),
        format_transactions(analysis, skipped, style),
    ]
    .join("\n\n")
}
