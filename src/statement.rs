use serde::Serialize;

use crate::aggregate::{FlowAggregate, RELEVANT_ACTIVITIES};
use crate::locale::Locale;
use crate::models::{ActivityType, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Header,
    Item,
    Total,
    Separator,
    Blank,
}

/// `values` has one cell per column for item and total rows, and is empty for
/// headers, separators and blanks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub kind: RowKind,
    pub code: Option<String>,
    pub label: String,
    pub values: Vec<f64>,
}

impl StatementRow {
    fn marker(kind: RowKind, label: &str) -> Self {
        Self {
            kind,
            code: None,
            label: label.to_string(),
            values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthColumn {
    pub month: YearMonth,
    pub label: String,
}

/// Direct-method cash-flow statement: months across, accounts down.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CashFlowStatement {
    pub columns: Vec<MonthColumn>,
    pub rows: Vec<StatementRow>,
}

impl CashFlowStatement {
    #[allow(dead_code)]
    pub fn period_total(&self) -> Option<&StatementRow> {
        self.rows.iter().rev().find(|r| r.kind == RowKind::Total)
    }
}

fn push_section(
    rows: &mut Vec<StatementRow>,
    agg: &FlowAggregate,
    activity: ActivityType,
    locale: Locale,
) {
    rows.push(StatementRow::marker(
        RowKind::Header,
        locale.section_title(activity),
    ));

    let mut totals = vec![0.0f64; agg.months.len()];
    for account in agg.accounts_of(activity) {
        let values: Vec<f64> = agg.months.iter().map(|m| account.month(*m)).collect();
        for (total, v) in totals.iter_mut().zip(&values) {
            *total += v;
        }
        rows.push(StatementRow {
            kind: RowKind::Item,
            code: Some(account.code.clone()),
            label: account.name.clone(),
            values,
        });
    }

    rows.push(StatementRow {
        kind: RowKind::Total,
        code: None,
        label: locale.section_total(activity).to_string(),
        values: totals,
    });
    rows.push(StatementRow::marker(RowKind::Blank, ""));
}

pub fn build(agg: &FlowAggregate, locale: Locale) -> CashFlowStatement {
    let columns = agg
        .months
        .iter()
        .map(|m| MonthColumn {
            month: *m,
            label: locale.month_label(*m),
        })
        .collect();

    let mut rows = Vec::new();
    for activity in RELEVANT_ACTIVITIES {
        let has_accounts = agg.accounts_of(*activity).next().is_some();
        if *activity == ActivityType::Operating || has_accounts {
            push_section(&mut rows, agg, *activity, locale);
        }
    }

    rows.push(StatementRow::marker(RowKind::Separator, ""));
    rows.push(StatementRow {
        kind: RowKind::Total,
        code: None,
        label: locale.period_total().to_string(),
        values: agg.months.iter().map(|m| agg.month_total(*m)).collect(),
    });

    CashFlowStatement { columns, rows }
}
