use std::collections::{BTreeMap, BTreeSet};

use crate::chart::PERSONAL_WITHDRAWAL_CODE;
use crate::models::{ActivityType, EnrichedTransaction, YearMonth};

/// Monthly signed flow of one analytic account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFlow {
    pub code: String,
    pub name: String,
    pub activity_type: ActivityType,
    pub monthly: BTreeMap<YearMonth, f64>,
}

impl AccountFlow {
    pub fn month(&self, month: YearMonth) -> f64 {
        self.monthly.get(&month).copied().unwrap_or(0.0)
    }
}

/// Everything downstream consumers need from one pass over the enriched set.
/// Activity-level and account-level sums cover activity-relevant rows only;
/// `total_debits` and `personal_withdrawals` cover every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowAggregate {
    /// Months with activity-relevant rows, ascending.
    pub months: Vec<YearMonth>,
    pub by_activity: BTreeMap<(YearMonth, ActivityType), f64>,
    /// Keyed and therefore ordered by account code.
    pub by_account: BTreeMap<String, AccountFlow>,
    pub operating_credits: BTreeMap<YearMonth, f64>,
    pub operating_inflows: f64,
    pub total_debits: f64,
    pub personal_withdrawals: f64,
    pub relevant_count: usize,
}

impl FlowAggregate {
    pub fn activity_month(&self, month: YearMonth, activity: ActivityType) -> f64 {
        self.by_activity
            .get(&(month, activity))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn activity_total(&self, activity: ActivityType) -> f64 {
        self.months
            .iter()
            .map(|m| self.activity_month(*m, activity))
            .sum()
    }

    /// Cash generated in one month across operating, investing and financing.
    pub fn month_total(&self, month: YearMonth) -> f64 {
        RELEVANT_ACTIVITIES
            .iter()
            .map(|a| self.activity_month(month, *a))
            .sum()
    }

    pub fn operating_credits_in(&self, month: YearMonth) -> f64 {
        self.operating_credits.get(&month).copied().unwrap_or(0.0)
    }

    pub fn accounts_of(&self, activity: ActivityType) -> impl Iterator<Item = &AccountFlow> {
        self.by_account
            .values()
            .filter(move |a| a.activity_type == activity)
    }
}

pub const RELEVANT_ACTIVITIES: &[ActivityType] = &[
    ActivityType::Operating,
    ActivityType::Investing,
    ActivityType::Financing,
];

pub fn relevant(transactions: &[EnrichedTransaction]) -> impl Iterator<Item = &EnrichedTransaction> {
    transactions.iter().filter(|t| t.activity_type.is_relevant())
}

fn is_personal_withdrawal(t: &EnrichedTransaction) -> bool {
    t.is_debit() && t.account_code.as_deref() == Some(PERSONAL_WITHDRAWAL_CODE)
}

pub fn aggregate(transactions: &[EnrichedTransaction]) -> FlowAggregate {
    let mut agg = FlowAggregate::default();
    let mut months = BTreeSet::new();

    for t in transactions {
        if t.is_debit() {
            agg.total_debits += t.amount;
        }
        if is_personal_withdrawal(t) {
            agg.personal_withdrawals += t.amount;
        }
    }

    for t in relevant(transactions) {
        let month = t.month();
        months.insert(month);
        agg.relevant_count += 1;

        *agg.by_activity.entry((month, t.activity_type)).or_insert(0.0) += t.signed_flow;

        let code = t.account_code.clone().unwrap_or_default();
        let flow = agg
            .by_account
            .entry(code.clone())
            .or_insert_with(|| AccountFlow {
                code,
                name: t.account_name.clone(),
                activity_type: t.activity_type,
                monthly: BTreeMap::new(),
            });
        *flow.monthly.entry(month).or_insert(0.0) += t.signed_flow;

        if t.activity_type == ActivityType::Operating && t.is_credit() {
            agg.operating_inflows += t.amount;
            *agg.operating_credits.entry(month).or_insert(0.0) += t.amount;
        }
    }

    agg.months = months.into_iter().collect();
    agg
}
