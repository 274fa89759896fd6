use serde::{Serialize, Serializer};

use crate::aggregate::FlowAggregate;
use crate::models::ActivityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Gco,
    OperatingInflows,
    OperatingMargin,
    WithdrawalWeight,
    FinancingIntensity,
    InflowGrowth,
    ReinvestmentRate,
    SelfSufficiency,
    PersonalWithdrawals,
}

impl Indicator {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Gco => "gco",
            Self::OperatingInflows => "operating_inflows",
            Self::OperatingMargin => "operating_margin",
            Self::WithdrawalWeight => "withdrawal_weight",
            Self::FinancingIntensity => "financing_intensity",
            Self::InflowGrowth => "inflow_growth",
            Self::ReinvestmentRate => "reinvestment_rate",
            Self::SelfSufficiency => "self_sufficiency",
            Self::PersonalWithdrawals => "personal_withdrawals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gco => "Operating cash generation",
            Self::OperatingInflows => "Operating inflows",
            Self::OperatingMargin => "Operating cash margin",
            Self::WithdrawalWeight => "Personal withdrawal weight",
            Self::FinancingIntensity => "Financing intensity",
            Self::InflowGrowth => "Operating inflow growth",
            Self::ReinvestmentRate => "Reinvestment rate",
            Self::SelfSufficiency => "Operational self-sufficiency",
            Self::PersonalWithdrawals => "Personal withdrawals",
        }
    }

    /// Absolute currency amounts, as opposed to ratios.
    pub fn is_amount(&self) -> bool {
        matches!(
            self,
            Self::Gco | Self::OperatingInflows | Self::PersonalWithdrawals
        )
    }
}

pub const ALL_INDICATORS: &[Indicator] = &[
    Indicator::Gco,
    Indicator::OperatingInflows,
    Indicator::OperatingMargin,
    Indicator::WithdrawalWeight,
    Indicator::FinancingIntensity,
    Indicator::InflowGrowth,
    Indicator::ReinvestmentRate,
    Indicator::SelfSufficiency,
    Indicator::PersonalWithdrawals,
];

/// The nine indicators of one run. `self_sufficiency` may be `f64::INFINITY`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub gco: f64,
    pub operating_inflows: f64,
    pub operating_margin: f64,
    pub withdrawal_weight: f64,
    pub financing_intensity: f64,
    pub inflow_growth: f64,
    pub reinvestment_rate: f64,
    #[serde(serialize_with = "serialize_ratio")]
    pub self_sufficiency: f64,
    pub personal_withdrawals: f64,
}

impl IndicatorSet {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Gco => self.gco,
            Indicator::OperatingInflows => self.operating_inflows,
            Indicator::OperatingMargin => self.operating_margin,
            Indicator::WithdrawalWeight => self.withdrawal_weight,
            Indicator::FinancingIntensity => self.financing_intensity,
            Indicator::InflowGrowth => self.inflow_growth,
            Indicator::ReinvestmentRate => self.reinvestment_rate,
            Indicator::SelfSufficiency => self.self_sufficiency,
            Indicator::PersonalWithdrawals => self.personal_withdrawals,
        }
    }

    /// All zeros, including self-sufficiency. Used when a run fails outright.
    pub fn zeroed() -> Self {
        Self {
            gco: 0.0,
            operating_inflows: 0.0,
            operating_margin: 0.0,
            withdrawal_weight: 0.0,
            financing_intensity: 0.0,
            inflow_growth: 0.0,
            reinvestment_rate: 0.0,
            self_sufficiency: 0.0,
            personal_withdrawals: 0.0,
        }
    }

    /// Flat name → value view, in canonical indicator order.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        ALL_INDICATORS
            .iter()
            .map(|i| (i.key(), self.get(*i)))
            .collect()
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        compute(&FlowAggregate::default())
    }
}

/// Non-finite ratios have no JSON number representation.
pub fn serialize_ratio<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Growth between the first and last month only, intermediate months are
/// ignored.
fn inflow_growth(agg: &FlowAggregate) -> f64 {
    let (Some(first), Some(last)) = (agg.months.first(), agg.months.last()) else {
        return 0.0;
    };
    if agg.months.len() < 2 {
        return 0.0;
    }
    let first = agg.operating_credits_in(*first);
    let last = agg.operating_credits_in(*last);
    if first == 0.0 {
        return if last > 0.0 { 1.0 } else { 0.0 };
    }
    (last - first) / first
}

pub fn compute(agg: &FlowAggregate) -> IndicatorSet {
    let gco = agg.activity_total(ActivityType::Operating);
    let investing = agg.activity_total(ActivityType::Investing);
    let financing = agg.activity_total(ActivityType::Financing);
    let operating_inflows = agg.operating_inflows;
    let personal_withdrawals = agg.personal_withdrawals.abs();

    let consumed = investing.abs() + personal_withdrawals;
    let self_sufficiency = if consumed == 0.0 {
        f64::INFINITY
    } else {
        (gco + financing) / consumed
    };

    IndicatorSet {
        gco,
        operating_inflows,
        operating_margin: ratio_or_zero(gco, operating_inflows),
        withdrawal_weight: ratio_or_zero(personal_withdrawals, agg.total_debits),
        financing_intensity: ratio_or_zero(financing, gco.abs()),
        inflow_growth: inflow_growth(agg),
        reinvestment_rate: ratio_or_zero(investing.abs(), gco + financing),
        self_sufficiency,
        personal_withdrawals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::chart::ChartOfAccounts;
    use crate::enrich::enrich_transactions;
    use crate::models::{MovementKind, RawTransaction};

    fn indicators_for(rows: &[(&str, f64, MovementKind, &str)]) -> IndicatorSet {
        let records: Vec<RawTransaction> = rows
            .iter()
            .map(|(date, amount, kind, code)| RawTransaction {
                date: date.to_string(),
                description: String::new(),
                amount: *amount,
                movement_kind: *kind,
                account_code: Some(code.to_string()),
            })
            .collect();
        let enriched = enrich_transactions(&records, &ChartOfAccounts::builtin());
        compute(&aggregate(&enriched.transactions))
    }

    #[test]
    fn test_empty_set_defaults() {
        let ind = IndicatorSet::default();
        assert_eq!(ind.gco, 0.0);
        assert_eq!(ind.operating_margin, 0.0);
        assert_eq!(ind.withdrawal_weight, 0.0);
        assert_eq!(ind.financing_intensity, 0.0);
        assert_eq!(ind.inflow_growth, 0.0);
        assert_eq!(ind.reinvestment_rate, 0.0);
        assert_eq!(ind.self_sufficiency, f64::INFINITY);
    }

    #[test]
    fn test_single_operating_credit() {
        let ind = indicators_for(&[("2025-01-10", 1000.0, MovementKind::Credit, "REC-01")]);
        assert_eq!(ind.gco, 1000.0);
        assert_eq!(ind.operating_inflows, 1000.0);
        assert_eq!(ind.operating_margin, 1.0);
        assert_eq!(ind.withdrawal_weight, 0.0);
        assert_eq!(ind.financing_intensity, 0.0);
        assert_eq!(ind.self_sufficiency, f64::INFINITY);
    }

    #[test]
    fn test_margin_is_not_clamped() {
        let ind = indicators_for(&[
            ("2025-01-10", 100.0, MovementKind::Credit, "REC-01"),
            ("2025-01-11", 300.0, MovementKind::Debit, "DES-01"),
        ]);
        assert_eq!(ind.gco, -200.0);
        assert_eq!(ind.operating_margin, -2.0);
    }

    #[test]
    fn test_growth_two_months() {
        let ind = indicators_for(&[
            ("2025-01-10", 100.0, MovementKind::Credit, "REC-01"),
            ("2025-02-10", 150.0, MovementKind::Credit, "REC-01"),
        ]);
        assert_eq!(ind.inflow_growth, 0.5);
    }

    #[test]
    fn test_growth_ignores_intermediate_months() {
        let ind = indicators_for(&[
            ("2025-03-10", 120.0, MovementKind::Credit, "REC-01"),
            ("2025-01-10", 100.0, MovementKind::Credit, "REC-01"),
            ("2025-02-10", 900.0, MovementKind::Credit, "REC-01"),
        ]);
        assert!((ind.inflow_growth - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_growth_fallbacks() {
        // First month has only a non-operating row.
        let ind = indicators_for(&[
            ("2025-01-10", 50.0, MovementKind::Credit, "FIN-01"),
            ("2025-02-10", 80.0, MovementKind::Credit, "REC-01"),
        ]);
        assert_eq!(ind.inflow_growth, 1.0);

        let ind = indicators_for(&[
            ("2025-01-10", 50.0, MovementKind::Debit, "DES-01"),
            ("2025-02-10", 80.0, MovementKind::Debit, "DES-01"),
        ]);
        assert_eq!(ind.inflow_growth, 0.0);

        let ind = indicators_for(&[("2025-01-10", 50.0, MovementKind::Credit, "REC-01")]);
        assert_eq!(ind.inflow_growth, 0.0);
    }

    #[test]
    fn test_withdrawal_weight() {
        let ind = indicators_for(&[
            ("2025-01-10", 600.0, MovementKind::Debit, "FIN-05"),
            ("2025-01-11", 400.0, MovementKind::Debit, "DES-01"),
        ]);
        assert_eq!(ind.personal_withdrawals, 600.0);
        assert_eq!(ind.withdrawal_weight, 0.6);
    }

    #[test]
    fn test_personal_withdrawal_credit_is_ignored() {
        let ind = indicators_for(&[
            ("2025-01-10", 600.0, MovementKind::Credit, "FIN-05"),
            ("2025-01-11", 400.0, MovementKind::Debit, "DES-01"),
        ]);
        assert_eq!(ind.personal_withdrawals, 0.0);
        assert_eq!(ind.withdrawal_weight, 0.0);
    }

    #[test]
    fn test_financing_reinvestment_and_self_sufficiency() {
        let ind = indicators_for(&[
            ("2025-01-10", 2000.0, MovementKind::Credit, "REC-01"),
            ("2025-01-11", 1000.0, MovementKind::Debit, "DES-01"),
            ("2025-01-12", 500.0, MovementKind::Credit, "FIN-01"),
            ("2025-01-13", 600.0, MovementKind::Debit, "INV-01"),
            ("2025-01-14", 150.0, MovementKind::Debit, "FIN-05"),
        ]);
        // gco 1000, financing 350, investing -600
        assert_eq!(ind.gco, 1000.0);
        assert_eq!(ind.financing_intensity, 0.35);
        assert_eq!(ind.reinvestment_rate, 600.0 / 1350.0);
        assert_eq!(ind.self_sufficiency, 1350.0 / 750.0);
    }

    #[test]
    fn test_self_sufficiency_finite_when_anything_consumed() {
        let ind = indicators_for(&[("2025-01-13", 100.0, MovementKind::Debit, "INV-01")]);
        assert!(ind.self_sufficiency.is_finite());
        assert_eq!(ind.self_sufficiency, 0.0);
    }

    #[test]
    fn test_zero_gco_financing_fallback() {
        let ind = indicators_for(&[("2025-01-12", 500.0, MovementKind::Credit, "FIN-01")]);
        assert_eq!(ind.gco, 0.0);
        assert_eq!(ind.financing_intensity, 0.0);
    }

    #[test]
    fn test_entries_and_infinite_serialization() {
        let ind = IndicatorSet::default();
        let entries = ind.entries();
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[0].0, "gco");
        let json = serde_json::to_value(ind).unwrap();
        assert_eq!(json["self_sufficiency"], "inf");
        assert_eq!(json["gco"], 0.0);
    }
}
