//! Normalizes each indicator onto a 0-100 sub-score with fixed step
//! functions, then weights the sub-scores into a single score and class.
//!
//! Cut points and weights are named constants.

use serde::Serialize;

use crate::indicators::{serialize_ratio, Indicator, IndicatorSet, ALL_INDICATORS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const WEIGHT_GCO: f64 = 20.0;
pub const WEIGHT_OPERATING_MARGIN: f64 = 20.0;
pub const WEIGHT_WITHDRAWAL_WEIGHT: f64 = 15.0;
pub const WEIGHT_FINANCING_INTENSITY: f64 = 15.0;
pub const WEIGHT_INFLOW_GROWTH: f64 = 10.0;
pub const WEIGHT_REINVESTMENT_RATE: f64 = 10.0;
pub const WEIGHT_SELF_SUFFICIENCY: f64 = 10.0;
// Informational: shown in the breakdown, never weighted.
pub const WEIGHT_OPERATING_INFLOWS: f64 = 0.0;
pub const WEIGHT_PERSONAL_WITHDRAWALS: f64 = 0.0;

const MARGIN_STRONG: f64 = 0.30;
const MARGIN_FAIR: f64 = 0.10;

const WITHDRAWAL_LOW: f64 = 0.10;
const WITHDRAWAL_MODERATE: f64 = 0.30;
const WITHDRAWAL_HIGH: f64 = 0.50;

const FINANCING_LIGHT: f64 = 0.5;
const FINANCING_HEAVY: f64 = 1.0;

const GROWTH_STRONG: f64 = 0.20;
const GROWTH_FAIR: f64 = 0.05;
const GROWTH_TOLERATED_DECLINE: f64 = -0.10;

const REINVESTMENT_STRONG: f64 = 0.20;
const REINVESTMENT_FAIR: f64 = 0.10;

const SELF_SUFFICIENCY_STRONG: f64 = 1.5;
const SELF_SUFFICIENCY_FULL: f64 = 1.0;
const SELF_SUFFICIENCY_PARTIAL: f64 = 0.5;

const CLASS_EXCELLENT: f64 = 85.0;
const CLASS_GOOD: f64 = 70.0;
const CLASS_MIDDLE: f64 = 40.0;

/// Sub-scores below this produce a recommendation.
const RECOMMENDATION_THRESHOLD: u8 = 50;

pub fn weight(indicator: Indicator) -> f64 {
    match indicator {
        Indicator::Gco => WEIGHT_GCO,
        Indicator::OperatingInflows => WEIGHT_OPERATING_INFLOWS,
        Indicator::OperatingMargin => WEIGHT_OPERATING_MARGIN,
        Indicator::WithdrawalWeight => WEIGHT_WITHDRAWAL_WEIGHT,
        Indicator::FinancingIntensity => WEIGHT_FINANCING_INTENSITY,
        Indicator::InflowGrowth => WEIGHT_INFLOW_GROWTH,
        Indicator::ReinvestmentRate => WEIGHT_REINVESTMENT_RATE,
        Indicator::SelfSufficiency => WEIGHT_SELF_SUFFICIENCY,
        Indicator::PersonalWithdrawals => WEIGHT_PERSONAL_WITHDRAWALS,
    }
}

// ---------------------------------------------------------------------------
// Sub-score step functions
// ---------------------------------------------------------------------------

pub fn score_gco(gco: f64) -> u8 {
    if gco > 0.0 {
        100
    } else {
        0
    }
}

pub fn score_operating_inflows(inflows: f64) -> u8 {
    if inflows > 0.0 {
        100
    } else {
        0
    }
}

pub fn score_operating_margin(margin: f64) -> u8 {
    if margin >= MARGIN_STRONG {
        100
    } else if margin >= MARGIN_FAIR {
        70
    } else if margin > 0.0 {
        40
    } else {
        0
    }
}

pub fn score_withdrawal_weight(weight: f64) -> u8 {
    if weight <= WITHDRAWAL_LOW {
        100
    } else if weight <= WITHDRAWAL_MODERATE {
        60
    } else if weight <= WITHDRAWAL_HIGH {
        40
    } else {
        10
    }
}

/// Gated on the operating margin: financing is only healthy when operations
/// retain cash to service it.
pub fn score_financing_intensity(intensity: f64, margin: f64) -> u8 {
    if margin <= 0.0 {
        0
    } else if intensity <= FINANCING_LIGHT {
        100
    } else if intensity <= FINANCING_HEAVY {
        50
    } else {
        10
    }
}

pub fn score_inflow_growth(growth: f64) -> u8 {
    if growth >= GROWTH_STRONG {
        100
    } else if growth >= GROWTH_FAIR {
        70
    } else if growth >= 0.0 {
        40
    } else if growth >= GROWTH_TOLERATED_DECLINE {
        20
    } else {
        0
    }
}

pub fn score_reinvestment_rate(rate: f64) -> u8 {
    if rate >= REINVESTMENT_STRONG {
        100
    } else if rate >= REINVESTMENT_FAIR {
        70
    } else if rate > 0.0 {
        40
    } else {
        20
    }
}

/// `f64::INFINITY` satisfies the first guard without special-casing.
pub fn score_self_sufficiency(ratio: f64) -> u8 {
    if ratio >= SELF_SUFFICIENCY_STRONG {
        100
    } else if ratio >= SELF_SUFFICIENCY_FULL {
        80
    } else if ratio >= SELF_SUFFICIENCY_PARTIAL {
        50
    } else {
        20
    }
}

pub fn score_personal_withdrawals(withdrawals: f64, gco: f64) -> u8 {
    if withdrawals == 0.0 {
        100
    } else if withdrawals <= gco.max(0.0) {
        60
    } else {
        20
    }
}

pub fn sub_score(indicator: Indicator, ind: &IndicatorSet) -> u8 {
    match indicator {
        Indicator::Gco => score_gco(ind.gco),
        Indicator::OperatingInflows => score_operating_inflows(ind.operating_inflows),
        Indicator::OperatingMargin => score_operating_margin(ind.operating_margin),
        Indicator::WithdrawalWeight => score_withdrawal_weight(ind.withdrawal_weight),
        Indicator::FinancingIntensity => {
            score_financing_intensity(ind.financing_intensity, ind.operating_margin)
        }
        Indicator::InflowGrowth => score_inflow_growth(ind.inflow_growth),
        Indicator::ReinvestmentRate => score_reinvestment_rate(ind.reinvestment_rate),
        Indicator::SelfSufficiency => score_self_sufficiency(ind.self_sufficiency),
        Indicator::PersonalWithdrawals => {
            score_personal_withdrawals(ind.personal_withdrawals, ind.gco)
        }
    }
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClass {
    Excellent,
    Good,
    Moderate,
    HighRisk,
    Critical,
}

impl RiskClass {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Moderate => "Moderate risk",
            Self::HighRisk => "High risk",
            Self::Critical => "Critical",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            Self::Excellent => "Operations generate strong cash and the business funds itself.",
            Self::Good => "Cash flow is healthy, with a few indicators worth monitoring.",
            Self::Moderate => {
                "Operations generate cash and cover commitments, but several indicators need attention."
            }
            Self::HighRisk => {
                "Operations do not generate enough cash to sustain investments and withdrawals on their own."
            }
            Self::Critical => "Cash flow is critical; operations and commitments need immediate review.",
        }
    }
}

/// The middle band depends on the indicators, not only on the score.
pub fn classify(score: f64, ind: &IndicatorSet) -> RiskClass {
    if score >= CLASS_EXCELLENT {
        RiskClass::Excellent
    } else if score >= CLASS_GOOD {
        RiskClass::Good
    } else if score >= CLASS_MIDDLE {
        if ind.gco > 0.0 && ind.self_sufficiency >= SELF_SUFFICIENCY_FULL {
            RiskClass::Moderate
        } else {
            RiskClass::HighRisk
        }
    } else {
        RiskClass::Critical
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub indicator: Indicator,
    #[serde(serialize_with = "serialize_ratio")]
    pub value: f64,
    pub sub_score: u8,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub class: RiskClass,
    pub label: &'static str,
    pub components: Vec<ScoreComponent>,
}

impl ScoreResult {
    /// Score 0 with no breakdown, for runs that could not be computed.
    pub fn failed() -> Self {
        Self {
            score: 0.0,
            class: RiskClass::Critical,
            label: RiskClass::Critical.label(),
            components: Vec::new(),
        }
    }

    pub fn component(&self, indicator: Indicator) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.indicator == indicator)
    }

    #[allow(dead_code)]
    pub fn sub_score(&self, indicator: Indicator) -> u8 {
        self.component(indicator).map(|c| c.sub_score).unwrap_or(0)
    }

    /// One sentence per weighted indicator scoring below 50, heaviest first.
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut weak: Vec<&ScoreComponent> = self
            .components
            .iter()
            .filter(|c| c.weight > 0.0 && c.sub_score < RECOMMENDATION_THRESHOLD)
            .collect();
        weak.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        weak.iter().filter_map(|c| recommendation(c.indicator)).collect()
    }
}

fn recommendation(indicator: Indicator) -> Option<&'static str> {
    let text = match indicator {
        Indicator::Gco => {
            "Operating activities are consuming cash: review pricing, collection terms and fixed costs."
        }
        Indicator::OperatingMargin => {
            "Little of each operating inflow is retained: look for cost reductions or price adjustments."
        }
        Indicator::WithdrawalWeight => {
            "Personal withdrawals take a large share of outflows: set a fixed owner's draw and keep personal spending separate."
        }
        Indicator::FinancingIntensity => {
            "The business leans on financing relative to its operating cash: avoid new debt until operations cover commitments."
        }
        Indicator::InflowGrowth => {
            "Operating inflows are flat or falling: review sales channels and client retention."
        }
        Indicator::ReinvestmentRate => {
            "Little cash goes back into the business: plan investments that sustain future capacity."
        }
        Indicator::SelfSufficiency => {
            "Operating and financing cash do not cover investments and withdrawals: reduce withdrawals or postpone investments."
        }
        Indicator::OperatingInflows | Indicator::PersonalWithdrawals => return None,
    };
    Some(text)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn compute(ind: &IndicatorSet) -> ScoreResult {
    let components: Vec<ScoreComponent> = ALL_INDICATORS
        .iter()
        .map(|i| {
            let sub_score = sub_score(*i, ind);
            let weight = weight(*i);
            ScoreComponent {
                indicator: *i,
                value: ind.get(*i),
                sub_score,
                weight,
                contribution: f64::from(sub_score) * weight / 100.0,
            }
        })
        .collect();

    let raw: f64 = components.iter().map(|c| c.contribution).sum();
    let score = round1(raw).clamp(0.0, 100.0);
    let class = classify(score, ind);

    ScoreResult {
        score,
        class,
        label: class.label(),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUB_SCORE_LEVELS: &[u8] = &[0, 10, 20, 40, 50, 60, 70, 80, 100];

    fn base() -> IndicatorSet {
        IndicatorSet::default()
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: f64 = ALL_INDICATORS.iter().map(|i| weight(*i)).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_operating_margin_steps() {
        assert_eq!(score_operating_margin(0.30), 100);
        assert_eq!(score_operating_margin(0.2999), 70);
        assert_eq!(score_operating_margin(0.10), 70);
        assert_eq!(score_operating_margin(0.01), 40);
        assert_eq!(score_operating_margin(0.0), 0);
        assert_eq!(score_operating_margin(-1.5), 0);
    }

    #[test]
    fn test_self_sufficiency_steps() {
        assert_eq!(score_self_sufficiency(f64::INFINITY), 100);
        assert_eq!(score_self_sufficiency(1.5), 100);
        assert_eq!(score_self_sufficiency(1.0), 80);
        assert_eq!(score_self_sufficiency(0.5), 50);
        assert_eq!(score_self_sufficiency(0.49), 20);
        assert_eq!(score_self_sufficiency(-3.0), 20);
    }

    #[test]
    fn test_withdrawal_weight_steps() {
        assert_eq!(score_withdrawal_weight(0.0), 100);
        assert_eq!(score_withdrawal_weight(0.10), 100);
        assert_eq!(score_withdrawal_weight(0.25), 60);
        assert_eq!(score_withdrawal_weight(0.50), 40);
        assert_eq!(score_withdrawal_weight(0.6), 10);
    }

    #[test]
    fn test_financing_intensity_boundaries() {
        assert_eq!(score_financing_intensity(0.5, 0.2), 100);
        assert_eq!(score_financing_intensity(0.5000001, 0.2), 50);
        assert_eq!(score_financing_intensity(1.0, 0.2), 50);
        assert_eq!(score_financing_intensity(1.0000001, 0.2), 10);
        assert_eq!(score_financing_intensity(-0.4, 0.2), 100);
        assert_eq!(score_financing_intensity(0.0, 0.0), 0);
        assert_eq!(score_financing_intensity(0.1, -0.3), 0);
    }

    #[test]
    fn test_growth_and_reinvestment_steps() {
        assert_eq!(score_inflow_growth(0.5), 100);
        assert_eq!(score_inflow_growth(0.2), 100);
        assert_eq!(score_inflow_growth(0.05), 70);
        assert_eq!(score_inflow_growth(0.0), 40);
        assert_eq!(score_inflow_growth(-0.1), 20);
        assert_eq!(score_inflow_growth(-0.5), 0);
        assert_eq!(score_reinvestment_rate(0.25), 100);
        assert_eq!(score_reinvestment_rate(0.1), 70);
        assert_eq!(score_reinvestment_rate(0.01), 40);
        assert_eq!(score_reinvestment_rate(0.0), 20);
    }

    #[test]
    fn test_informational_steps() {
        assert_eq!(score_personal_withdrawals(0.0, 0.0), 100);
        assert_eq!(score_personal_withdrawals(100.0, 500.0), 60);
        assert_eq!(score_personal_withdrawals(100.0, -500.0), 20);
        assert_eq!(score_operating_inflows(0.0), 0);
    }

    #[test]
    fn test_empty_set_is_critical() {
        let result = compute(&base());
        assert_eq!(result.score, 31.0);
        assert_eq!(result.class, RiskClass::Critical);
        assert_eq!(result.sub_score(Indicator::Gco), 0);
        assert_eq!(result.sub_score(Indicator::OperatingMargin), 0);
        assert_eq!(result.sub_score(Indicator::FinancingIntensity), 0);
        assert_eq!(result.sub_score(Indicator::SelfSufficiency), 100);
    }

    #[test]
    fn test_single_operating_credit_scores_excellent() {
        let ind = IndicatorSet {
            gco: 1000.0,
            operating_inflows: 1000.0,
            operating_margin: 1.0,
            ..base()
        };
        let result = compute(&ind);
        assert_eq!(result.sub_score(Indicator::OperatingMargin), 100);
        assert_eq!(result.sub_score(Indicator::WithdrawalWeight), 100);
        assert_eq!(result.score, 86.0);
        assert_eq!(result.class, RiskClass::Excellent);
        assert_eq!(result.label, "Excellent");
    }

    #[test]
    fn test_growth_and_withdrawal_scenarios() {
        let ind = IndicatorSet {
            inflow_growth: 0.5,
            withdrawal_weight: 0.6,
            ..base()
        };
        let result = compute(&ind);
        assert_eq!(result.sub_score(Indicator::InflowGrowth), 100);
        assert_eq!(result.sub_score(Indicator::WithdrawalWeight), 10);
    }

    #[test]
    fn test_middle_band_depends_on_indicators() {
        // gco > 0, margin 0.05, withdrawal 0.4, intensity 0.8,
        // growth 0, reinvestment 0.05 → 20+8+6+7.5+4+4 = 49.5 before self-sufficiency
        let healthy = IndicatorSet {
            gco: 100.0,
            operating_inflows: 2000.0,
            operating_margin: 0.05,
            withdrawal_weight: 0.4,
            financing_intensity: 0.8,
            inflow_growth: 0.0,
            reinvestment_rate: 0.05,
            self_sufficiency: 1.2,
            personal_withdrawals: 50.0,
        };
        let healthy_result = compute(&healthy);
        assert_eq!(healthy_result.score, 57.5);
        assert_eq!(healthy_result.class, RiskClass::Moderate);

        let strained = IndicatorSet {
            self_sufficiency: 0.9,
            ..healthy
        };
        let strained_result = compute(&strained);
        assert_eq!(strained_result.score, 54.5);
        assert_eq!(strained_result.class, RiskClass::HighRisk);
    }

    #[test]
    fn test_classify_bands() {
        let ind = base();
        assert_eq!(classify(85.0, &ind), RiskClass::Excellent);
        assert_eq!(classify(84.9, &ind), RiskClass::Good);
        assert_eq!(classify(70.0, &ind), RiskClass::Good);
        assert_eq!(classify(69.9, &ind), RiskClass::HighRisk);
        assert_eq!(classify(39.9, &ind), RiskClass::Critical);
    }

    #[test]
    fn test_sub_scores_in_allowed_levels_and_score_in_range() {
        let samples = [
            base(),
            IndicatorSet {
                gco: -50.0,
                operating_margin: -0.3,
                inflow_growth: -0.9,
                self_sufficiency: -2.0,
                withdrawal_weight: 0.9,
                financing_intensity: 4.0,
                ..base()
            },
            IndicatorSet {
                gco: 10.0,
                operating_margin: 0.15,
                financing_intensity: 0.7,
                reinvestment_rate: 0.12,
                self_sufficiency: 0.7,
                inflow_growth: 0.07,
                ..base()
            },
        ];
        for ind in &samples {
            let result = compute(ind);
            assert!((0.0..=100.0).contains(&result.score));
            for c in &result.components {
                assert!(SUB_SCORE_LEVELS.contains(&c.sub_score), "{:?}", c);
            }
            let raw: f64 = result.components.iter().map(|c| c.contribution).sum();
            assert_eq!(result.score, round1(raw));
        }
    }

    #[test]
    fn test_recommendations_heaviest_first() {
        let result = compute(&base());
        let recs = result.recommendations();
        // gco, margin, financing intensity, growth, reinvestment are below 50
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("Operating activities"));
        assert!(recs[2].starts_with("The business leans on financing"));
    }

    #[test]
    fn test_score_serializes_infinite_component() {
        let json = serde_json::to_value(compute(&base())).unwrap();
        assert_eq!(json["class"], "critical");
        let ss = json["components"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["indicator"] == "self_sufficiency")
            .unwrap();
        assert_eq!(ss["value"], "inf");
    }
}
