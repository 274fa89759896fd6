use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Direction of a bank movement. The amount itself is always stored unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "CREDITO")]
    Credit,
    #[serde(rename = "DEBITO")]
    Debit,
}

impl MovementKind {
    /// Accepts the spellings bank exports and classifiers actually produce.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "CREDITO" | "CRÉDITO" | "CREDIT" | "C" => Some(Self::Credit),
            "DEBITO" | "DÉBITO" | "DEBIT" | "D" => Some(Self::Debit),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Credit => "CREDITO",
            Self::Debit => "DEBITO",
        }
    }

    pub fn sign(&self, amount: f64) -> f64 {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    #[serde(alias = "OPERACIONAL")]
    Operating,
    #[serde(alias = "INVESTIMENTO")]
    Investing,
    #[serde(alias = "FINANCIAMENTO")]
    Financing,
    #[serde(alias = "NEUTRO")]
    Neutral,
}

impl ActivityType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Operating => "OPERATING",
            Self::Investing => "INVESTING",
            Self::Financing => "FINANCING",
            Self::Neutral => "NEUTRAL",
        }
    }

    pub fn is_relevant(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One record of the input contract, after field-level parsing but before
/// date validation and chart lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub movement_kind: MovementKind,
    pub account_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub movement_kind: MovementKind,
    pub account_code: Option<String>,
    pub account_name: String,
    pub synthetic_code: String,
    pub synthetic_name: String,
    pub activity_type: ActivityType,
    pub signed_flow: f64,
}

impl EnrichedTransaction {
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    pub fn is_credit(&self) -> bool {
        self.movement_kind == MovementKind::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.movement_kind == MovementKind::Debit
    }
}

/// Calendar month bucket. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[allow(dead_code)]
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_kind_parse_variants() {
        assert_eq!(MovementKind::parse("CREDITO"), Some(MovementKind::Credit));
        assert_eq!(MovementKind::parse(" crédito "), Some(MovementKind::Credit));
        assert_eq!(MovementKind::parse("d"), Some(MovementKind::Debit));
        assert_eq!(MovementKind::parse("Débito"), Some(MovementKind::Debit));
        assert_eq!(MovementKind::parse("TRANSFER"), None);
    }

    #[test]
    fn test_sign_is_derived_from_kind() {
        assert_eq!(MovementKind::Credit.sign(10.0), 10.0);
        assert_eq!(MovementKind::Debit.sign(10.0), -10.0);
    }

    #[test]
    fn test_activity_type_accepts_portuguese_alias() {
        let t: ActivityType = serde_json::from_str("\"FINANCIAMENTO\"").unwrap();
        assert_eq!(t, ActivityType::Financing);
        let t: ActivityType = serde_json::from_str("\"OPERATING\"").unwrap();
        assert_eq!(t, ActivityType::Operating);
        assert!(!ActivityType::Neutral.is_relevant());
    }

    #[test]
    fn test_year_month_orders_chronologically() {
        let mut months = vec![
            YearMonth::new(2025, 2),
            YearMonth::new(2024, 12),
            YearMonth::new(2025, 1),
        ];
        months.sort();
        assert_eq!(months[0], YearMonth::new(2024, 12));
        assert_eq!(months[2].to_string(), "2025-02");
    }
}
