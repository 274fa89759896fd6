use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-br", alias = "pt", alias = "pt-BR")]
    PtBr,
    #[serde(rename = "en", alias = "en-us", alias = "en-US")]
    En,
}

const MONTHS_PT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pt-br" | "pt" | "pt_br" => Some(Self::PtBr),
            "en" | "en-us" | "en_us" => Some(Self::En),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-br",
            Self::En => "en",
        }
    }

    /// `Mar/25` style column label.
    pub fn month_label(&self, month: YearMonth) -> String {
        let names = match self {
            Self::PtBr => &MONTHS_PT,
            Self::En => &MONTHS_EN,
        };
        let idx = (month.month as usize).clamp(1, 12) - 1;
        format!("{}/{:02}", names[idx], month.year.rem_euclid(100))
    }

    pub fn section_title(&self, activity: ActivityType) -> &'static str {
        match (self, activity) {
            (Self::PtBr, ActivityType::Operating) => "ATIVIDADES OPERACIONAIS",
            (Self::PtBr, ActivityType::Investing) => "ATIVIDADES DE INVESTIMENTO",
            (Self::PtBr, ActivityType::Financing) => "ATIVIDADES DE FINANCIAMENTO",
            (Self::PtBr, ActivityType::Neutral) => "MOVIMENTOS NEUTROS",
            (Self::En, ActivityType::Operating) => "OPERATING ACTIVITIES",
            (Self::En, ActivityType::Investing) => "INVESTING ACTIVITIES",
            (Self::En, ActivityType::Financing) => "FINANCING ACTIVITIES",
            (Self::En, ActivityType::Neutral) => "NEUTRAL MOVEMENTS",
        }
    }

    pub fn section_total(&self, activity: ActivityType) -> &'static str {
        match (self, activity) {
            (Self::PtBr, ActivityType::Operating) => "Caixa líquido das atividades operacionais",
            (Self::PtBr, ActivityType::Investing) => "Caixa líquido das atividades de investimento",
            (Self::PtBr, ActivityType::Financing) => "Caixa líquido das atividades de financiamento",
            (Self::PtBr, ActivityType::Neutral) => "Total de movimentos neutros",
            (Self::En, ActivityType::Operating) => "Net cash from operating activities",
            (Self::En, ActivityType::Investing) => "Net cash from investing activities",
            (Self::En, ActivityType::Financing) => "Net cash from financing activities",
            (Self::En, ActivityType::Neutral) => "Total neutral movements",
        }
    }

    pub fn period_total(&self) -> &'static str {
        match self {
            Self::PtBr => "CAIXA GERADO NO PERÍODO",
            Self::En => "CASH GENERATED IN PERIOD",
        }
    }
}
