use crate::indicators::Indicator;
use crate::locale::Locale;

fn group_thousands(int_part: &str, sep: char) -> String {
    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Currency with thousands separators: `R$ 1.234,56` (pt-br) or `$1,234.56` (en).
pub fn money(val: f64, locale: Locale, symbol: &str) -> String {
    let negative = val < 0.0 && format!("{:.2}", val.abs()) != "0.00";
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if negative { "-" } else { "" };

    match locale {
        Locale::PtBr => {
            let grouped = group_thousands(int_part, '.');
            format!("{sign}{symbol} {grouped},{dec_part}")
        }
        Locale::En => {
            let grouped = group_thousands(int_part, ',');
            format!("{sign}{symbol}{grouped}.{dec_part}")
        }
    }
}

/// Plain amount for statement cells, no currency symbol.
pub fn amount(val: f64, locale: Locale) -> String {
    let rendered = money(val, locale, "");
    rendered.replacen(' ', "", 1)
}

pub fn ratio(val: f64) -> String {
    if val == f64::INFINITY {
        "∞".to_string()
    } else if val == f64::NEG_INFINITY {
        "-∞".to_string()
    } else {
        format!("{val:.2}x")
    }
}

pub fn percent(val: f64) -> String {
    if val.is_finite() {
        format!("{:.1}%", val * 100.0)
    } else {
        ratio(val)
    }
}

pub fn indicator_value(indicator: Indicator, val: f64, locale: Locale, symbol: &str) -> String {
    if indicator.is_amount() {
        return money(val, locale, symbol);
    }
    match indicator {
        Indicator::FinancingIntensity | Indicator::SelfSufficiency => ratio(val),
        _ => percent(val),
    }
}
