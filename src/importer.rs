use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use crate::error::{CaixaError, Result};
use crate::models::{MovementKind, RawTransaction};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parses an amount as written in bank exports. A lone comma, or a comma after
/// the last dot, is the decimal separator (`1.234,56`); otherwise commas group
/// thousands (`1,234.56`).
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s: String = raw
        .replace("R$", "")
        .replace(['$', '"', ' '], "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return parse_amount(inner).map(|v| -v);
    }
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), None) => s.replace(',', "."),
        _ => s.replace(',', ""),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Day-first parsing: `DD/MM/YYYY`, `DD-MM-YY`, `DD.MM.YYYY`. A four-digit
/// leading part is read as ISO (`YYYY-MM-DD`, `YYYY/MM/DD`). Any time suffix
/// after `T` or a space is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let raw = raw.split(['T', ' ']).next()?;
    let sep = ['/', '-', '.'].into_iter().find(|c| raw.contains(*c))?;
    let parts: Vec<&str> = raw.split(sep).collect();
    if parts.len() != 3 {
        return None;
    }
    let (y, m, d) = if parts[0].len() == 4 {
        (parts[0].parse().ok()?, parts[1].parse().ok()?, parts[2].parse().ok()?)
    } else {
        let y: i32 = match parts[2].len() {
            2 => 2000 + parts[2].parse::<i32>().ok()?,
            4 => parts[2].parse().ok()?,
            _ => return None,
        };
        (y, parts[1].parse().ok()?, parts[0].parse().ok()?)
    };
    NaiveDate::from_ymd_opt(y, m, d)
}

// ---------------------------------------------------------------------------
// Input formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn parse(&self, content: &str) -> Result<ImportResult> {
        match self {
            Self::Json => parse_json(content),
            Self::Csv => parse_csv(content),
        }
    }
}

const ALL_FORMATS: &[InputFormat] = &[InputFormat::Json, InputFormat::Csv];

pub fn get_by_key(key: &str) -> Option<InputFormat> {
    ALL_FORMATS
        .iter()
        .find(|f| f.key().eq_ignore_ascii_case(key))
        .copied()
}

pub fn get_for_file(file_path: &Path) -> Option<InputFormat> {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(get_by_key)
}

// ---------------------------------------------------------------------------
// Record shape shared by both formats
// ---------------------------------------------------------------------------

/// A JSON or CSV cell that may hold either a number or text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// All fields optional. Missing or null cells reject the row in `to_raw`.
#[derive(Debug, Deserialize)]
struct InputRecord {
    #[serde(default, alias = "data")]
    date: Option<String>,
    #[serde(default, alias = "descricao")]
    description: Option<String>,
    #[serde(default, alias = "valor")]
    amount: Option<Scalar>,
    #[serde(default, alias = "tipo")]
    movement_kind: Option<String>,
    #[serde(default, alias = "conta")]
    account_code: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<serde_json::Value>),
    Wrapped { transactions: Vec<serde_json::Value> },
}

fn to_raw(rec: InputRecord) -> Option<RawTransaction> {
    let Some(date) = rec.date.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) else {
        warn!(description = ?rec.description, "dropping row without a date");
        return None;
    };
    let kind = rec.movement_kind.unwrap_or_default();
    let Some(movement_kind) = MovementKind::parse(&kind) else {
        warn!(kind = %kind, date = %date, "dropping row with unknown movement kind");
        return None;
    };
    let parsed = match &rec.amount {
        Some(Scalar::Number(v)) => Some(*v).filter(|v| v.is_finite()),
        Some(Scalar::Text(s)) => parse_amount(s),
        None => None,
    };
    let Some(amount) = parsed else {
        warn!(amount = ?rec.amount, date = %date, "dropping row with unparseable amount");
        return None;
    };
    if amount < 0.0 {
        warn!(amount, date = %date, "negative amount normalized to its magnitude");
    }
    let account_code = rec
        .account_code
        .map(|c| c.into_text().trim().to_string())
        .filter(|c| !c.is_empty());
    Some(RawTransaction {
        date,
        description: rec.description.unwrap_or_default().trim().to_string(),
        amount: amount.abs(),
        movement_kind,
        account_code,
    })
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportResult {
    pub records: Vec<RawTransaction>,
    pub skipped: usize,
}

fn collect(rows: impl IntoIterator<Item = Option<RawTransaction>>) -> ImportResult {
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        match row {
            Some(r) => records.push(r),
            None => skipped += 1,
        }
    }
    ImportResult { records, skipped }
}

pub fn import_file(file_path: &Path, format_key: Option<&str>) -> Result<ImportResult> {
    let format = match format_key {
        Some(key) => get_by_key(key).ok_or_else(|| CaixaError::UnknownFormat(key.to_string()))?,
        None => get_for_file(file_path)
            .ok_or_else(|| CaixaError::UnknownFormat(file_path.display().to_string()))?,
    };
    let content = std::fs::read_to_string(file_path)?;
    format.parse(&content)
}

pub fn parse_json(content: &str) -> Result<ImportResult> {
    let doc: JsonDocument = serde_json::from_str(content)?;
    let rows = match doc {
        JsonDocument::List(rows) => rows,
        JsonDocument::Wrapped { transactions } => transactions,
    };
    Ok(collect(rows.into_iter().enumerate().map(|(i, value)| {
        match serde_json::from_value::<InputRecord>(value) {
            Ok(rec) => to_raw(rec),
            Err(e) => {
                warn!(row = i, error = %e, "dropping malformed JSON row");
                None
            }
        }
    })))
}

/// Header row required. Semicolon-delimited exports are detected from the
/// header line.
pub fn parse_csv(content: &str) -> Result<ImportResult> {
    let header = content.lines().next().unwrap_or_default();
    let delimiter = if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    };
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.deserialize::<InputRecord>() {
        match result {
            Ok(rec) => rows.push(to_raw(rec)),
            Err(e) => {
                warn!(error = %e, "dropping malformed CSV row");
                rows.push(None);
            }
        }
    }
    Ok(collect(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1234.56"), Some(1234.56));
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("45,90"), Some(45.9));
        assert_eq!(parse_amount("(50.00)"), Some(-50.0));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_date_day_first() {
        let d = parse_date("03/04/2025").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
        assert_eq!(parse_date("03-04-25"), Some(d));
        assert_eq!(parse_date("03.04.2025"), Some(d));
    }

    #[test]
    fn test_parse_date_iso() {
        let d = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
        assert_eq!(parse_date("2025-04-03"), Some(d));
        assert_eq!(parse_date("2025/04/03"), Some(d));
        assert_eq!(parse_date("2025-04-03T10:15:00Z"), Some(d));
        assert_eq!(parse_date("2025-04-03 10:15"), Some(d));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("31/02/2025"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("12/2025"), None);
        assert_eq!(parse_date("1/1/202"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_json_array() {
        let json = r#"[
            {"date": "05/01/2025", "description": "Sale", "amount": 100, "movement_kind": "CREDITO", "account_code": "REC-01"},
            {"date": "06/01/2025", "description": "Rent", "amount": "1.500,00", "movement_kind": "DEBITO", "account_code": "DES-03"}
        ]"#;
        let result = parse_json(json).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.records[1].amount, 1500.0);
        assert_eq!(result.records[1].movement_kind, MovementKind::Debit);
    }

    #[test]
    fn test_parse_json_wrapped_and_aliases() {
        let json = r#"{"transactions": [
            {"data": "2025-01-05", "descricao": "Venda", "valor": 10.5, "tipo": "C", "conta": " "}
        ]}"#;
        let result = parse_json(json).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].account_code, None);
        assert_eq!(result.records[0].description, "Venda");
    }

    #[test]
    fn test_json_skips_unknown_movement_kind_and_normalizes_negative() {
        let json = r#"[
            {"date": "05/01/2025", "amount": 10, "movement_kind": "TRANSFER"},
            {"date": "05/01/2025", "amount": -25, "movement_kind": "DEBITO"}
        ]"#;
        let result = parse_json(json).unwrap();
        assert_eq!(result.skipped, 1);
        assert_eq!(result.records[0].amount, 25.0);
    }

    #[test]
    fn test_json_bad_row_does_not_abort_import() {
        let json = r#"[
            {"date": null, "amount": 10, "movement_kind": "CREDITO", "account_code": "REC-01"},
            {"amount": 10, "movement_kind": "CREDITO"},
            {"date": "05/01/2025", "amount": null, "movement_kind": "DEBITO"},
            {"date": "05/01/2025", "amount": 7, "movement_kind": null},
            "not an object",
            {"date": "06/01/2025", "description": null, "amount": 100, "movement_kind": "CREDITO", "account_code": "REC-01"}
        ]"#;
        let result = parse_json(json).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.skipped, 5);
        assert_eq!(result.records[0].amount, 100.0);
        assert_eq!(result.records[0].description, "");
    }

    #[test]
    fn test_json_numeric_account_code_is_kept_as_text() {
        let json = r#"{"transactions": [
            {"date": "05/01/2025", "amount": 10, "movement_kind": "C", "account_code": 101}
        ]}"#;
        let result = parse_json(json).unwrap();
        assert_eq!(result.skipped, 0);
        assert_eq!(result.records[0].account_code.as_deref(), Some("101"));
    }

    #[test]
    fn test_parse_csv_comma() {
        let csv = "date,description,amount,movement_kind,account_code\n\
                   05/01/2025,Sale,100.00,CREDITO,REC-01\n\
                   06/01/2025,Rent,\"1,500.00\",DEBITO,DES-03\n\
                   07/01/2025,Odd,12,XYZ,DES-03\n\
                   08/01/2025,No code,5,D,\n";
        let result = parse_csv(csv).unwrap();
        assert_eq!(result.records.len(), 3);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.records[1].amount, 1500.0);
        assert_eq!(result.records[2].account_code, None);
    }

    #[test]
    fn test_parse_csv_semicolon_portuguese_headers() {
        let csv = "data;descricao;valor;tipo;conta\n\
                   05/01/2025;Venda;1.234,56;CRÉDITO;REC-01\n";
        let result = parse_csv(csv).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].amount, 1234.56);
        assert_eq!(result.records[0].movement_kind, MovementKind::Credit);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(get_for_file(Path::new("a/b.JSON")), Some(InputFormat::Json));
        assert_eq!(get_for_file(Path::new("x.csv")), Some(InputFormat::Csv));
        assert_eq!(get_for_file(Path::new("x.pdf")), None);
        assert_eq!(get_by_key("csv"), Some(InputFormat::Csv));
    }

    #[test]
    fn test_import_file_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.pdf");
        std::fs::write(&path, "x").unwrap();
        let err = import_file(&path, None).unwrap_err();
        assert!(matches!(err, CaixaError::UnknownFormat(_)));
    }
}
