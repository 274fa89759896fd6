use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaixaError, Result};
use crate::models::ActivityType;

pub const UNCLASSIFIED_CODE: &str = "NE";
pub const UNCLASSIFIED_NAME: &str = "Unclassified";

/// Owner withdrawals for personal use. Drives the withdrawal indicators.
pub const PERSONAL_WITHDRAWAL_CODE: &str = "FIN-05";

// ---------------------------------------------------------------------------
// Document (external shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDocument {
    pub categories: Vec<SyntheticCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticCategory {
    pub code: String,
    pub name: String,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub accounts: Vec<AnalyticAccount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticAccount {
    pub code: String,
    pub name: String,
}

// (code, name, activity_type)
const DEFAULT_SYNTHETICS: &[(&str, &str, ActivityType)] = &[
    ("REC", "Operating revenue", ActivityType::Operating),
    ("DES", "Operating expenses", ActivityType::Operating),
    ("INV", "Investments", ActivityType::Investing),
    ("FIN", "Financing", ActivityType::Financing),
    ("NEU", "Internal movements", ActivityType::Neutral),
];

// (code, name, synthetic_code)
const DEFAULT_ACCOUNTS: &[(&str, &str, &str)] = &[
    ("REC-01", "Sales of goods", "REC"),
    ("REC-02", "Services rendered", "REC"),
    ("REC-03", "Card receivables", "REC"),
    ("REC-04", "Other operating income", "REC"),
    ("DES-01", "Suppliers", "DES"),
    ("DES-02", "Payroll and benefits", "DES"),
    ("DES-03", "Rent", "DES"),
    ("DES-04", "Utilities and telecom", "DES"),
    ("DES-05", "Taxes and fees", "DES"),
    ("DES-06", "Bank charges", "DES"),
    ("DES-07", "Marketing", "DES"),
    ("DES-08", "Professional services", "DES"),
    ("DES-09", "Other operating expenses", "DES"),
    ("INV-01", "Equipment purchases", "INV"),
    ("INV-02", "Vehicles", "INV"),
    ("INV-03", "Software and intangibles", "INV"),
    ("INV-04", "Sale of fixed assets", "INV"),
    ("FIN-01", "Loans received", "FIN"),
    ("FIN-02", "Loan repayments", "FIN"),
    ("FIN-03", "Interest paid", "FIN"),
    ("FIN-04", "Owner capital contributions", "FIN"),
    (PERSONAL_WITHDRAWAL_CODE, "Personal withdrawals", "FIN"),
    ("NEU-01", "Transfers between own accounts", "NEU"),
    ("NEU-02", "Cash-management applications and redemptions", "NEU"),
];

pub fn default_document() -> ChartDocument {
    let categories = DEFAULT_SYNTHETICS
        .iter()
        .map(|(code, name, activity_type)| SyntheticCategory {
            code: code.to_string(),
            name: name.to_string(),
            activity_type: *activity_type,
            accounts: DEFAULT_ACCOUNTS
                .iter()
                .filter(|(_, _, parent)| parent == code)
                .map(|(code, name, _)| AnalyticAccount {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        })
        .collect();
    ChartDocument { categories }
}

pub fn load_document(path: &Path) -> Result<ChartDocument> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountEntry {
    pub code: String,
    pub name: String,
    pub synthetic_code: String,
    pub synthetic_name: String,
    pub activity_type: ActivityType,
}

/// Immutable analytic-code index built once per run.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    entries: BTreeMap<String, AccountEntry>,
    sentinel: AccountEntry,
}

impl ChartOfAccounts {
    pub fn from_document(doc: &ChartDocument) -> Result<Self> {
        validate(doc)?;
        Ok(Self::build(doc))
    }

    #[allow(dead_code)]
    pub fn builtin() -> Self {
        Self::build(&default_document())
    }

    fn build(doc: &ChartDocument) -> Self {
        let mut entries = BTreeMap::new();
        for cat in &doc.categories {
            for acct in &cat.accounts {
                entries.insert(
                    acct.code.trim().to_string(),
                    AccountEntry {
                        code: acct.code.trim().to_string(),
                        name: acct.name.clone(),
                        synthetic_code: cat.code.clone(),
                        synthetic_name: cat.name.clone(),
                        activity_type: cat.activity_type,
                    },
                );
            }
        }
        Self {
            entries,
            sentinel: AccountEntry {
                code: UNCLASSIFIED_CODE.to_string(),
                name: UNCLASSIFIED_NAME.to_string(),
                synthetic_code: UNCLASSIFIED_CODE.to_string(),
                synthetic_name: UNCLASSIFIED_NAME.to_string(),
                activity_type: ActivityType::Neutral,
            },
        }
    }

    pub fn get(&self, code: &str) -> Option<&AccountEntry> {
        self.entries.get(code.trim())
    }

    /// Never fails: missing or unknown codes resolve to the neutral sentinel.
    pub fn lookup(&self, code: Option<&str>) -> &AccountEntry {
        code.and_then(|c| self.get(c)).unwrap_or(&self.sentinel)
    }

    pub fn is_sentinel(&self, entry: &AccountEntry) -> bool {
        std::ptr::eq(entry, &self.sentinel)
    }

    /// Analytic accounts sorted by code.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn validate(doc: &ChartDocument) -> Result<()> {
    if doc.categories.is_empty() {
        return Err(CaixaError::Chart("no synthetic categories".into()));
    }
    let mut seen = HashSet::new();
    for cat in &doc.categories {
        if cat.code.trim().is_empty() {
            return Err(CaixaError::Chart(format!(
                "synthetic category '{}' has an empty code",
                cat.name
            )));
        }
        for acct in &cat.accounts {
            let code = acct.code.trim();
            if code.is_empty() {
                return Err(CaixaError::Chart(format!(
                    "account '{}' in {} has an empty code",
                    acct.name, cat.code
                )));
            }
            if code == UNCLASSIFIED_CODE {
                return Err(CaixaError::Chart(format!(
                    "'{UNCLASSIFIED_CODE}' is reserved for unclassified transactions"
                )));
            }
            if !seen.insert(code.to_string()) {
                return Err(CaixaError::Chart(format!("duplicate account code '{code}'")));
            }
        }
    }
    Ok(())
}
