use comfy_table::{Cell, Table};

use crate::chart::ChartOfAccounts;
use crate::cli::{emit, resolve_chart, OutputFormat};
use crate::settings::load_settings;

pub fn run(chart: Option<String>, format: &str) -> anyhow::Result<()> {
    let format = OutputFormat::parse(format)?;
    let settings = load_settings();
    let doc = resolve_chart(chart.as_deref(), &settings)?;
    let chart = ChartOfAccounts::from_document(&doc)?;

    let content = match format {
        OutputFormat::Text => format_chart(&chart),
        OutputFormat::Json => {
            let accounts: Vec<_> = chart.accounts().collect();
            serde_json::to_string_pretty(&accounts)?
        }
    };
    emit(&content, None)
}

pub fn format_chart(chart: &ChartOfAccounts) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Account", "Category", "Activity"]);
    for entry in chart.accounts() {
        table.add_row(vec![
            Cell::new(&entry.code),
            Cell::new(&entry.name),
            Cell::new(format!("{} {}", entry.synthetic_code, entry.synthetic_name)),
            Cell::new(entry.activity_type),
        ]);
    }
    format!("Chart of accounts ({} analytic accounts)\n{table}", chart.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_chart_lists_accounts() {
        let out = format_chart(&ChartOfAccounts::builtin());
        assert!(out.contains("FIN-05"));
        assert!(out.contains("Personal withdrawals"));
        assert!(out.contains("OPERATING"));
        assert!(out.starts_with("Chart of accounts (24 analytic accounts)"));
    }
}
