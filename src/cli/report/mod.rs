pub mod json;
pub mod text;

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use tracing::debug;

use crate::analysis::{analyze_document, Analysis, AnalysisOptions, Period};
use crate::cli::{emit, resolve_chart, resolve_locale, OutputFormat, ReportArgs};
use crate::importer::import_file;
use crate::settings::load_settings;

use self::text::TextStyle;
use super::ReportCommands;

fn parse_period_date(flag: &str, raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {flag} date '{raw}' (expected YYYY-MM-DD)"))
}

pub(crate) fn resolve_period(
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> anyhow::Result<Option<Period>> {
    match (from_date, to_date) {
        (None, None) => Ok(None),
        (Some(_), None) => bail!("--from requires --to"),
        (None, Some(_)) => bail!("--to requires --from"),
        (Some(from), Some(to)) => {
            let from = parse_period_date("--from", from)?;
            let to = parse_period_date("--to", to)?;
            Ok(Some(Period::new(from, to)?))
        }
    }
}

/// Result of reading and analyzing one input file.
struct Prepared {
    analysis: Analysis,
    skipped: usize,
    style: TextStyle,
}

fn prepare(args: &ReportArgs) -> anyhow::Result<Prepared> {
    let settings = load_settings();
    let locale = resolve_locale(args.locale.as_deref(), &settings)?;
    let period = resolve_period(args.from_date.as_deref(), args.to_date.as_deref())?;
    let doc = resolve_chart(args.chart.as_deref(), &settings)?;

    let imported = import_file(Path::new(&args.file), args.input_format.as_deref())
        .with_context(|| format!("Cannot read transactions from {}", args.file))?;
    debug!(
        file = %args.file,
        records = imported.records.len(),
        skipped = imported.skipped,
        "input parsed"
    );

    let options = AnalysisOptions { locale, period };
    let outcome = analyze_document(&imported.records, &doc, &options);
    if let Some(failure) = outcome.failure {
        return Err(anyhow!(failure));
    }

    Ok(Prepared {
        analysis: outcome.analysis,
        skipped: imported.skipped,
        style: TextStyle {
            locale,
            currency_symbol: settings.currency_symbol,
        },
    })
}

pub(crate) fn render(cmd: &ReportCommands, format: OutputFormat) -> anyhow::Result<String> {
    let Prepared {
        analysis,
        skipped,
        style,
    } = prepare(cmd.args())?;

    let content = match (format, cmd) {
        (OutputFormat::Text, ReportCommands::Transactions(_)) => {
            text::format_transactions(&analysis, skipped, &style)
        }
        (OutputFormat::Text, ReportCommands::Indicators(_)) => {
            text::format_indicators(&analysis.indicators, &style)
        }
        (OutputFormat::Text, ReportCommands::Score(_)) => text::format_score(&analysis.score, &style),
        (OutputFormat::Text, ReportCommands::Statement(_)) => {
            text::format_statement(&analysis.statement, &style)
        }
        (OutputFormat::Text, ReportCommands::All(_)) => text::format_all(&analysis, skipped, &style),
        (OutputFormat::Json, ReportCommands::Transactions(_)) => json::transactions(&analysis, skipped)?,
        (OutputFormat::Json, ReportCommands::Indicators(_)) => json::indicators(&analysis)?,
        (OutputFormat::Json, ReportCommands::Score(_)) => json::score(&analysis)?,
        (OutputFormat::Json, ReportCommands::Statement(_)) => json::statement(&analysis)?,
        (OutputFormat::Json, ReportCommands::All(_)) => json::all(&analysis, skipped)?,
    };
    Ok(content)
}

pub fn dispatch(cmd: ReportCommands) -> anyhow::Result<()> {
    let args = cmd.args();
    let format = OutputFormat::parse(&args.format)?;
    debug!(report = cmd.report_name(), ?format, "rendering report");
    let content = render(&cmd, format)?;
    emit(&content, args.output.as_deref())
}
