pub mod chart;
pub mod init;
pub mod report;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};

use crate::chart::{default_document, load_document, ChartDocument};
use crate::locale::Locale;
use crate::settings::{shellexpand_path, Settings};

#[derive(Parser)]
#[command(
    name = "caixa",
    version,
    about = "Cash-flow indicators and financial-health scoring for small businesses."
)]
pub struct Cli {
    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write ~/.config/caixa/settings.json.
    Init {
        /// Report language: pt-br or en
        #[arg(long)]
        locale: Option<String>,
        /// Chart-of-accounts JSON document used by default
        #[arg(long)]
        chart: Option<String>,
        /// Currency symbol for text reports (default: R$)
        #[arg(long)]
        currency: Option<String>,
        /// Also export the built-in chart of accounts to this path
        #[arg(long = "write-chart")]
        write_chart: Option<String>,
    },
    /// List the chart of accounts.
    Chart {
        /// Chart-of-accounts JSON document (default: settings, then built-in)
        #[arg(long)]
        chart: Option<String>,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Analyze a transaction file.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Transaction file (.json or .csv)
    pub file: String,
    /// Chart-of-accounts JSON document (default: settings, then built-in)
    #[arg(long)]
    pub chart: Option<String>,
    /// Report language: pt-br or en
    #[arg(long)]
    pub locale: Option<String>,
    /// Period start: YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// Period end: YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<String>,
    /// Input format key (json, csv); detected from the extension when omitted
    #[arg(long = "input-format")]
    pub input_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ReportCommands {
    /// Enriched transactions with their chart classification.
    Transactions(ReportArgs),
    /// The nine cash-flow indicators.
    Indicators(ReportArgs),
    /// Financial-health score, class and breakdown.
    Score(ReportArgs),
    /// Direct-method cash-flow statement by month.
    Statement(ReportArgs),
    /// Every report above in one document.
    All(ReportArgs),
}

impl ReportCommands {
    pub fn args(&self) -> &ReportArgs {
        match self {
            Self::Transactions(a)
            | Self::Indicators(a)
            | Self::Score(a)
            | Self::Statement(a)
            | Self::All(a) => a,
        }
    }

    pub fn report_name(&self) -> &'static str {
        match self {
            Self::Transactions(_) => "transactions",
            Self::Indicators(_) => "indicators",
            Self::Score(_) => "score",
            Self::Statement(_) => "statement",
            Self::All(_) => "all",
        }
    }
}

/// Text or JSON rendering for report-style commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("Unknown format '{other}' (expected text or json)")),
        }
    }
}

pub(crate) fn resolve_locale(flag: Option<&str>, settings: &Settings) -> anyhow::Result<Locale> {
    match flag {
        Some(raw) => {
            Locale::parse(raw).ok_or_else(|| anyhow!("Unknown locale '{raw}' (expected pt-br or en)"))
        }
        None => Ok(settings.locale),
    }
}

/// `--chart` wins over the settings file; neither means the built-in chart.
pub(crate) fn resolve_chart(flag: Option<&str>, settings: &Settings) -> anyhow::Result<ChartDocument> {
    let path = flag.or(settings.chart_path.as_deref());
    match path {
        Some(p) => {
            let path = PathBuf::from(shellexpand_path(p));
            load_document(&path)
                .with_context(|| format!("Cannot load chart of accounts from {}", path.display()))
        }
        None => Ok(default_document()),
    }
}

/// Write `content` to `output` (creating parent directories) or print it.
pub(crate) fn emit(content: &str, output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let p = PathBuf::from(path);
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Cannot create {}", parent.display()))?;
                }
            }
            std::fs::write(&p, content).with_context(|| format!("Cannot write {}", p.display()))?;
            println!("Wrote {}", p.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
