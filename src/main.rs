mod aggregate;
mod analysis;
mod chart;
mod cli;
mod enrich;
mod error;
mod fmt;
mod importer;
mod indicators;
mod locale;
mod models;
mod score;
mod settings;
mod statement;

use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG > --verbose > warn, so report output on stdout stays clean
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("caixa=debug")
    } else {
        EnvFilter::new("caixa=warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let result = match cli.command {
        Commands::Init {
            locale,
            chart,
            currency,
            write_chart,
        } => cli::init::run(locale, chart, currency, write_chart),
        Commands::Chart { chart, format } => cli::chart::run(chart, &format),
        Commands::Report { command } => cli::report::dispatch(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
