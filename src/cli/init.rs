use std::path::PathBuf;

use anyhow::{anyhow, Context};
use tracing::debug;

use crate::chart::default_document;
use crate::locale::Locale;
use crate::settings::{load_settings, save_settings, settings_file_exists, settings_path, shellexpand_path};

pub fn run(
    locale: Option<String>,
    chart: Option<String>,
    currency: Option<String>,
    write_chart: Option<String>,
) -> anyhow::Result<()> {
    let existed = settings_file_exists();
    let mut settings = load_settings();

    if let Some(raw) = locale {
        settings.locale = Locale::parse(&raw)
            .ok_or_else(|| anyhow!("Unknown locale '{raw}' (expected pt-br or en)"))?;
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }

    if let Some(path) = write_chart {
        let p = PathBuf::from(&path);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&default_document())?;
        std::fs::write(&p, format!("{json}\n"))
            .with_context(|| format!("Cannot write {}", p.display()))?;
        println!("Wrote built-in chart of accounts to {}", p.display());
        // A freshly exported chart becomes the default unless --chart says otherwise.
        if chart.is_none() {
            settings.chart_path = Some(shellexpand_path(&path));
        }
    }
    if let Some(path) = chart {
        settings.chart_path = Some(shellexpand_path(&path));
    }

    save_settings(&settings)?;
    debug!(path = %settings_path().display(), existed, "settings saved");

    let verb = if existed { "Updated" } else { "Created" };
    println!("{verb} {}", settings_path().display());
    println!("  locale:   {}", settings.locale.key());
    println!("  currency: {}", settings.currency_symbol);
    println!(
        "  chart:    {}",
        settings.chart_path.as_deref().unwrap_or("built-in")
    );
    Ok(())
}
