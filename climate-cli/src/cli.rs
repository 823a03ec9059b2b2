use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use climate_core::{
    ClimateAnalyzer, Config, DateRange, ExportDocument, ExportFormat,
    export::suggested_file_name,
    provider::{data_source_from_config, geocoder_from_config},
    sanitize::validate_location_name,
};
use tracing::info;

use crate::report;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climate", version, about = "Historical climate hazard analysis")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze daily history for a place.
    Analyze {
        /// Place name, e.g. "Nairobi" or "Paris, France".
        location: String,

        /// First day of the window (YYYY-MM-DD). Requires --end.
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// Last day of the window (YYYY-MM-DD). Requires --start.
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,

        /// Years of history ending one year ago; ignored with --start/--end.
        #[arg(long, conflicts_with_all = ["start", "end"])]
        years: Option<u32>,

        /// Also write the analysis to a file: "json" or "csv".
        #[arg(long)]
        export: Option<String>,

        /// Export path; defaults to a generated name in the current directory.
        #[arg(long, short, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Set the User-Agent and default history length interactively.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Analyze { location, start, end, years, export, output } => {
                let export = export.as_deref().map(str::parse::<ExportFormat>).transpose()?;
                analyze(&location, start.zip(end), years, export, output).await
            }
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn analyze(
    location: &str,
    window: Option<(NaiveDate, NaiveDate)>,
    years: Option<u32>,
    export: Option<ExportFormat>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let name = validate_location_name(location)?;
    let config = Config::load()?;

    let range = match window {
        Some((start, end)) => DateRange::new(start, end)?,
        None => {
            let years = match years {
                Some(y) => y,
                None => config.history_years()?,
            };
            DateRange::trailing_years(Utc::now().date_naive(), years)?
        }
    };

    let geocoder = geocoder_from_config(&config)?;
    let place = geocoder
        .geocode(&name)
        .await
        .with_context(|| format!("Could not resolve location '{name}'"))?;
    info!(name = %place.name, lat = place.latitude, lon = place.longitude, "Resolved location");

    let analyzer = ClimateAnalyzer::new(data_source_from_config(&config)?);
    let result = analyzer
        .analyze_location(&place, &range)
        .await
        .context("Failed to fetch climate data")?;

    print!("{}", report::render(&result, &range));

    if let Some(format) = export {
        let now = Utc::now();
        let document = ExportDocument::new(&result, range, now);
        let path =
            output.unwrap_or_else(|| PathBuf::from(suggested_file_name(&place, format, now)));

        fs::write(&path, document.render(format)?)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        println!("\nExported {} to {}", format, path.display());
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let user_agent = inquire::Text::new("User-Agent sent to remote services:")
        .with_default(&config.user_agent())
        .with_help_message("Nominatim asks for an app name and contact, e.g. `my-app (me@example.com)`")
        .prompt()?;

    let years = inquire::CustomType::<u32>::new("Years of history to analyze by default:")
        .with_default(config.history_years().unwrap_or(climate_core::config::DEFAULT_HISTORY_YEARS))
        .with_error_message("Please enter a whole number of years")
        .prompt()?;

    if years == 0 {
        bail!("History must cover at least one year.");
    }

    config.user_agent = Some(user_agent);
    config.history_years = Some(years);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
