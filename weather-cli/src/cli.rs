use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, Coordinate, FileStore, PipelineOutcome, ViewModel, WeatherCache, WeatherPipeline,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and units.
    Configure,

    /// Show the cached weather, then refresh it for a coordinate.
    Show {
        /// Latitude in degrees, -90..=90.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees, -180..=180.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Treat the network as unavailable; only the cached weather is shown.
        #[arg(long)]
        offline: bool,
    },

    /// Show the last cached weather without touching the network.
    Cached,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, offline } => show(lat, lon, !offline).await,
            Command::Cached => cached(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Text::new("Units:")
        .with_default(&config.units)
        .with_help_message("Passed to OpenWeather as-is, e.g. metric or imperial")
        .prompt()
        .context("Failed to read units")?;

    config.set_api_key(api_key.trim().to_string());
    config.units = units.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(lat: f64, lon: f64, network_available: bool) -> anyhow::Result<()> {
    let coord = Coordinate::new(lat, lon)?;
    let config = Config::load()?;
    let pipeline = WeatherPipeline::from_config(&config, Box::new(system_locale))?;

    let locale = system_locale();
    if let Some(view) = pipeline.render_from_cache(&locale) {
        print_view("Cached", &view);
    }

    let outcome = pipeline.refresh(coord, network_available).await;
    tracing::debug!(refreshed = outcome.is_success(), "refresh finished");
    match outcome {
        PipelineOutcome::Succeeded(view) => print_view("Current", &view),
        PipelineOutcome::Failed(failure) => eprintln!("{}", failure.user_message()),
    }

    Ok(())
}

fn cached() -> anyhow::Result<()> {
    let config = Config::load()?;
    let cache = WeatherCache::new(Box::new(FileStore::new(config.cache_dir()?)));

    match cache.load() {
        Some(report) => print_view("Cached", &ViewModel::build(&report, &system_locale())),
        None => println!("No cached weather yet. Run `weather show --lat <LAT> --lon <LON>`."),
    }

    Ok(())
}

fn print_view(title: &str, view: &ViewModel) {
    println!("{}", render::render(title, view));
}

/// Country code of the first non-empty of `LC_ALL`, `LC_MESSAGES`, `LANG`.
fn system_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .map(|value| country_code(&value).to_string())
        .unwrap_or_default()
}

/// Territory of a POSIX locale: `"en_US.UTF-8"` gives `"US"`, `"C"` gives `""`.
fn country_code(posix_locale: &str) -> &str {
    let name = posix_locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default();
    name.split_once(['_', '-'])
        .map(|(_, territory)| territory)
        .unwrap_or_default()
}
