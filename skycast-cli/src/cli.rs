use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use skycast_core::{
    AggregationEngine, Config, ProviderId, Query, Renderer, ResultCache, Units, locate,
};

use crate::{render::TablePresenter, sink::FileEventSink};

/// Attempt failures are appended here, in the working directory.
const LOG_FILE: &str = "skycast.log";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather CLI with provider fallback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    /// Celsius (metric).
    C,
    /// Fahrenheit (imperial).
    F,
}

impl From<UnitArg> for Units {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::C => Units::Metric,
            UnitArg::F => Units::Imperial,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key for a keyed provider.
    Configure {
        /// Provider short name, e.g. "openweather", "weatherapi" or "visualcrossing".
        provider: String,
    },

    /// Show weather for a place.
    Show {
        /// Place name; detected from your IP or prompted for when omitted.
        place: Option<String>,

        /// Temperature unit.
        #[arg(long, value_enum, default_value_t = UnitArg::C)]
        units: UnitArg,

        /// Include a 5-day forecast where the provider offers one.
        #[arg(long)]
        forecast: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { place, units, forecast } => show(place, units.into(), forecast).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if id == ProviderId::OpenMeteo {
        anyhow::bail!("open-meteo needs no API key; it is used automatically as a fallback.");
    }

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for {id}.");
    Ok(())
}

async fn show(place: Option<String>, units: Units, forecast: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    config.apply_env();

    let place = match place {
        Some(place) => place,
        None => match locate::detect_city().await {
            Some(city) => {
                println!("Using detected location: {city}");
                city
            }
            None => inquire::Text::new("Enter a place name:")
                .prompt()
                .context("Failed to read place name")?,
        },
    };

    let cache = ResultCache::open(ResultCache::default_path()?);
    let events = FileEventSink::new(PathBuf::from(LOG_FILE));
    let mut engine = AggregationEngine::from_config(&config, cache, Box::new(events));

    let query = Query::new(place, units, forecast);
    let result = engine.fetch(&query).await?;

    TablePresenter.render(&result, units, forecast);
    Ok(())
}
