use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{Config, ProviderId, ProviderSet, aggregate, model::kelvin_to_celsius};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Average temperature across weather providers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Show the averaged temperature for a city.
    Show {
        /// City name, e.g. "london".
        city: String,
    },

    /// Serve `GET /weather/{city}` over HTTP.
    Serve {
        /// Listen address; overrides `listen_addr` from the config file.
        #[arg(long)]
        listen: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city } => show(&city).await,
            Command::Serve { listen } => {
                let config = load_config()?;
                let addr = listen.unwrap_or_else(|| config.listen_addr().to_string());
                let providers = ProviderSet::from_config(&config)?;
                server::serve(&addr, providers).await
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env_overrides();

    for id in config.unconfigured_providers() {
        tracing::warn!(
            provider = %id,
            "no API key configured; run `weather configure {id}` or set {}",
            id.api_key_env_var()
        );
    }

    Ok(config)
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key for {id} must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let providers = ProviderSet::from_config(&config)?;

    let begin = Instant::now();
    let kelvin = aggregate(city, &providers).await?;

    println!(
        "{city}: {kelvin:.2} K ({:.2} °C), took {:?}",
        kelvin_to_celsius(kelvin),
        begin.elapsed()
    );
    Ok(())
}
