use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use weather_core::{
    Config, Overrides, Units, WeatherQuery, config::env_api_key, provider::provider_from_config,
};

use crate::prompt;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Print current weather conditions for a city")]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    /// Defaults to `show`, prompting for the city.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// API key; takes precedence over the environment and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Unit system requested from the provider.
    #[arg(long, global = true)]
    pub units: Option<Units>,

    /// Request timeout in seconds.
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Fail on non-2xx responses instead of printing the provider's error body.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a city.
    Show {
        /// City name; prompted for when omitted.
        city: Option<String>,
    },

    /// Store the API key and preferences in the config file.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Show { city: None }) {
            Command::Show { city } => show(city, self.options).await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(city: Option<String>, options: GlobalOptions) -> anyhow::Result<()> {
    let config = Config::load()?;
    let overrides = Overrides {
        api_key: options.api_key,
        units: options.units,
        timeout_secs: options.timeout,
        strict_status: options.strict,
    };
    let provider = provider_from_config(&config, env_api_key(), overrides)
        .context("Failed to set up the weather client")?;

    let query = match city {
        Some(city) => WeatherQuery::from_input(&city),
        None => {
            eprintln!("\n*** Get Current Weather Conditions ***\n");
            WeatherQuery::from_input(&prompt::city()?)
        }
    };

    let weather = provider
        .fetch_weather(&query)
        .await
        .with_context(|| format!("Failed to fetch weather for '{}'", query.city))?;

    println!("{}", serde_json::to_string_pretty(&weather)?);
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = prompt::api_key(config.has_api_key())?;
    if let Some(api_key) = api_key {
        config.set_api_key(api_key);
    }
    config.units = Some(prompt::units(config.units.unwrap_or_default())?);

    let path = config.save()?;
    tracing::info!("Saved configuration to {}", path.display());
    println!("Configuration saved to {}", path.display());
    Ok(())
}
