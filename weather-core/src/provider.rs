use crate::{
    Config, FetchError, WeatherQuery, WeatherResponse,
    config::{Overrides, Settings},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `query`, exactly as the provider returned them.
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherResponse, FetchError>;
}

/// Construct the provider from config, the environment's API key and CLI overrides.
pub fn provider_from_config(
    config: &Config,
    env_api_key: Option<String>,
    overrides: Overrides,
) -> Result<Box<dyn WeatherProvider>, FetchError> {
    let settings = Settings::resolve(config, env_api_key, overrides);
    let boxed: Box<dyn WeatherProvider> = Box::new(OpenWeatherProvider::new(settings)?);
    Ok(boxed)
}
