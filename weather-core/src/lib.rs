//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider abstraction and the OpenWeather fetcher
//! - The query model and the request error taxonomy
//!
//! Responses are kept as raw JSON; nothing here interprets weather data.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use config::{Config, Overrides, Settings, StatusPolicy};
pub use error::FetchError;
pub use model::{DEFAULT_CITY, Units, WeatherQuery, WeatherResponse};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
