use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::{
    config::{Settings, StatusPolicy},
    error::{FetchError, truncate_body},
    model::{WeatherQuery, WeatherResponse},
};

use super::WeatherProvider;

/// Fetches current conditions from the OpenWeather `data/2.5/weather` endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    settings: Settings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// `<base>?appid=<key>&q=<city>&units=<units>`, with every value URL-encoded.
    pub fn request_url(&self, query: &WeatherQuery) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &self.settings.base_url,
            &[
                ("appid", self.settings.api_key.as_str()),
                ("q", query.city.as_str()),
                ("units", self.settings.units.as_str()),
            ],
        )
        .map_err(|err| FetchError::InvalidUrl {
            url: self.settings.base_url.clone(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherResponse, FetchError> {
        let url = self.request_url(query)?;
        let timeout = self.settings.timeout;

        // The URL carries the key, so only the city is logged.
        tracing::info!(city = %query.city, units = %self.settings.units, "Requesting current weather");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::from_transport(err, timeout))?;

        let status = res.status();
        tracing::debug!(%status, "OpenWeather responded");

        let body = res
            .bytes()
            .await
            .map_err(|err| FetchError::from_transport(err, timeout))?;

        if !status.is_success() {
            match self.settings.status_policy {
                StatusPolicy::Strict => {
                    return Err(FetchError::Status {
                        status,
                        body: truncate_body(&String::from_utf8_lossy(&body)),
                    });
                }
                StatusPolicy::PassThrough => {
                    tracing::warn!(%status, "OpenWeather returned an error status; passing body through");
                }
            }
        }

        // Bytes go to the parser untouched; invalid UTF-8 is a decode failure.
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            status,
            body: truncate_body(&String::from_utf8_lossy(&body)),
            source,
        })
    }
}
