use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    ProviderError,
    provider::{get_json, require_api_key},
};

use super::TemperatureProvider;

const NAME: &str = "openweather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// OpenWeather current-weather endpoint. Requested in standard units, so
/// `main.temp` is already Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, http: Client) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
}

#[async_trait]
impl TemperatureProvider for OpenWeatherProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn temperature(&self, city: &str) -> Result<f64, ProviderError> {
        let api_key = require_api_key(NAME, self.api_key.as_deref())?;
        let url = format!("{}/data/2.5/weather", self.base_url);

        let request = self.http.get(url).query(&[("q", city), ("appid", api_key)]);
        let parsed: OwCurrentResponse = get_json(NAME, request).await?;

        let kelvin = parsed.main.temp;
        tracing::info!(provider = NAME, city, kelvin, "temperature received");
        Ok(kelvin)
    }
}
