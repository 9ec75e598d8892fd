use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    ProviderError,
    model::celsius_to_kelvin,
    provider::{get_json, require_api_key},
};

use super::TemperatureProvider;

const NAME: &str = "weatherapi";
const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

/// WeatherAPI.com current conditions. Reports Celsius, converted to Kelvin.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: Option<String>, http: Client) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl TemperatureProvider for WeatherApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn temperature(&self, city: &str) -> Result<f64, ProviderError> {
        let api_key = require_api_key(NAME, self.api_key.as_deref())?;
        let url = format!("{}/v1/current.json", self.base_url);

        let request = self.http.get(url).query(&[("key", api_key), ("q", city)]);
        let parsed: WaResponse = get_json(NAME, request).await?;

        let kelvin = celsius_to_kelvin(parsed.current.temp_c);
        tracing::info!(provider = NAME, city, kelvin, "temperature received");
        Ok(kelvin)
    }
}
