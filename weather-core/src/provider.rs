use crate::{
    Config, ProviderError,
    provider::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod openweather;
pub mod weatherapi;

/// Key value shipped in sample configs; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your-key-here";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }

    /// Environment variable that overrides the stored key, e.g. `WEATHER_OPENWEATHER_API_KEY`.
    pub fn api_key_env_var(&self) -> String {
        format!("WEATHER_{}_API_KEY", self.as_str().to_uppercase())
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// A source that can answer "how warm is it in this city", in Kelvin.
///
/// Implementations hold only construction-time configuration and must be
/// safe to call concurrently, both with themselves and with other providers.
#[async_trait]
pub trait TemperatureProvider: Send + Sync + Debug {
    fn name(&self) -> &str;

    async fn temperature(&self, city: &str) -> Result<f64, ProviderError>;
}

/// Construct a provider for `id`, sharing the given HTTP client.
///
/// A provider without an API key is still returned; it fails on every call
/// with [`ProviderError::MissingApiKey`].
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    http: &Client,
) -> Arc<dyn TemperatureProvider> {
    let api_key = config.provider_api_key(id).map(str::to_owned);

    match id {
        ProviderId::OpenWeather => Arc::new(OpenWeatherProvider::new(api_key, http.clone())),
        ProviderId::WeatherApi => Arc::new(WeatherApiProvider::new(api_key, http.clone())),
    }
}

/// Return the key if it is usable, otherwise the `MissingApiKey` failure.
pub(crate) fn require_api_key<'a>(
    provider: &str,
    api_key: Option<&'a str>,
) -> Result<&'a str, ProviderError> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
        _ => Err(ProviderError::MissingApiKey { provider: provider.to_string() }),
    }
}

/// Send a GET request and decode a JSON body, mapping each failure stage
/// onto the matching [`ProviderError`] variant.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let transport =
        |source: reqwest::Error| ProviderError::Transport { provider: provider.to_string(), source };

    let res = request.send().await.map_err(transport)?;
    let status = res.status();
    let body = res.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|source| ProviderError::Decode { provider: provider.to_string(), source })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
