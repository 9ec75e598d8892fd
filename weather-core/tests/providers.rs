//! Built-in providers and the aggregator driven against a local mock backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use weather_core::{
    ProviderError, ProviderSet, TemperatureProvider, aggregate,
    provider::{openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};

mod common;

const OPENWEATHER_OK: &str = r#"{"name":"London","dt":1700000000,"main":{"temp":280.0,"feels_like":278.1,"humidity":81}}"#;
const WEATHERAPI_OK: &str = r#"{"location":{"name":"London","country":"UK"},"current":{"temp_c":16.85}}"#;

fn openweather(base_url: String) -> OpenWeatherProvider {
    OpenWeatherProvider::new(Some("OPEN_KEY".into()), Client::new()).with_base_url(base_url)
}

fn weatherapi(base_url: String) -> WeatherApiProvider {
    WeatherApiProvider::new(Some("WA_KEY".into()), Client::new()).with_base_url(base_url)
}

#[tokio::test]
async fn openweather_reads_kelvin_and_sends_key() {
    let backend = common::start_mock_backend(200, OPENWEATHER_OK, Duration::ZERO).await;

    let temp = openweather(backend.base_url()).temperature("london").await.unwrap();
    assert_eq!(temp, 280.0);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /data/2.5/weather?"));
    assert!(requests[0].contains("q=london"));
    assert!(requests[0].contains("appid=OPEN_KEY"));
}

#[tokio::test]
async fn weatherapi_converts_celsius_to_kelvin() {
    let backend = common::start_mock_backend(200, WEATHERAPI_OK, Duration::ZERO).await;

    let temp = weatherapi(backend.base_url()).temperature("london").await.unwrap();
    assert!((temp - 290.0).abs() < 1e-9);

    let requests = backend.requests();
    assert!(requests[0].starts_with("GET /v1/current.json?"));
    assert!(requests[0].contains("key=WA_KEY"));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let backend =
        common::start_mock_backend(401, r#"{"cod":401,"message":"Invalid API key"}"#, Duration::ZERO)
            .await;

    let err = openweather(backend.base_url()).temperature("london").await.unwrap_err();
    match &err {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_shape_is_a_decode_failure() {
    let backend = common::start_mock_backend(200, r#"{"error":"nope"}"#, Duration::ZERO).await;

    let err = weatherapi(backend.base_url()).temperature("london").await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let err = openweather("http://127.0.0.1:1".into()).temperature("london").await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }));
}

#[tokio::test]
async fn client_timeout_bounds_a_slow_backend() {
    let backend = common::start_mock_backend(200, OPENWEATHER_OK, Duration::from_secs(5)).await;
    let http = weather_core::aggregate::http_client(Duration::from_millis(200)).unwrap();
    let provider =
        OpenWeatherProvider::new(Some("OPEN_KEY".into()), http).with_base_url(backend.base_url());

    let started = std::time::Instant::now();
    let err = provider.temperature("london").await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport { .. }));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn aggregate_averages_both_backends() {
    let ow = common::start_mock_backend(200, OPENWEATHER_OK, Duration::ZERO).await;
    let wa = common::start_mock_backend(200, WEATHERAPI_OK, Duration::ZERO).await;

    let providers = ProviderSet::new(vec![
        Arc::new(openweather(ow.base_url())),
        Arc::new(weatherapi(wa.base_url())),
    ])
    .unwrap();

    let temp = aggregate("london", &providers).await.unwrap();
    assert!((temp - 285.0).abs() < 1e-9);
}

#[tokio::test]
async fn aggregate_surfaces_missing_credential_promptly() {
    let slow = common::start_mock_backend(200, OPENWEATHER_OK, Duration::from_secs(5)).await;

    let providers = ProviderSet::new(vec![
        Arc::new(openweather(slow.base_url())),
        Arc::new(WeatherApiProvider::new(None, Client::new())),
    ])
    .unwrap();

    let started = std::time::Instant::now();
    let err = aggregate("london", &providers).await.unwrap_err();

    assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    assert!(err.to_string().contains("weatherapi"));
    assert!(started.elapsed() < Duration::from_secs(3));
}
