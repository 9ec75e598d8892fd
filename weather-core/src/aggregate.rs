//! Fan-out/fan-in over a fixed set of temperature providers.
//!
//! Every provider runs in its own tokio task and reports exactly one
//! [`Outcome`] into a channel whose capacity equals the number of providers.
//! The aggregator averages the values if all of them succeed and returns the
//! first failure as soon as it arrives. Tasks that are still running at that
//! point are left alone; their late outcome lands in the (now closed) channel
//! and is dropped without ever blocking.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::mpsc;

use crate::{
    Config, ProviderError,
    provider::{ProviderId, TemperatureProvider, provider_from_config},
};

/// Result of one provider invocation within a single aggregation run.
#[derive(Debug)]
pub struct Outcome {
    pub provider: String,
    pub result: Result<f64, ProviderError>,
}

/// Ordered, non-empty, read-only collection of providers.
///
/// Cloning is cheap; one set is built at startup and shared by all requests.
#[derive(Debug, Clone)]
pub struct ProviderSet {
    providers: Arc<[Arc<dyn TemperatureProvider>]>,
}

impl ProviderSet {
    pub fn new(providers: Vec<Arc<dyn TemperatureProvider>>) -> Result<Self> {
        if providers.is_empty() {
            bail!("A provider set needs at least one provider");
        }
        Ok(Self { providers: providers.into() })
    }

    /// One provider per [`ProviderId`], all sharing an HTTP client that
    /// enforces the configured request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = http_client(config.request_timeout())?;
        let providers = ProviderId::all()
            .iter()
            .map(|id| provider_from_config(*id, config, &http))
            .collect();

        Self::new(providers)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder().timeout(timeout).build().context("Failed to build HTTP client")
}

/// Query every provider in parallel and average their answers.
///
/// Returns the first failure observed, in completion order, without waiting
/// for the providers that have not finished yet.
pub async fn aggregate(city: &str, providers: &ProviderSet) -> Result<f64, ProviderError> {
    let n = providers.len();
    let (tx, mut rx) = mpsc::channel::<Outcome>(n);
    let city: Arc<str> = Arc::from(city);

    for provider in providers.providers.iter() {
        let provider = Arc::clone(provider);
        let city = Arc::clone(&city);
        let reporter = Reporter::new(tx.clone(), provider.name());

        tokio::spawn(async move {
            let result = provider.temperature(&city).await;
            reporter.report(result);
        });
    }
    drop(tx);

    let mut sum = 0.0;
    for _ in 0..n {
        let Some(outcome) = rx.recv().await else {
            // Unreachable while every reporter delivers on drop.
            return Err(ProviderError::Aborted { provider: "aggregate".to_string() });
        };

        match outcome.result {
            Ok(kelvin) => {
                tracing::debug!(provider = %outcome.provider, kelvin, "provider succeeded");
                sum += kelvin;
            }
            Err(err) => {
                tracing::warn!(
                    provider = %outcome.provider,
                    error = %err,
                    city = %city,
                    "provider failed, aborting aggregation"
                );
                return Err(err);
            }
        }
    }

    Ok(sum / n as f64)
}

#[async_trait]
impl TemperatureProvider for ProviderSet {
    fn name(&self) -> &str {
        "aggregate"
    }

    async fn temperature(&self, city: &str) -> Result<f64, ProviderError> {
        aggregate(city, self).await
    }
}

/// Delivers a provider's single outcome.
///
/// If the task unwinds or is cancelled before reporting, the drop handler
/// delivers [`ProviderError::Aborted`] instead, so the aggregator always sees
/// one outcome per provider.
struct Reporter {
    tx: mpsc::Sender<Outcome>,
    provider: String,
    delivered: bool,
}

impl Reporter {
    fn new(tx: mpsc::Sender<Outcome>, provider: &str) -> Self {
        Self { tx, provider: provider.to_string(), delivered: false }
    }

    fn report(mut self, result: Result<f64, ProviderError>) {
        self.send(result);
    }

    fn send(&mut self, result: Result<f64, ProviderError>) {
        self.delivered = true;
        let outcome = Outcome { provider: std::mem::take(&mut self.provider), result };

        // Capacity equals the provider count and each reporter sends once, so
        // the only possible error is a closed channel after an early return.
        if let Err(mpsc::error::TrySendError::Closed(outcome)) = self.tx.try_send(outcome) {
            tracing::debug!(provider = %outcome.provider, "late outcome discarded");
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if !self.delivered {
            let provider = self.provider.clone();
            self.send(Err(ProviderError::Aborted { provider }));
        }
    }
}
