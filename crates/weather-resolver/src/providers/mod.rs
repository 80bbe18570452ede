use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::model::{AlertRecord, Coordinates, FallbackPayload, ForecastPeriod, GeocodeResult};

pub mod nominatim;
pub mod nws;
pub mod open_meteo;

#[cfg(test)]
pub(crate) mod test_support;

/// What the orchestrator can ask of the outside world. Every failure is
/// already collapsed to `None` by the time it crosses this seam.
pub trait ProviderApi {
    fn geocode(&self, place: &str) -> Option<GeocodeResult>;
    fn fetch_alerts(&self, region_code: &str) -> Option<Vec<AlertRecord>>;
    fn fetch_nws_forecast(&self, coords: Coordinates) -> Option<Vec<ForecastPeriod>>;
    fn fetch_open_meteo_forecast(&self, coords: Coordinates) -> Option<FallbackPayload>;
}

#[derive(Debug, Clone)]
pub struct HttpProviders {
    client: Client,
    config: RuntimeConfig,
}

impl HttpProviders {
    pub fn new(config: RuntimeConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        Ok(Self { client, config })
    }
}

impl ProviderApi for HttpProviders {
    fn geocode(&self, place: &str) -> Option<GeocodeResult> {
        available(
            nominatim::PROVIDER_NAME,
            nominatim::fetch_geocode(
                &self.client,
                &self.config.geocode_endpoint,
                &self.config.geocode_user_agent(),
                place,
            ),
        )
    }

    fn fetch_alerts(&self, region_code: &str) -> Option<Vec<AlertRecord>> {
        available(
            nws::PROVIDER_NAME,
            nws::fetch_alerts(&self.client, &self.config.nws_api_base, region_code),
        )
    }

    fn fetch_nws_forecast(&self, coords: Coordinates) -> Option<Vec<ForecastPeriod>> {
        available(
            nws::PROVIDER_NAME,
            nws::fetch_forecast(&self.client, &self.config.nws_api_base, coords),
        )
    }

    fn fetch_open_meteo_forecast(&self, coords: Coordinates) -> Option<FallbackPayload> {
        available(
            open_meteo::PROVIDER_NAME,
            open_meteo::fetch_forecast(&self.client, &self.config.open_meteo_endpoint, coords),
        )
    }
}

/// Drops the error after recording which kind of failure it was.
pub fn available<T>(provider: &'static str, result: Result<T, ProviderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            let error = error.with_provider(provider);
            tracing::warn!(
                provider,
                kind = %error.kind(),
                error = %error,
                "provider unavailable"
            );
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkFailure,
    ProviderError,
    MalformedResponse,
    NoData,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkFailure => "network_failure",
            Self::ProviderError => "provider_error",
            Self::MalformedResponse => "malformed_response",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("no data: {0}")]
    NotFound(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Transport(_) => FailureKind::NetworkFailure,
            ProviderError::Http { .. } => FailureKind::ProviderError,
            ProviderError::InvalidResponse(_) => FailureKind::MalformedResponse,
            ProviderError::NotFound(_) => FailureKind::NoData,
        }
    }

    pub fn with_provider(self, provider: &'static str) -> Self {
        match self {
            ProviderError::Transport(message) => {
                ProviderError::Transport(format!("{provider}: {message}"))
            }
            ProviderError::Http { status, message } => ProviderError::Http {
                status,
                message: format!("{provider}: {message}"),
            },
            ProviderError::InvalidResponse(message) => {
                ProviderError::InvalidResponse(format!("{provider}: {message}"))
            }
            ProviderError::NotFound(message) => {
                ProviderError::NotFound(format!("{provider}: {message}"))
            }
        }
    }
}

pub(crate) fn execute_request(request: RequestBuilder) -> Result<String, ProviderError> {
    let response = request
        .send()
        .map_err(|error| ProviderError::Transport(error.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|error| ProviderError::Transport(error.to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    Err(ProviderError::Http {
        status: status.as_u16(),
        message,
    })
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body)
        .map_err(|error| ProviderError::InvalidResponse(format!("{what} payload: {error}")))
}

fn extract_error_message(body: &str) -> Option<String> {
    const MAX_LEN: usize = 240;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let from_json = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|json| {
            for key in ["detail", "title", "reason", "message", "error", "description"] {
                if let Some(value) = json.get(key).and_then(Value::as_str) {
                    let message = value.trim();
                    if !message.is_empty() {
                        return Some(message.to_string());
                    }
                }
            }
            None
        });

    from_json.or_else(|| Some(trimmed.chars().take(MAX_LEN).collect()))
}
