//! National Weather Service client: alerts by area, forecasts by point.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::NWS_USER_AGENT;
use crate::model::{AlertRecord, Coordinates, ForecastPeriod};

use super::{ProviderError, decode_json, execute_request};

pub const PROVIDER_NAME: &str = "nws";
const GEO_JSON: &str = "application/geo+json";

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    features: Option<Vec<AlertFeature>>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    properties: Option<AlertRecord>,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: Option<ForecastProperties>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Option<Vec<ForecastPeriod>>,
}

/// Active alerts in provider order. An absent `features` field is malformed;
/// an empty list is a valid "nothing active" answer.
pub fn fetch_alerts(
    client: &Client,
    api_base: &str,
    region_code: &str,
) -> Result<Vec<AlertRecord>, ProviderError> {
    let url = format!("{api_base}/alerts/active/area/{region_code}");
    let body = execute_request(nws_get(client, &url))?;
    parse_alerts_response(&body)
}

/// Points lookup, then the forecast URL it names. Either step failing fails
/// the whole fetch.
pub fn fetch_forecast(
    client: &Client,
    api_base: &str,
    coords: Coordinates,
) -> Result<Vec<ForecastPeriod>, ProviderError> {
    let points_url = format!("{api_base}/points/{},{}", coords.latitude, coords.longitude);
    let points_body = execute_request(nws_get(client, &points_url))?;
    let forecast_url = parse_points_response(&points_body)?;

    let forecast_body = execute_request(nws_get(client, &forecast_url))?;
    parse_forecast_response(&forecast_body)
}

fn nws_get(client: &Client, url: &str) -> RequestBuilder {
    tracing::debug!(provider = PROVIDER_NAME, url, "request");
    client
        .get(url)
        .header(USER_AGENT, NWS_USER_AGENT)
        .header(ACCEPT, GEO_JSON)
}

fn parse_alerts_response(body: &str) -> Result<Vec<AlertRecord>, ProviderError> {
    let payload: AlertsResponse = decode_json(body, "alerts")?;
    let features = payload.features.ok_or_else(|| {
        ProviderError::InvalidResponse("alerts payload: missing features".to_string())
    })?;

    Ok(features
        .into_iter()
        .map(|feature| feature.properties.unwrap_or_default())
        .collect())
}

fn parse_points_response(body: &str) -> Result<String, ProviderError> {
    let payload: PointsResponse = decode_json(body, "points")?;
    payload
        .properties
        .and_then(|properties| properties.forecast)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            ProviderError::InvalidResponse("points payload: missing forecast url".to_string())
        })
}

fn parse_forecast_response(body: &str) -> Result<Vec<ForecastPeriod>, ProviderError> {
    let payload: ForecastResponse = decode_json(body, "forecast")?;
    payload
        .properties
        .and_then(|properties| properties.periods)
        .ok_or_else(|| {
            ProviderError::InvalidResponse("forecast payload: missing periods".to_string())
        })
}
