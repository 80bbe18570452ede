use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::model::GeocodeResult;

use super::{ProviderError, decode_json, execute_request};

pub const PROVIDER_NAME: &str = "nominatim";

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    format: &'a str,
    limit: u8,
}

#[derive(Debug, Deserialize)]
struct SearchMatch {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// First match wins; zero matches is `NotFound`.
pub fn fetch_geocode(
    client: &Client,
    endpoint: &str,
    user_agent: &str,
    place: &str,
) -> Result<GeocodeResult, ProviderError> {
    let query = SearchQuery {
        q: place,
        format: "json",
        limit: 1,
    };

    tracing::debug!(provider = PROVIDER_NAME, place, "geocode request");
    let body = execute_request(
        client
            .get(endpoint)
            .query(&query)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "application/json"),
    )?;
    parse_search_response(&body, place)
}

fn parse_search_response(body: &str, place: &str) -> Result<GeocodeResult, ProviderError> {
    let matches: Vec<SearchMatch> = decode_json(body, "geocode")?;

    let Some(first) = matches.into_iter().next() else {
        return Err(ProviderError::NotFound(place.to_string()));
    };

    Ok(GeocodeResult {
        latitude: parse_degrees(&first.lat, "lat")?,
        longitude: parse_degrees(&first.lon, "lon")?,
        display_name: first.display_name,
    })
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, ProviderError> {
    raw.trim().parse::<f64>().map_err(|_| {
        ProviderError::InvalidResponse(format!("geocode payload: {field} is not a number: '{raw}'"))
    })
}
