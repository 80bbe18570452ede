use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::model::{Coordinates, CurrentWeather, DailyForecastPoint, FallbackPayload};

use crate::lenient;

use super::{ProviderError, decode_json, execute_request};

pub const PROVIDER_NAME: &str = "open_meteo";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,wind_direction_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";
const FORECAST_DAYS: u8 = 3;

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    current_weather: bool,
    hourly: &'a str,
    daily: &'a str,
    timezone: &'a str,
    forecast_days: u8,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<ForecastCurrent>,
    #[serde(default)]
    daily: Option<ForecastDaily>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastCurrent {
    #[serde(deserialize_with = "lenient::number")]
    temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    windspeed: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    winddirection: Option<f64>,
    #[serde(deserialize_with = "lenient::code")]
    weathercode: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ForecastDaily {
    #[serde(deserialize_with = "lenient::text_list")]
    time: Vec<Option<String>>,
    #[serde(deserialize_with = "lenient::number_list")]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(deserialize_with = "lenient::number_list")]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(deserialize_with = "lenient::code_list")]
    weathercode: Vec<Option<i32>>,
}

pub fn fetch_forecast(
    client: &Client,
    endpoint: &str,
    coords: Coordinates,
) -> Result<FallbackPayload, ProviderError> {
    let query = ForecastQuery {
        latitude: coords.latitude,
        longitude: coords.longitude,
        current_weather: true,
        hourly: HOURLY_FIELDS,
        daily: DAILY_FIELDS,
        timezone: "auto",
        forecast_days: FORECAST_DAYS,
    };

    tracing::debug!(
        provider = PROVIDER_NAME,
        latitude = coords.latitude,
        longitude = coords.longitude,
        "forecast request"
    );
    let body = execute_request(client.get(endpoint).query(&query))?;
    parse_forecast_response(&body)
}

fn parse_forecast_response(body: &str) -> Result<FallbackPayload, ProviderError> {
    let payload: ForecastResponse = decode_json(body, "forecast")?;
    if payload.current_weather.is_none() && payload.daily.is_none() {
        return Err(ProviderError::InvalidResponse(
            "forecast payload: missing current_weather and daily".to_string(),
        ));
    }

    let current_weather = payload.current_weather.unwrap_or_default();
    let current = CurrentWeather {
        temperature_c: current_weather.temperature,
        wind_speed_kmh: current_weather.windspeed,
        wind_direction_deg: current_weather.winddirection,
        weather_code: current_weather.weathercode,
    };

    Ok(FallbackPayload {
        current,
        daily: build_daily_points(payload.daily.unwrap_or_default()),
    })
}

/// One point per `time` entry; shorter sibling arrays leave gaps, not errors.
fn build_daily_points(daily: ForecastDaily) -> Vec<DailyForecastPoint> {
    daily
        .time
        .into_iter()
        .enumerate()
        .map(|(index, date)| DailyForecastPoint {
            date,
            temp_max_c: daily.temperature_2m_max.get(index).copied().flatten(),
            temp_min_c: daily.temperature_2m_min.get(index).copied().flatten(),
            weather_code: daily.weathercode.get(index).copied().flatten(),
        })
        .collect()
}
