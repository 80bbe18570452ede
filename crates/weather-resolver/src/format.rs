//! Canonical text reports.
//!
//! Both forecast providers and the alert feed render into the same shape:
//! plain multi-line blocks joined by a `---` line. Missing fields degrade to
//! placeholders; nothing here can fail.

use std::fmt::Display;

use crate::model::{
    AlertRecord, CurrentWeather, DailyForecastPoint, FallbackPayload, ForecastPeriod,
};
use crate::weather_code;

pub const SECTION_DELIMITER: &str = "\n---\n";
pub const NWS_PERIOD_LIMIT: usize = 5;
pub const OPEN_METEO_DAY_LIMIT: usize = 3;

const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";
const NO_INSTRUCTIONS: &str = "No specific instructions provided";

/// First five periods, provider order.
pub fn format_nws_forecast(periods: &[ForecastPeriod]) -> String {
    periods
        .iter()
        .take(NWS_PERIOD_LIMIT)
        .map(format_period)
        .collect::<Vec<_>>()
        .join(SECTION_DELIMITER)
}

pub fn format_open_meteo_forecast(payload: &FallbackPayload) -> String {
    let mut daily = String::from("Next 3 Days Forecast:");
    for day in payload.daily.iter().take(OPEN_METEO_DAY_LIMIT) {
        daily.push('\n');
        daily.push_str(&format_day(day));
    }

    [format_current(&payload.current), daily].join(SECTION_DELIMITER)
}

pub fn format_alert(record: &AlertRecord) -> String {
    format!(
        "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
        text(record.event.as_deref(), UNKNOWN),
        text(record.area_description.as_deref(), UNKNOWN),
        text(record.severity.as_deref(), UNKNOWN),
        text(record.description.as_deref(), NO_DESCRIPTION),
        text(record.instructions.as_deref(), NO_INSTRUCTIONS),
    )
}

pub fn format_alerts(records: &[AlertRecord]) -> String {
    records
        .iter()
        .map(format_alert)
        .collect::<Vec<_>>()
        .join(SECTION_DELIMITER)
}

fn format_period(period: &ForecastPeriod) -> String {
    format!(
        "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
        text(period.name.as_deref(), NOT_AVAILABLE),
        scalar(period.temperature),
        text(period.temperature_unit.as_deref(), NOT_AVAILABLE),
        text(period.wind_speed.as_deref(), NOT_AVAILABLE),
        text(period.wind_direction.as_deref(), NOT_AVAILABLE),
        text(period.detailed_forecast.as_deref(), NOT_AVAILABLE),
    )
}

fn format_current(current: &CurrentWeather) -> String {
    format!(
        "Current Weather:\nTemperature: {}°C\nWind: {} km/h from {}°\nWeather Code: {}",
        scalar(current.temperature_c),
        scalar(current.wind_speed_kmh),
        scalar(current.wind_direction_deg),
        code_label(current.weather_code),
    )
}

fn format_day(day: &DailyForecastPoint) -> String {
    format!(
        "{}: High {}°C, Low {}°C, Code {}",
        text(day.date.as_deref(), NOT_AVAILABLE),
        scalar(day.temp_max_c),
        scalar(day.temp_min_c),
        code_label(day.weather_code),
    )
}

fn code_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("{code} ({})", weather_code::describe(code)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn text<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.unwrap_or(placeholder)
}

fn scalar<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |value| value.to_string())
}
