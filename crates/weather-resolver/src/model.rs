use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lenient;

/// Signed decimal degrees. Range is left to the providers to judge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

/// Caller-facing geocode answer: the matched record or a fixed message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeocodeReply {
    Found(GeocodeResult),
    NotFound(String),
}

/// One active alert, as carried in an NWS feature's `properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlertRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub event: Option<String>,
    #[serde(rename = "areaDesc", deserialize_with = "lenient::text")]
    pub area_description: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(rename = "instruction", deserialize_with = "lenient::text")]
    pub instructions: Option<String>,
}

/// One named NWS forecast period ("Tonight", "Tuesday", ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub temperature_unit: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub wind_speed: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub wind_direction: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub detailed_forecast: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentWeather {
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub weather_code: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecastPoint {
    pub date: Option<String>,
    pub temp_max_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub weather_code: Option<i32>,
}

/// Open-Meteo answer reshaped into current conditions plus date-ascending days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackPayload {
    pub current: CurrentWeather,
    pub daily: Vec<DailyForecastPoint>,
}

pub fn normalize_place(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyPlace);
    }
    Ok(value.to_string())
}

/// Two-letter state or area code, upper-cased for the NWS alerts path.
pub fn normalize_region_code(raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyRegionCode);
    }
    if value.len() != 2 || !value.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidRegionCode(value.to_string()));
    }
    Ok(value.to_ascii_uppercase())
}

pub fn validate_finite(coords: Coordinates) -> Result<Coordinates, ValidationError> {
    if !coords.latitude.is_finite() {
        return Err(ValidationError::NonFiniteLatitude);
    }
    if !coords.longitude.is_finite() {
        return Err(ValidationError::NonFiniteLongitude);
    }
    Ok(coords)
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("place must not be empty")]
    EmptyPlace,
    #[error("region code must not be empty")]
    EmptyRegionCode,
    #[error("region code must be two letters, got `{0}`")]
    InvalidRegionCode(String),
    #[error("latitude must be a finite number")]
    NonFiniteLatitude,
    #[error("longitude must be a finite number")]
    NonFiniteLongitude,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_alert_record_reads_nws_property_names() {
        let record: AlertRecord = serde_json::from_str(
            r#"{
                "event": "Flood Warning",
                "areaDesc": "Larimer, CO",
                "severity": "Severe",
                "description": "River above flood stage.",
                "instruction": null
            }"#,
        )
        .expect("record");

        assert_eq!(record.event.as_deref(), Some("Flood Warning"));
        assert_eq!(record.area_description.as_deref(), Some("Larimer, CO"));
        assert_eq!(record.instructions, None);
    }

    #[test]
    fn model_forecast_period_tolerates_missing_fields() {
        let period: ForecastPeriod =
            serde_json::from_str(r#"{"name":"Tonight","temperatureUnit":"F"}"#).expect("period");

        assert_eq!(period.name.as_deref(), Some("Tonight"));
        assert_eq!(period.temperature, None);
        assert_eq!(period.temperature_unit.as_deref(), Some("F"));
    }

    #[test]
    fn model_geocode_reply_serializes_untagged() {
        let found = GeocodeReply::Found(GeocodeResult {
            latitude: 39.74,
            longitude: -104.99,
            display_name: Some("Denver, Colorado".to_string()),
        });
        let value = serde_json::to_value(found).expect("json");
        assert_eq!(value["latitude"], 39.74);
        assert_eq!(value["display_name"], "Denver, Colorado");

        let missing = GeocodeReply::NotFound("nope".to_string());
        assert_eq!(serde_json::to_value(missing).expect("json"), "nope");
    }

    #[test]
    fn model_normalize_place_trims_input() {
        assert_eq!(normalize_place("  Denver  ").expect("place"), "Denver");
        assert_eq!(normalize_place("   "), Err(ValidationError::EmptyPlace));
    }

    #[test]
    fn model_normalize_region_code_uppercases() {
        assert_eq!(normalize_region_code(" co ").expect("code"), "CO");
        assert_eq!(normalize_region_code(""), Err(ValidationError::EmptyRegionCode));
    }

    #[test]
    fn model_normalize_region_code_rejects_non_letter_codes() {
        for raw in ["CO/../x", "C?", "N Y", "COL", "C", "1A"] {
            assert_eq!(
                normalize_region_code(raw),
                Err(ValidationError::InvalidRegionCode(raw.to_string())),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn model_alert_record_degrades_wrong_typed_fields() {
        let record: AlertRecord = serde_json::from_str(
            r#"{"event": "Flood Warning", "severity": 3, "areaDesc": ["Larimer"], "instruction": null}"#,
        )
        .expect("record");

        assert_eq!(record.event.as_deref(), Some("Flood Warning"));
        assert_eq!(record.severity.as_deref(), Some("3"));
        assert_eq!(record.area_description, None);
        assert_eq!(record.instructions, None);
    }

    #[test]
    fn model_forecast_period_reads_quantitative_temperature() {
        let period: ForecastPeriod = serde_json::from_str(
            r#"{
                "name": "Tonight",
                "temperature": {"unitCode": "wmoUnit:degF", "value": 41},
                "windSpeed": {"unitCode": "wmoUnit:km_h-1", "value": 8},
                "detailedForecast": null
            }"#,
        )
        .expect("period");

        assert_eq!(period.temperature, Some(41.0));
        assert_eq!(period.wind_speed, None);
        assert_eq!(period.detailed_forecast, None);
    }

    #[test]
    fn model_validate_finite_accepts_out_of_range_values() {
        let coords = Coordinates::new(120.0, 500.0);
        assert_eq!(validate_finite(coords), Ok(coords));
        assert_eq!(
            validate_finite(Coordinates::new(f64::NAN, 0.0)),
            Err(ValidationError::NonFiniteLatitude)
        );
        assert_eq!(
            validate_finite(Coordinates::new(0.0, f64::INFINITY)),
            Err(ValidationError::NonFiniteLongitude)
        );
    }
}
