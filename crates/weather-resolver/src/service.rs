//! Caller-facing operations. Each one always yields an answer: provider
//! failures surface as fixed placeholder text, never as errors.

use crate::format;
use crate::model::{Coordinates, GeocodeReply};
use crate::providers::ProviderApi;

pub const GEOCODE_NOT_FOUND_MESSAGE: &str = "Unable to geocode the provided location.";
pub const ALERTS_UNAVAILABLE_MESSAGE: &str = "Unable to fetch alerts or no alerts found.";
pub const NO_ACTIVE_ALERTS_MESSAGE: &str = "No active alerts for this state.";
pub const FORECAST_UNAVAILABLE_MESSAGE: &str = "Unable to fetch forecast data from any provider.";

pub fn geocode_city<P: ProviderApi>(providers: &P, place: &str) -> GeocodeReply {
    match providers.geocode(place) {
        Some(result) => GeocodeReply::Found(result),
        None => GeocodeReply::NotFound(GEOCODE_NOT_FOUND_MESSAGE.to_string()),
    }
}

pub fn get_alerts<P: ProviderApi>(providers: &P, region_code: &str) -> String {
    match providers.fetch_alerts(region_code) {
        None => ALERTS_UNAVAILABLE_MESSAGE.to_string(),
        Some(records) if records.is_empty() => NO_ACTIVE_ALERTS_MESSAGE.to_string(),
        Some(records) => format::format_alerts(&records),
    }
}

/// NWS first, Open-Meteo only when NWS yields nothing usable. Each provider
/// is tried at most once.
pub fn get_forecast<P: ProviderApi>(providers: &P, coords: Coordinates) -> String {
    match providers.fetch_nws_forecast(coords) {
        Some(periods) if !periods.is_empty() => return format::format_nws_forecast(&periods),
        Some(_) => tracing::info!("nws returned no forecast periods, trying open_meteo"),
        None => tracing::info!("nws forecast unavailable, trying open_meteo"),
    }

    match providers.fetch_open_meteo_forecast(coords) {
        Some(payload) => format::format_open_meteo_forecast(&payload),
        None => FORECAST_UNAVAILABLE_MESSAGE.to_string(),
    }
}
