//! Weather alerts, forecasts and place lookups resolved against public
//! providers and normalized into one text shape.
//!
//! - `providers`: Nominatim geocoding, NWS alerts/forecasts, Open-Meteo fallback.
//! - `format`: canonical forecast and alert text.
//! - `service`: the caller-facing operations and provider fallback order.

pub mod config;
pub mod error;
pub mod format;
mod lenient;
pub mod model;
pub mod providers;
pub mod service;
pub mod weather_code;
