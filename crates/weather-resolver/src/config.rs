use std::collections::HashMap;

pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

pub const NWS_API_BASE: &str = "https://api.weather.gov";
pub const GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const OPEN_METEO_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

pub const NWS_USER_AGENT: &str = "nils-weather-resolver/1.0";
pub const DEFAULT_CONTACT_EMAIL: &str = "contact@example.com";

pub const CONTACT_EMAIL_ENV: &str = "CONTACT_EMAIL";
pub const NWS_API_BASE_ENV: &str = "WEATHER_NWS_API_BASE";
pub const GEOCODE_ENDPOINT_ENV: &str = "WEATHER_GEOCODE_ENDPOINT";
pub const OPEN_METEO_ENDPOINT_ENV: &str = "WEATHER_OPEN_METEO_ENDPOINT";
pub const PROVIDER_TIMEOUT_SECS_ENV: &str = "WEATHER_PROVIDER_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub nws_api_base: String,
    pub geocode_endpoint: String,
    pub open_meteo_endpoint: String,
    pub contact_email: String,
    pub timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_pairs(Vec::<(String, String)>::new())
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub(crate) fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            nws_api_base: resolve_url(&map, NWS_API_BASE_ENV, NWS_API_BASE),
            geocode_endpoint: resolve_url(&map, GEOCODE_ENDPOINT_ENV, GEOCODE_ENDPOINT),
            open_meteo_endpoint: resolve_url(&map, OPEN_METEO_ENDPOINT_ENV, OPEN_METEO_ENDPOINT),
            contact_email: non_empty(&map, CONTACT_EMAIL_ENV)
                .unwrap_or(DEFAULT_CONTACT_EMAIL)
                .to_string(),
            timeout_secs: resolve_timeout_secs(&map),
        }
    }

    /// Nominatim's usage policy asks for an identifying agent with a contact.
    pub fn geocode_user_agent(&self) -> String {
        format!("{NWS_USER_AGENT} ({})", self.contact_email)
    }
}

fn non_empty<'a>(env_map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env_map
        .get(key)
        .map(String::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn resolve_url(env_map: &HashMap<String, String>, key: &str, default: &str) -> String {
    non_empty(env_map, key)
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

fn resolve_timeout_secs(env_map: &HashMap<String, String>) -> u64 {
    non_empty(env_map, PROVIDER_TIMEOUT_SECS_ENV)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(PROVIDER_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_point_at_public_providers() {
        let config = RuntimeConfig::default();
        assert_eq!(config.nws_api_base, NWS_API_BASE);
        assert_eq!(config.geocode_endpoint, GEOCODE_ENDPOINT);
        assert_eq!(config.open_meteo_endpoint, OPEN_METEO_ENDPOINT);
        assert_eq!(config.timeout_secs, PROVIDER_TIMEOUT_SECS);
    }

    #[test]
    fn config_geocode_user_agent_carries_contact() {
        let config = RuntimeConfig::from_pairs(vec![(CONTACT_EMAIL_ENV, "ops@example.org")]);
        assert_eq!(
            config.geocode_user_agent(),
            "nils-weather-resolver/1.0 (ops@example.org)"
        );
    }

    #[test]
    fn config_blank_contact_uses_default() {
        let config = RuntimeConfig::from_pairs(vec![(CONTACT_EMAIL_ENV, "   ")]);
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
    }

    #[test]
    fn config_endpoint_overrides_drop_trailing_slash() {
        let config = RuntimeConfig::from_pairs(vec![
            (NWS_API_BASE_ENV, "http://127.0.0.1:9000/"),
            (OPEN_METEO_ENDPOINT_ENV, " http://127.0.0.1:9001/v1/forecast "),
        ]);

        assert_eq!(config.nws_api_base, "http://127.0.0.1:9000");
        assert_eq!(config.open_meteo_endpoint, "http://127.0.0.1:9001/v1/forecast");
        assert_eq!(config.geocode_endpoint, GEOCODE_ENDPOINT);
    }

    #[test]
    fn config_supports_timeout_override() {
        let config = RuntimeConfig::from_pairs(vec![(PROVIDER_TIMEOUT_SECS_ENV, "5")]);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_falls_back_when_timeout_override_invalid() {
        for raw in ["abc", "0", ""] {
            let config = RuntimeConfig::from_pairs(vec![(PROVIDER_TIMEOUT_SECS_ENV, raw)]);
            assert_eq!(config.timeout_secs, PROVIDER_TIMEOUT_SECS, "input: {raw:?}");
        }
    }
}
