use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use weather_resolver::{
    config::RuntimeConfig,
    error::{AppError, ERROR_CODE_RUNTIME_SERIALIZE},
    model::{self, Coordinates, GeocodeReply},
    providers::{HttpProviders, ProviderApi},
    service,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Weather alerts, forecasts and place lookups (NWS with Open-Meteo fallback)"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a place name to coordinates.
    Geocode {
        #[arg(long)]
        city: String,
        #[arg(long)]
        json: bool,
    },
    /// Active NWS alerts for a two-letter state or area code.
    Alerts {
        #[arg(long)]
        state: String,
        #[arg(long)]
        json: bool,
    },
    /// Short-term forecast for a coordinate pair.
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        json: bool,
    },
}

const ENVELOPE_SCHEMA_VERSION: &str = "v1";

impl Cli {
    fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Geocode { .. } => "weather.geocode",
            Commands::Alerts { .. } => "weather.alerts",
            Commands::Forecast { .. } => "weather.forecast",
        }
    }

    fn json_output(&self) -> bool {
        match &self.command {
            Commands::Geocode { json, .. }
            | Commands::Alerts { json, .. }
            | Commands::Forecast { json, .. } => *json,
        }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let command = cli.command_name();
    let json_output = cli.json_output();
    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(error) => {
            emit_error(command, json_output, &error);
            std::process::exit(error.exit_code());
        }
    }
}

/// Logs go to stderr; stdout carries only the result.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<String, AppError> {
    let config = RuntimeConfig::from_env();
    let providers = HttpProviders::new(config)?;
    run_with(cli, &providers)
}

fn run_with<P: ProviderApi>(cli: Cli, providers: &P) -> Result<String, AppError> {
    let command = cli.command_name();
    match cli.command {
        Commands::Geocode { city, json } => {
            let place = model::normalize_place(&city)?;
            let reply = service::geocode_city(providers, &place);
            if json {
                render_json_envelope(command, &reply)
            } else {
                Ok(format_geocode_text(&reply))
            }
        }
        Commands::Alerts { state, json } => {
            let region_code = model::normalize_region_code(&state)?;
            let text = service::get_alerts(providers, &region_code);
            render_text_result(command, json, text)
        }
        Commands::Forecast { lat, lon, json } => {
            let coords = model::validate_finite(Coordinates::new(lat, lon))?;
            let text = service::get_forecast(providers, coords);
            render_text_result(command, json, text)
        }
    }
}

fn render_text_result(command: &str, json: bool, text: String) -> Result<String, AppError> {
    if json {
        render_json_envelope(command, &text)
    } else {
        Ok(text)
    }
}

fn render_json_envelope<T: Serialize>(command: &str, result: &T) -> Result<String, AppError> {
    let result = serde_json::to_value(result).map_err(|error| {
        AppError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output: {error}"),
        )
    })?;
    serde_json::to_string(&json!({
        "schema_version": ENVELOPE_SCHEMA_VERSION,
        "command": command,
        "ok": true,
        "result": result,
    }))
    .map_err(|error| {
        AppError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output envelope: {error}"),
        )
    })
}

fn format_geocode_text(reply: &GeocodeReply) -> String {
    match reply {
        GeocodeReply::Found(result) => {
            let coordinates = format!("{:.4},{:.4}", result.latitude, result.longitude);
            match &result.display_name {
                Some(name) => format!("{name}\n{coordinates}"),
                None => coordinates,
            }
        }
        GeocodeReply::NotFound(message) => message.clone(),
    }
}

fn emit_error(command: &str, json_output: bool, error: &AppError) {
    if !json_output {
        eprintln!("error[{}]: {}", error.code, error.message);
        return;
    }

    let payload = json!({
        "schema_version": ENVELOPE_SCHEMA_VERSION,
        "command": command,
        "ok": false,
        "error": {
            "code": error.code,
            "message": error.message,
            "details": {
                "kind": error.kind.as_str(),
                "exit_code": error.exit_code(),
            }
        }
    });
    let rendered = serde_json::to_string(&payload).unwrap_or_else(|serialize_error| {
        format!(
            "{{\"schema_version\":\"{}\",\"command\":\"{}\",\"ok\":false,\"error\":{{\"code\":\"{}\",\"message\":\"{}\"}}}}",
            ENVELOPE_SCHEMA_VERSION,
            command,
            ERROR_CODE_RUNTIME_SERIALIZE,
            escape_json_string(&format!(
                "failed to serialize error envelope: {serialize_error}"
            )),
        )
    });
    println!("{rendered}");
}

fn escape_json_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c < '\u{20}' => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}
