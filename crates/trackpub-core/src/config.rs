//! Configuration module
//!
//! Environment-backed configuration for the relay: server settings, the
//! deposition API account tokens, the history spreadsheet endpoint, and the
//! wind grid geometry. Loaded once at startup; fail fast on misconfiguration.

use std::collections::HashMap;
use std::env;
use std::fmt;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ZENODO_API_URL: &str = "https://zenodo.org/api/deposit/depositions";
const DEFAULT_ZENODO_RECORD_BASE: &str = "https://zenodo.org/record";
const DEFAULT_OPENMETEO_API_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DEFAULT_LATITUDE: f64 = 41.37;
const DEFAULT_LONGITUDE: f64 = 2.19;
const DEFAULT_WIND_GRID_NX: usize = 7;
const DEFAULT_WIND_GRID_NY: usize = 7;
const DEFAULT_WIND_GRID_SPACING_DEG: f64 = 0.05;
const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Name of the deposition account used when the client does not pick one.
pub const DEFAULT_ACCOUNT: &str = "A";

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub zenodo_api_url: String,
    pub zenodo_record_base: String,
    /// Deposition account name -> API token. Account `A` comes from
    /// `ZENODO_TOKEN`; further accounts from `ZENODO_TOKEN_<NAME>`.
    pub zenodo_tokens: HashMap<String, String>,
    pub zenodo_community: Option<String>,
    pub history_script_url: Option<String>,
    pub openmeteo_api_url: String,
    pub openweather_browser_key: Option<String>,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub wind_grid_nx: usize,
    pub wind_grid_ny: usize,
    pub wind_grid_spacing_deg: f64,
    pub max_file_size_bytes: usize,
    pub upstream_timeout_secs: u64,
}

// Tokens and keys must not leak into logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("environment", &self.environment)
            .field("cors_origins", &self.cors_origins)
            .field("zenodo_api_url", &self.zenodo_api_url)
            .field("zenodo_record_base", &self.zenodo_record_base)
            .field("zenodo_accounts", &self.account_names())
            .field("zenodo_tokens", &"<redacted>")
            .field("zenodo_community", &self.zenodo_community)
            .field("history_script_url", &self.history_script_url)
            .field("openmeteo_api_url", &self.openmeteo_api_url)
            .field(
                "openweather_browser_key",
                &self.openweather_browser_key.as_ref().map(|_| "<redacted>"),
            )
            .field("default_latitude", &self.default_latitude)
            .field("default_longitude", &self.default_longitude)
            .field("wind_grid_nx", &self.wind_grid_nx)
            .field("wind_grid_ny", &self.wind_grid_ny)
            .field("wind_grid_spacing_deg", &self.wind_grid_spacing_deg)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut zenodo_tokens = HashMap::new();
        if let Ok(token) = env::var("ZENODO_TOKEN") {
            zenodo_tokens.insert(DEFAULT_ACCOUNT.to_string(), token);
        }
        for (key, value) in env::vars() {
            if let Some(name) = key.strip_prefix("ZENODO_TOKEN_") {
                if !name.is_empty() && !value.is_empty() {
                    zenodo_tokens.insert(name.to_uppercase(), value);
                }
            }
        }

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            zenodo_api_url: env::var("ZENODO_API_URL")
                .unwrap_or_else(|_| DEFAULT_ZENODO_API_URL.to_string()),
            zenodo_record_base: env::var("ZENODO_RECORD_BASE")
                .unwrap_or_else(|_| DEFAULT_ZENODO_RECORD_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            zenodo_tokens,
            zenodo_community: env::var("ZENODO_COMMUNITY").ok().filter(|s| !s.is_empty()),
            history_script_url: env::var("HISTORY_SCRIPT_URL").ok().filter(|s| !s.is_empty()),
            openmeteo_api_url: env::var("OPENMETEO_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENMETEO_API_URL.to_string()),
            openweather_browser_key: env::var("OPENWEATHER_BROWSER_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            default_latitude: env::var("DEFAULT_LATITUDE")
                .unwrap_or_else(|_| DEFAULT_LATITUDE.to_string())
                .parse()
                .unwrap_or(DEFAULT_LATITUDE),
            default_longitude: env::var("DEFAULT_LONGITUDE")
                .unwrap_or_else(|_| DEFAULT_LONGITUDE.to_string())
                .parse()
                .unwrap_or(DEFAULT_LONGITUDE),
            wind_grid_nx: env::var("WIND_GRID_NX")
                .unwrap_or_else(|_| DEFAULT_WIND_GRID_NX.to_string())
                .parse()
                .unwrap_or(DEFAULT_WIND_GRID_NX),
            wind_grid_ny: env::var("WIND_GRID_NY")
                .unwrap_or_else(|_| DEFAULT_WIND_GRID_NY.to_string())
                .parse()
                .unwrap_or(DEFAULT_WIND_GRID_NY),
            wind_grid_spacing_deg: env::var("WIND_GRID_SPACING_DEG")
                .unwrap_or_else(|_| DEFAULT_WIND_GRID_SPACING_DEG.to_string())
                .parse()
                .unwrap_or(DEFAULT_WIND_GRID_SPACING_DEG),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let default_token = self
            .zenodo_tokens
            .get(DEFAULT_ACCOUNT)
            .ok_or_else(|| anyhow::anyhow!("ZENODO_TOKEN must be set"))?;
        if default_token.len() < 10 || default_token == "your-zenodo-token" {
            return Err(anyhow::anyhow!(
                "ZENODO_TOKEN appears to be invalid or a placeholder. Please provide a valid API token."
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.wind_grid_nx == 0 || self.wind_grid_ny == 0 {
            return Err(anyhow::anyhow!(
                "WIND_GRID_NX and WIND_GRID_NY must be greater than zero"
            ));
        }
        if !self.wind_grid_spacing_deg.is_finite() || self.wind_grid_spacing_deg <= 0.0 {
            return Err(anyhow::anyhow!(
                "WIND_GRID_SPACING_DEG must be a positive number of degrees"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Token for a named deposition account; account names are
    /// case-insensitive.
    pub fn zenodo_token(&self, account: &str) -> Option<&str> {
        self.zenodo_tokens
            .get(&account.to_uppercase())
            .map(String::as_str)
    }

    fn account_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.zenodo_tokens.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
