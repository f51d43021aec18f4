use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use std::env;

/// Origins accepted by the CORS layer when not running in debug mode.
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:8080",
    "http://localhost:4200",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
    "http://127.0.0.1:4200",
    "https://api.mypisang.info",
    "https://mypisang.info",
    "https://www.mypisang.info",
    "http://api.mypisang.info",
];

#[derive(Clone, Debug)]
pub struct Config {
    pub debug: bool,
    pub host: String,
    pub port: u16,
    /// Trust `Forwarded` / `X-Forwarded-For` when reporting the client address.
    pub behind_proxy: bool,
    pub allowed_origins: Vec<String>,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: true,
            host: "0.0.0.0".to_string(),
            port: 5000,
            behind_proxy: false,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api/v1".to_string(),
            log_dir: "logs".to_string(),
            log_level: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default();

        let debug = match (env::var("APP_DEBUG"), env::var("FLASK_DEBUG")) {
            (Ok(v), _) => parse_bool("APP_DEBUG", &v)?,
            (Err(_), Ok(v)) => legacy_flag(&v),
            (Err(_), Err(_)) => defaults.debug,
        };

        Ok(Self {
            debug,
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            behind_proxy: match env::var("BEHIND_PROXY") {
                Ok(v) => parse_bool("BEHIND_PROXY", &v)?,
                Err(_) => defaults.behind_proxy,
            },
            allowed_origins: match env::var("ALLOWED_ORIGINS") {
                Ok(v) => parse_origins(&v),
                Err(_) => defaults.allowed_origins,
            },
            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", defaults.rate_login_per_min)?,
            rate_protected_per_min: parse_var(
                "RATE_PROTECTED_PER_MIN",
                defaults.rate_protected_per_min,
            )?,
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: env::var("LOG_LEVEL").ok(),
        })
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Level used when `LOG_LEVEL` is not set.
    pub fn log_filter(&self) -> String {
        match &self.log_level {
            Some(level) => level.clone(),
            None if self.debug => "debug".to_string(),
            None => "info".to_string(),
        }
    }

    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {v:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("{key} must be a boolean, got {other:?}"),
    }
}

/// Legacy `FLASK_DEBUG`: only `true` switches it on, anything else is off.
fn legacy_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
