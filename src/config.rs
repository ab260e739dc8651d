use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub mongodb_uri: String,
    pub mongodb_db: Option<String>,
    pub api_url: String,
    pub allowed_origins: AllowedOrigins,
    pub admin_token: Option<String>,
    pub storage_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to local
    /// development defaults for anything unset or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(&var, "PORT", 5000);
        let timeout_ms: u64 = parse_or(&var, "STORAGE_TIMEOUT_MS", 5000);

        let store_backend = match var("STORE_BACKEND").as_deref() {
            Some("memory") => StoreBackend::Memory,
            Some("mongodb") | None => StoreBackend::MongoDb,
            Some(other) => {
                log::warn!("Unknown STORE_BACKEND '{}', using mongodb", other);
                StoreBackend::MongoDb
            }
        };

        let allowed_origins = match var("CORS_ORIGINS") {
            Some(origins) if origins.trim() == "*" => AllowedOrigins::Any,
            Some(origins) => AllowedOrigins::List(
                origins
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect(),
            ),
            None => AllowedOrigins::List(vec!["http://localhost:3000".to_string()]),
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            store_backend,
            mongodb_uri: var("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017/portfolio".to_string()),
            mongodb_db: var("MONGODB_DB"),
            api_url: var("API_URL").unwrap_or_else(|| format!("http://localhost:{}/api", port)),
            allowed_origins,
            admin_token: var("ADMIN_TOKEN"),
            storage_timeout: Duration::from_millis(timeout_ms.max(1)),
        }
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("Invalid {} value '{}': {}, using {}", key, raw, e, default);
            default
        }),
        None => {
            log::info!("{} not set, using default: {}", key, default);
            default
        }
    }
}
