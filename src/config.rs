use std::env;
use std::path::PathBuf;

/// Read an environment variable, treating empty/whitespace values as unset.
pub(crate) fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Process-wide configuration, read once at startup and passed by reference
/// to every component. Missing provider keys are not fatal here — the tools
/// that need them degrade at call time.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) token_cache: PathBuf,
    pub(crate) city: String,
    pub(crate) weather_key: Option<String>,
    pub(crate) news_key: Option<String>,
    pub(crate) google_client_id: Option<String>,
    pub(crate) google_client_secret: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Config {
        let data_dir = env_optional("BISEO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                env_optional("HOME")
                    .map(|home| PathBuf::from(home).join(".biseo"))
                    .unwrap_or_else(|| PathBuf::from(".biseo"))
            });
        Config {
            db_path: env_optional("BISEO_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("secretary.db")),
            token_cache: env_optional("BISEO_TOKEN_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("google_token.json")),
            city: env_optional("BISEO_CITY").unwrap_or_else(|| "Seoul".to_string()),
            weather_key: env_optional("OPENWEATHER_API_KEY"),
            news_key: env_optional("NEWS_API_KEY"),
            google_client_id: env_optional("GOOGLE_CLIENT_ID"),
            google_client_secret: env_optional("GOOGLE_CLIENT_SECRET"),
        }
    }
}
