//! Environment configuration for the board's external collaborators.
//!
//! The backend endpoint and its public key are mandatory and checked eagerly
//! at startup. The metadata key is optional: without it title lookups still
//! fire and fall back to the sentinel title when the response is rejected.

use thiserror::Error;
use tracing::error;

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_BOARD_REQUESTER: &str = "BOARD_REQUESTER";

const DEFAULT_REQUESTER: &str = "guest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing or blank; check your environment and restart")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend endpoint base URL.
    pub supabase_url: String,
    /// Backend public (anon) API key.
    pub supabase_anon_key: String,
    /// Metadata lookup key. `None` degrades title resolution silently.
    pub youtube_api_key: Option<String>,
    /// Identity whose requests populate the past list.
    pub requester: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup. Lets tests supply a
    /// substitute environment without mutating process state.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = required(&get, ENV_SUPABASE_URL)?;
        let supabase_anon_key = required(&get, ENV_SUPABASE_ANON_KEY)?;
        let youtube_api_key = get(ENV_YOUTUBE_API_KEY).filter(|v| !v.trim().is_empty());
        let requester = get(ENV_BOARD_REQUESTER)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REQUESTER.to_string());

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            youtube_api_key,
            requester,
        })
    }
}

fn required<F>(get: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key).filter(|v| !v.trim().is_empty()) {
        Some(value) => Ok(value),
        None => {
            error!("{key} is missing or blank; check your environment and restart");
            Err(ConfigError::Missing(key))
        }
    }
}
