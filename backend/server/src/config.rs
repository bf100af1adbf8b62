use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use axum::http::HeaderValue;
use chrono::Duration;
use thiserror::Error;
use tracing::{info, warn};

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Secret {0} is not configured")]
    MissingSecret(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend {other:?}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GoogleOAuth {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub store_namespace: String,
    pub frontend_origin: String,
    pub public_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub access_secret: String,
    pub refresh_secret: String,
    pub google: Option<GoogleOAuth>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            store_backend: StoreBackend::Redis,
            redis_url: "redis://redis:6379".to_string(),
            store_namespace: "paf".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            public_url: "http://localhost:8080".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 50 * 1024 * 1024,
            access_token_ttl: Duration::minutes(5),
            refresh_token_ttl: Duration::days(30),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            access_secret: String::new(),
            refresh_secret: String::new(),
            google: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self {
            port: try_load("RUST_PORT", "8080")?,
            store_backend: try_load("STORE_BACKEND", "redis")?,
            redis_url: try_load("REDIS_URL", "redis://redis:6379")?,
            store_namespace: try_load("STORE_NAMESPACE", "paf")?,
            frontend_origin: try_load("FRONTEND_ORIGIN", "http://localhost:3000")?,
            public_url: try_load("PUBLIC_URL", "http://localhost:8080")?,
            upload_dir: try_load("UPLOAD_DIR", "uploads")?,
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "52428800")?,
            access_token_ttl: Duration::minutes(try_load("ACCESS_TOKEN_MINUTES", "5")?),
            refresh_token_ttl: Duration::days(try_load("REFRESH_TOKEN_DAYS", "30")?),
            bcrypt_cost: try_load("BCRYPT_COST", "12")?,
            access_secret: require_secret("JWT_ACCESS_SECRET")?,
            refresh_secret: require_secret("JWT_REFRESH_SECRET")?,
            google: load_google(),
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                message: format!(
                    "{} is outside {}..={}",
                    self.bcrypt_cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
                ),
            });
        }

        self.cors_origin()?;

        Ok(())
    }

    pub fn cors_origin(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.frontend_origin).map_err(|e| ConfigError::Invalid {
            key: "FRONTEND_ORIGIN",
            message: e.to_string(),
        })
    }

    /// Absolute URL under which an uploaded file is served.
    pub fn upload_url(&self, filename: &str) -> String {
        format!(
            "{}/api/uploads/{filename}",
            self.public_url.trim_end_matches('/')
        )
    }

    pub fn oauth_redirect_uri(&self) -> String {
        format!(
            "{}/login/oauth2/code/google",
            self.public_url.trim_end_matches('/')
        )
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");

            ConfigError::Invalid {
                key,
                message: e.to_string(),
            }
        })
}

/// Docker secret first, then the environment variable of the same name.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    let secret = match read_to_string(&path) {
        Ok(secret) => Some(secret),
        Err(e) => {
            info!("Failed to read {secret_name} from file: {e}, trying environment");

            var(secret_name)
        }
    };

    secret
        .map(|secret| secret.trim().to_string())
        .filter(|secret| !secret.is_empty())
}

fn require_secret(secret_name: &'static str) -> Result<String, ConfigError> {
    read_secret(secret_name).ok_or_else(|| {
        warn!("Secret {secret_name} missing");

        ConfigError::MissingSecret(secret_name)
    })
}

fn load_google() -> Option<GoogleOAuth> {
    match (
        read_secret("GOOGLE_CLIENT_ID"),
        read_secret("GOOGLE_CLIENT_SECRET"),
    ) {
        (Some(client_id), Some(client_secret)) => Some(GoogleOAuth {
            client_id,
            client_secret,
        }),
        _ => {
            info!("Google OAuth credentials not set, OAuth login disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_case_insensitively() {
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!(" memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn upload_url_joins_without_double_slash() {
        let config = Config {
            public_url: "https://api.example.com/".to_string(),
            ..Config::default()
        };

        assert_eq!(
            config.upload_url("a.png"),
            "https://api.example.com/api/uploads/a.png"
        );
    }

    #[test]
    fn bcrypt_cost_is_bounded() {
        let config = Config {
            bcrypt_cost: 2,
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                ..
            })
        ));
    }
}
