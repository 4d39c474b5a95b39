use std::env;
use tracing::warn;

/// Minimum HS256 key length accepted for signing tokens.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_rest_url: String,
    pub database_api_key: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_rest_url: env::var("DATABASE_REST_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_REST_URL not set, using empty value");
                    String::new()
                }),
            database_api_key: env::var("DATABASE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET_KEY not set, using empty value");
                    String::new()
                }),
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| {
                    warn!("JWT_ISSUER not set, using default");
                    "CareBridge".to_string()
                }),
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| {
                    warn!("JWT_AUDIENCE not set, using default");
                    "CareBridgeUsers".to_string()
                }),
            jwt_expiry_minutes: parse_or_default("JWT_EXPIRY_MINUTES", 60),
            server_port: parse_or_default("SERVER_PORT", 5156),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if !config.jwt_secret.is_empty() && !config.has_strong_jwt_secret() {
            warn!(
                "JWT_SECRET_KEY is shorter than {} bytes, tokens cannot be issued",
                MIN_JWT_SECRET_BYTES
            );
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_rest_url.is_empty()
            && !self.database_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn has_strong_jwt_secret(&self) -> bool {
        self.jwt_secret.as_bytes().len() >= MIN_JWT_SECRET_BYTES
    }
}

fn parse_or_default<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> AppConfig {
        AppConfig {
            database_rest_url: "http://localhost:3000".to_string(),
            database_api_key: "key".to_string(),
            jwt_secret: secret.to_string(),
            jwt_issuer: "CareBridge".to_string(),
            jwt_audience: "CareBridgeUsers".to_string(),
            jwt_expiry_minutes: 60,
            server_port: 5156,
        }
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let config = config_with_secret("too-short");
        assert!(config.is_configured());
        assert!(!config.has_strong_jwt_secret());
    }

    #[test]
    fn test_long_secret_is_accepted() {
        let config = config_with_secret("0123456789abcdef0123456789abcdef");
        assert!(config.has_strong_jwt_secret());
    }

    #[test]
    fn test_missing_database_url_is_not_configured() {
        let mut config = config_with_secret("0123456789abcdef0123456789abcdef");
        config.database_rest_url = String::new();
        assert!(!config.is_configured());
    }
}
