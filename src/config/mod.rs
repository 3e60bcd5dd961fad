use std::env;

use crate::models::ValidationPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub run_migrations: bool,

    // Bearer token for /api and /ws (unset = auth disabled)
    pub api_token: Option<String>,

    // Trade entry: optional fields that must be filled in
    pub validation: ValidationPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            run_migrations: env_flag("RUN_MIGRATIONS", true),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            validation: ValidationPolicy {
                require_expiration_date: env_flag("REQUIRE_EXPIRATION_DATE", false),
                require_fees: env_flag("REQUIRE_FEES", false),
                require_date_closed_when_closed: env_flag("REQUIRE_DATE_CLOSED_WHEN_CLOSED", false),
            },
        })
    }

    /// Returns true if requests must carry a bearer token.
    pub fn has_api_auth(&self) -> bool {
        self.api_token.is_some()
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
