use std::str::FromStr;

use regex::Regex;

/// Deployment environment, controls debug-only behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Testing,
    Staging,
    Production,
}

impl Environment {
    pub fn is_debug(self) -> bool {
        matches!(self, Environment::Local | Environment::Testing)
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "testing" => Ok(Environment::Testing),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => anyhow::bail!("unknown ENVIRONMENT value: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub site_domain: String,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
    pub cors_origins_regex: Option<Regex>,
    pub cors_headers: Vec<String>,
    pub app_version: String,
    /// Refresh token lifetime in seconds.
    pub refresh_token_exp: i64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let site_domain =
            std::env::var("SITE_DOMAIN").unwrap_or_else(|_| "localhost".into());
        let environment = std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "production".into())
            .parse::<Environment>()?;

        let cors_origins = match std::env::var("CORS_ORIGINS") {
            Ok(v) => parse_cors_origins(&v)?,
            Err(_) => vec!["http://localhost:3000".into()],
        };
        let cors_origins_regex = match std::env::var("CORS_ORIGINS_REGEX") {
            Ok(v) if !v.trim().is_empty() => Some(Regex::new(v.trim())?),
            _ => None,
        };
        let cors_headers = std::env::var("CORS_HEADERS")
            .map(|v| split_csv(&v))
            .unwrap_or_else(|_| vec!["*".into()]);

        let app_version = std::env::var("APP_VERSION").unwrap_or_else(|_| "0.1".into());

        let refresh_token_exp = std::env::var("REFRESH_TOKEN_EXP")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60 * 60 * 24 * 21);

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| site_domain.clone()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| format!("{site_domain}-users")),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        Ok(Self {
            database_url,
            site_domain,
            environment,
            cors_origins,
            cors_origins_regex,
            cors_headers,
            app_version,
            refresh_token_exp,
            jwt,
        })
    }
}

/// CORS runs with credentials enabled, and tower-http panics at request time
/// on a wildcard origin in that mode, so `*` is rejected here at startup.
fn parse_cors_origins(value: &str) -> anyhow::Result<Vec<String>> {
    let origins = split_csv(value);
    if origins.iter().any(|o| o == "*") {
        anyhow::bail!(
            "CORS_ORIGINS must list explicit origins (or use CORS_ORIGINS_REGEX); \
             '*' cannot be combined with credentials"
        );
    }
    Ok(origins)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("LOCAL".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("prod".parse::<Environment>().is_err());
    }

    #[test]
    fn debug_environments() {
        assert!(Environment::Local.is_debug());
        assert!(Environment::Testing.is_debug());
        assert!(!Environment::Staging.is_debug());
        assert!(!Environment::Production.is_debug());
    }

    #[test]
    fn wildcard_origin_is_rejected_at_startup() {
        assert!(parse_cors_origins("*").is_err());
        assert!(parse_cors_origins("http://a.com,*").is_err());
        assert_eq!(
            parse_cors_origins("http://a.com").unwrap(),
            vec!["http://a.com".to_string()]
        );
    }

    #[test]
    fn csv_splitting_trims_and_drops_empty() {
        assert_eq!(
            split_csv("http://a.com, http://b.com ,"),
            vec!["http://a.com".to_string(), "http://b.com".to_string()]
        );
        assert!(split_csv("").is_empty());
    }
}
