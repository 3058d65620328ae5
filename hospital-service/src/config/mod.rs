//! Environment-driven service configuration. Defaults carry development;
//! production refuses to start on missing or placeholder secrets.

use hms_core::error::AppError;

const DEV_JWT_SECRET: &str = "dev-only-jwt-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_prod(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_lifetime_days: i64,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub auth_attempts: u32,
    pub auth_window_seconds: u64,
    pub global_requests: u32,
    pub global_window_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct HmsConfig {
    pub environment: Environment,
    pub service_name: String,
    pub port: u16,
    pub log_level: String,
    pub frontend_url: String,
    pub jwt: JwtConfig,
    /// Absent in development; the mock email provider is used instead.
    pub smtp: Option<SmtpConfig>,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

/// Read an environment variable. Missing values fall back to `default` in
/// development and are a startup error in production.
fn get_env(key: &str, default: &str, is_prod: bool) -> Result<String, AppError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be set in production",
            key
        ))),
        _ => Ok(default.to_string()),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl HmsConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let base = hms_core::config::Config::load()?;

        let environment = match std::env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };
        let is_prod = environment.is_prod();

        let jwt = JwtConfig {
            secret: get_env("JWT_SECRET", DEV_JWT_SECRET, is_prod)?,
            token_lifetime_days: parse_env("JWT_LIFETIME_DAYS", 7),
        };
        if is_prod && jwt.secret == DEV_JWT_SECRET {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not use the development default in production"
            )));
        }

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) if !host.is_empty() => Some(SmtpConfig {
                host,
                port: parse_env("SMTP_PORT", 587),
                username: get_env("SMTP_USERNAME", "", is_prod)?,
                password: get_env("SMTP_PASSWORD", "", is_prod)?,
                from_address: get_env("SMTP_FROM", "noreply@mediflow.example", is_prod)?,
            }),
            _ if is_prod => {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "SMTP_HOST must be set in production"
                )))
            }
            _ => None,
        };

        let allowed_origins = get_env("ALLOWED_ORIGINS", "http://localhost:3000", is_prod)?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            environment,
            service_name: "hospital-service".to_string(),
            port: base.port,
            log_level: get_env("LOG_LEVEL", "info", false)?,
            frontend_url: get_env("FRONTEND_URL", "http://localhost:3000", is_prod)?,
            jwt,
            smtp,
            security: SecurityConfig { allowed_origins },
            rate_limit: RateLimitConfig {
                auth_attempts: parse_env("RATE_LIMIT_AUTH_ATTEMPTS", 10),
                auth_window_seconds: parse_env("RATE_LIMIT_AUTH_WINDOW_SECONDS", 60),
                global_requests: parse_env("RATE_LIMIT_GLOBAL_REQUESTS", 300),
                global_window_seconds: parse_env("RATE_LIMIT_GLOBAL_WINDOW_SECONDS", 60),
            },
        })
    }

    /// A permissive configuration for tests: mock email, generous limits.
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Development,
            service_name: "hospital-service".to_string(),
            port: 0,
            log_level: "warn".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            jwt: JwtConfig {
                secret: "test-secret-0123456789abcdef".to_string(),
                token_lifetime_days: 7,
            },
            smtp: None,
            security: SecurityConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
            rate_limit: RateLimitConfig {
                auth_attempts: 10_000,
                auth_window_seconds: 60,
                global_requests: 100_000,
                global_window_seconds: 60,
            },
        }
    }
}
