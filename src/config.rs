use anyhow::{Context, Result};
use std::env;

use crate::domain::demo::DemoRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // Redis
    pub redis_url: String,
    pub redis_cache_ttl_seconds: u64,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Supabase Auth
    pub supabase_jwt_jwks_url: String,
    pub supabase_jwt_issuer: String,
    pub supabase_jwt_audience: String,
    pub jwks_cache_ttl_seconds: u64,

    // Supabase API (for auth proxy)
    pub supabase_url: String,
    pub supabase_anon_key: String,

    // Public card pages
    pub public_profile_base_url: String,

    // Demo mode
    pub demo_mode: bool,
    pub demo_role: DemoRole,
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn parse_bool(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::to_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| var(key).with_context(|| format!("{} must be set", key));

        let env = Environment::from_str(&var("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // Database
        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parse_or(var("DATABASE_MAX_CONNECTIONS"), 10);

        // Redis
        let redis_url = var("REDIS_URL").unwrap_or_else(|| "redis://redis:6379/0".to_string());
        let redis_cache_ttl_seconds = parse_or(var("REDIS_CACHE_TTL_SECONDS"), 3600); // 1 hour default

        // CORS
        let cors_allow_origins = var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Supabase Auth
        let supabase_jwt_jwks_url = required("SUPABASE_JWT_JWKS_URL")?;
        let supabase_jwt_issuer = required("SUPABASE_JWT_ISSUER")?;
        let supabase_jwt_audience =
            var("SUPABASE_JWT_AUDIENCE").unwrap_or_else(|| "authenticated".to_string());
        let jwks_cache_ttl_seconds = parse_or(var("JWKS_CACHE_TTL_SECONDS"), 1800); // 30 minutes default

        // Supabase API (for auth proxy)
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;

        let public_profile_base_url = var("PUBLIC_PROFILE_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000/p".to_string());

        let demo_mode = parse_bool(var("DEMO_MODE"));
        let demo_role = DemoRole::from_str(&var("DEMO_ROLE").unwrap_or_default());

        Ok(Settings {
            env,
            server_addr,
            database_url,
            database_max_connections,
            redis_url,
            redis_cache_ttl_seconds,
            cors_allow_origins,
            supabase_jwt_jwks_url,
            supabase_jwt_issuer,
            supabase_jwt_audience,
            jwks_cache_ttl_seconds,
            supabase_url,
            supabase_anon_key,
            public_profile_base_url,
            demo_mode,
            demo_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 5] = [
        ("DATABASE_URL", "postgres://localhost/cardlink"),
        ("SUPABASE_JWT_JWKS_URL", "https://x.supabase.co/auth/v1/.well-known/jwks.json"),
        ("SUPABASE_JWT_ISSUER", "https://x.supabase.co/auth/v1"),
        ("SUPABASE_URL", "https://x.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn defaults_apply() {
        let settings = Settings::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(settings.env, Environment::Dev);
        assert_eq!(settings.server_addr, "0.0.0.0:8080");
        assert_eq!(settings.database_max_connections, 10);
        assert_eq!(settings.supabase_jwt_audience, "authenticated");
        assert_eq!(settings.cors_allow_origins, vec!["http://localhost:3000"]);
        assert!(!settings.demo_mode);
        assert_eq!(settings.demo_role, DemoRole::User);
    }

    #[test]
    fn missing_required_variable_is_an_error() {
        let err = Settings::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("ENV", "production"),
            ("DATABASE_MAX_CONNECTIONS", "25"),
            ("CORS_ALLOW_ORIGINS", "https://a.app, https://b.app,"),
            ("DEMO_MODE", "TRUE"),
            ("DEMO_ROLE", "admin"),
        ]);
        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert!(settings.env.is_prod());
        assert_eq!(settings.database_max_connections, 25);
        assert_eq!(settings.cors_allow_origins, vec!["https://a.app", "https://b.app"]);
        assert!(settings.demo_mode);
        assert_eq!(settings.demo_role, DemoRole::Admin);
    }
}
