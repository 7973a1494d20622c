// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Signing key used when `DORMCHEF_SESSION_SECRET` is unset. Accepted only
/// with `DORMCHEF_DEV` set; the server warns at startup when it is in use.
pub const DEV_SESSION_SECRET: &str = "dormchef-dev-secret-change-me-please";

pub const SESSION_SECRET_MIN_BYTES: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub schema_version: &'static str,
    /// Local development mode; allows the built-in session secret.
    pub dev_mode: bool,
    pub bind: String,
    pub db_path: PathBuf,
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_secret_is_default: bool,
    pub session_ttl_secs: u64,
    pub password_rounds: u32,
    pub max_body_bytes: usize,
    pub request_timeout_ms: u64,
    pub feed_limit: usize,
    pub seed_demo: bool,
    pub cors_origins: Vec<String>,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            dev_mode: false,
            bind: "0.0.0.0:8080".to_string(),
            db_path: PathBuf::from("artifacts/dormchef.sqlite"),
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_secret_is_default: true,
            session_ttl_secs: 30 * 24 * 60 * 60,
            password_rounds: crate::auth::DEFAULT_PASSWORD_ROUNDS,
            max_body_bytes: 64 * 1024,
            request_timeout_ms: 5000,
            feed_limit: dormchef_planner::FEED_LIMIT,
            seed_demo: false,
            cors_origins: Vec::new(),
            log_json: true,
        }
    }
}

impl ServerConfig {
    /// Reads every `DORMCHEF_*` variable from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source; unset or
    /// unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_lookup(vars: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secret = vars("DORMCHEF_SESSION_SECRET").filter(|s| !s.is_empty());
        Self {
            dev_mode: env_bool(&vars, "DORMCHEF_DEV", defaults.dev_mode),
            bind: env_string(&vars, "DORMCHEF_BIND", &defaults.bind),
            db_path: vars("DORMCHEF_DB_PATH")
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.db_path.clone(), PathBuf::from),
            session_secret_is_default: secret.is_none(),
            session_secret: secret.unwrap_or(defaults.session_secret.clone()),
            session_ttl_secs: env_u64(&vars, "DORMCHEF_SESSION_TTL_SECS", defaults.session_ttl_secs),
            password_rounds: u32::try_from(env_u64(
                &vars,
                "DORMCHEF_PASSWORD_ROUNDS",
                u64::from(defaults.password_rounds),
            ))
            .unwrap_or(defaults.password_rounds),
            max_body_bytes: env_usize(&vars, "DORMCHEF_MAX_BODY_BYTES", defaults.max_body_bytes),
            request_timeout_ms: env_u64(
                &vars,
                "DORMCHEF_REQUEST_TIMEOUT_MS",
                defaults.request_timeout_ms,
            ),
            feed_limit: env_usize(&vars, "DORMCHEF_FEED_LIMIT", defaults.feed_limit),
            seed_demo: env_bool(&vars, "DORMCHEF_SEED_DEMO", defaults.seed_demo),
            cors_origins: env_list(&vars, "DORMCHEF_CORS_ORIGINS"),
            log_json: env_bool(&vars, "DORMCHEF_LOG_JSON", defaults.log_json),
            ..defaults
        }
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_secret_is_default && !self.dev_mode {
            return Err(
                "DORMCHEF_SESSION_SECRET is required unless DORMCHEF_DEV is set".to_string(),
            );
        }
        if self.session_secret.len() < SESSION_SECRET_MIN_BYTES {
            return Err(format!(
                "DORMCHEF_SESSION_SECRET must be at least {SESSION_SECRET_MIN_BYTES} bytes"
            ));
        }
        if self.session_ttl_secs == 0 {
            return Err("DORMCHEF_SESSION_TTL_SECS must be positive".to_string());
        }
        if self.password_rounds == 0 {
            return Err("DORMCHEF_PASSWORD_ROUNDS must be positive".to_string());
        }
        if self.feed_limit == 0 {
            return Err("DORMCHEF_FEED_LIMIT must be positive".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn env_bool(vars: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    vars(name)
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(vars: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    vars(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(vars: &impl Fn(&str) -> Option<String>, name: &str, default: usize) -> usize {
    vars(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_string(vars: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    vars(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_list(vars: &impl Fn(&str) -> Option<String>, name: &str) -> Vec<String> {
    vars(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(cfg.feed_limit, 20);
        assert!(cfg.session_secret_is_default);
        assert!(!cfg.dev_mode);
        assert!(cfg.log_json);
    }

    #[test]
    fn built_in_secret_is_refused_outside_dev_mode() {
        let prod = ServerConfig::from_lookup(lookup(&[]));
        let err = prod.validate().expect_err("secret required");
        assert!(err.contains("DORMCHEF_SESSION_SECRET"), "{err}");

        let dev = ServerConfig::from_lookup(lookup(&[("DORMCHEF_DEV", "1")]));
        assert!(dev.dev_mode);
        assert!(dev.session_secret_is_default);
        assert!(dev.validate().is_ok());

        let configured = ServerConfig::from_lookup(lookup(&[(
            "DORMCHEF_SESSION_SECRET",
            "a-very-long-test-secret",
        )]));
        assert!(configured.validate().is_ok());
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("DORMCHEF_BIND", "127.0.0.1:9000"),
            ("DORMCHEF_SESSION_SECRET", "a-very-long-test-secret"),
            ("DORMCHEF_MAX_BODY_BYTES", "not-a-number"),
            ("DORMCHEF_SEED_DEMO", "yes"),
            ("DORMCHEF_CORS_ORIGINS", "http://a.test, ,http://b.test"),
            ("DORMCHEF_LOG_JSON", "0"),
        ]));
        assert_eq!(cfg.bind, "127.0.0.1:9000");
        assert!(!cfg.session_secret_is_default);
        assert_eq!(cfg.max_body_bytes, 64 * 1024);
        assert!(cfg.seed_demo);
        assert_eq!(cfg.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!cfg.log_json);
    }

    #[test]
    fn short_secret_is_rejected() {
        let cfg = ServerConfig::from_lookup(lookup(&[("DORMCHEF_SESSION_SECRET", "short")]));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serialized_config_hides_the_secret() {
        let json = serde_json::to_value(ServerConfig::default()).expect("json");
        assert!(json.get("session_secret").is_none());
        assert_eq!(json["session_secret_is_default"], true);
    }
}
