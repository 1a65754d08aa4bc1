//! Runtime configuration assembled from environment variables.

use crate::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_HTTP_TIMEOUT_SECS, ENV_ADMIN_PASSWORD, ENV_DATABASE_URL,
    ENV_HTTP_TIMEOUT_SECS, ENV_REST_KEY, ENV_REST_URL, ENV_VIEWER_BASE_URL,
};
use crate::env_config::{env_non_empty, env_parse_with_default};
use crate::error::ConfigError;

/// Which remote store backs the dashboard.
#[derive(Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct PostgreSQL connection.
    Postgres { database_url: String },
    /// PostgREST-compatible HTTP endpoint (e.g. a hosted Supabase project).
    Rest { base_url: String, api_key: String },
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres { .. } => {
                f.debug_struct("Postgres").field("database_url", &"***").finish()
            },
            Self::Rest { base_url, .. } => f
                .debug_struct("Rest")
                .field("base_url", base_url)
                .field("api_key", &"***")
                .finish(),
        }
    }
}

#[derive(Clone)]
pub struct AdminConfig {
    pub admin_password: String,
    /// True when the password fell back to [`DEFAULT_ADMIN_PASSWORD`].
    pub password_is_default: bool,
    pub store: StoreConfig,
    pub viewer_base_url: String,
    pub http_timeout_secs: u64,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("admin_password", &"***")
            .field("password_is_default", &self.password_is_default)
            .field("store", &self.store)
            .field("viewer_base_url", &self.viewer_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if no usable store is configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_timeout_secs =
            env_parse_with_default(ENV_HTTP_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS);
        Self::resolve(env_non_empty, http_timeout_secs)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `PATTERNING_DATABASE_URL` wins over the REST pair when both are present.
    pub fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        http_timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let store = if let Some(database_url) = lookup(ENV_DATABASE_URL) {
            StoreConfig::Postgres { database_url }
        } else if let Some(base_url) = lookup(ENV_REST_URL) {
            let api_key = lookup(ENV_REST_KEY).ok_or(ConfigError::MissingRestKey)?;
            StoreConfig::Rest { base_url: base_url.trim_end_matches('/').to_owned(), api_key }
        } else {
            return Err(ConfigError::MissingStore);
        };

        let (admin_password, password_is_default) = match lookup(ENV_ADMIN_PASSWORD) {
            Some(password) => (password, false),
            None => (DEFAULT_ADMIN_PASSWORD.to_owned(), true),
        };

        Ok(Self {
            admin_password,
            password_is_default,
            store,
            viewer_base_url: lookup(ENV_VIEWER_BASE_URL).unwrap_or_default(),
            http_timeout_secs,
        })
    }

    /// Emit a warning if the deployment runs with the built-in access code.
    pub fn warn_if_insecure(&self) {
        if self.password_is_default {
            tracing::warn!(
                var = ENV_ADMIN_PASSWORD,
                "admin password not configured, falling back to the built-in default; \
                 anyone who knows it can unlock the dashboard"
            );
        }
    }
}
