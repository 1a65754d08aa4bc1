use thiserror::Error;

/// Errors raised while assembling runtime configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "no pattern store configured: set PATTERNING_DATABASE_URL or PATTERNING_REST_URL and PATTERNING_REST_KEY"
    )]
    MissingStore,

    #[error("PATTERNING_REST_URL is set but PATTERNING_REST_KEY is missing")]
    MissingRestKey,
}
