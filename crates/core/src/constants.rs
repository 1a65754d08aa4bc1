//! Shared constants for patterning-admin.

/// Number of most recent voicings fetched per dashboard load.
pub const RECENT_PATTERN_LIMIT: usize = 50;

/// Word shown for voicings without an owning layer.
pub const UNKNOWN_WORD: &str = "Unknown";

/// Access code used when `PATTERNING_ADMIN_PASSWORD` is absent.
///
/// Insecure by default: anyone who reads this source can unlock a
/// deployment that forgot to configure its own secret.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Path prefix of the external pattern viewer.
pub const VIEWER_PATH_PREFIX: &str = "/v/";

/// Default timeout for the PostgREST HTTP client.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Dashboard sessions idle longer than this are dropped by the HTTP server.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Upper bound on concurrently open dashboard sessions; the least recently
/// used one is evicted to make room.
pub const MAX_DASHBOARD_SESSIONS: usize = 64;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

pub const ENV_ADMIN_PASSWORD: &str = "PATTERNING_ADMIN_PASSWORD";
pub const ENV_DATABASE_URL: &str = "PATTERNING_DATABASE_URL";
pub const ENV_REST_URL: &str = "PATTERNING_REST_URL";
pub const ENV_REST_KEY: &str = "PATTERNING_REST_KEY";
pub const ENV_VIEWER_BASE_URL: &str = "PATTERNING_VIEWER_BASE_URL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "PATTERNING_HTTP_TIMEOUT_SECS";
pub const ENV_SESSION_IDLE_SECS: &str = "PATTERNING_SESSION_IDLE_SECS";
