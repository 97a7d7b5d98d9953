//! Hard limits for configurable values

/// Shortest manifest fetch timeout accepted (milliseconds)
pub const MIN_FETCH_TIMEOUT_MS: u64 = 100;

/// Longest manifest fetch timeout accepted (one minute)
pub const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;

/// Fetch timeout used when none is configured
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
