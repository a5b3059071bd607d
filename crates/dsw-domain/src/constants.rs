//! Domain constants
//!
//! Defaults used when no configuration is present. Infrastructure-level
//! constants (file names, env prefixes) live in `dsw_infrastructure::constants`.

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// TTL for cached global and organization routing configuration (5 minutes)
pub const CONFIG_CACHE_TTL_SECS: u64 = 300;

/// TTL for cached rate-limit configuration (5 minutes)
pub const RATE_LIMIT_CONFIG_CACHE_TTL_SECS: u64 = 300;

// ============================================================================
// RATE LIMIT CONSTANTS
// ============================================================================

/// Organization identifier used for integration-wide rate-limit defaults
pub const DEFAULT_ORGANIZATION_ID: &str = "_default";

/// Hardcoded requests-per-minute used when no stored configuration exists
pub const RATE_LIMIT_DEFAULT_REQ_PER_MINUTE: u32 = 60;

/// Hardcoded requests-per-hour used when no stored configuration exists
pub const RATE_LIMIT_DEFAULT_REQ_PER_HOUR: u32 = 1000;

/// Hardcoded burst allowance used when no stored configuration exists
pub const RATE_LIMIT_DEFAULT_BURST_ALLOWANCE: u32 = 10;

/// Short sliding window length in seconds
pub const RATE_LIMIT_MINUTE_WINDOW_SECS: i64 = 60;

/// Long sliding window length in seconds; also the bucket retention horizon
pub const RATE_LIMIT_HOUR_WINDOW_SECS: i64 = 3600;

/// Minute usage ratio above which a warning is emitted
pub const RATE_LIMIT_WARNING_RATIO: f64 = 0.8;

/// Minute usage ratio below which the warning re-arms
pub const RATE_LIMIT_REARM_RATIO: f64 = 0.5;

/// Header carrying the effective per-minute limit
pub const HEADER_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";

/// Header carrying the remaining budget
pub const HEADER_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// Header carrying seconds until a retry may succeed
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// Status code returned to callers on a deny
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Default request timeout for the legacy backend
pub const LEGACY_TIMEOUT_MS: u64 = 30_000;

/// Default request timeout for the new backend
pub const NEW_TIMEOUT_MS: u64 = 45_000;

/// Default number of retries after the first attempt
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Default base delay for exponential backoff
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Consecutive failures before a provider circuit opens
pub const CIRCUIT_BREAKER_FAILURE_THRESHOLD: u32 = 5;

/// How long an open circuit rejects calls before allowing a trial
pub const CIRCUIT_BREAKER_TIMEOUT_MS: u64 = 60_000;
