//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain defaults (TTLs, windows, timeouts) are defined in
//! `dsw_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "dsw.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "dsw";

/// Environment variable prefix for configuration (`DSW__SECTION__KEY`)
pub const CONFIG_ENV_PREFIX: &str = "DSW";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "DSW_LOG";

/// File stem used when the log file path has none
pub const LOG_FILE_STEM: &str = "dsw";

// ============================================================================
// PROVIDER CONSTANTS
// ============================================================================

/// Registry name of the default legacy adapter
pub const DEFAULT_LEGACY_ADAPTER: &str = "legacy-http";

/// Registry name of the default Salesforce adapter
pub const DEFAULT_SALESFORCE_ADAPTER: &str = "salesforce-http";

/// Default legacy backend URL
pub const DEFAULT_LEGACY_BASE_URL: &str = "http://localhost:8081";

/// Default Salesforce backend URL
pub const DEFAULT_SALESFORCE_BASE_URL: &str = "http://localhost:8082";

/// HTTP client timeout; per-call timeouts come from the routing settings
pub const DEFAULT_HTTP_CLIENT_TIMEOUT_MS: u64 = 60_000;
