//! Provider Constants
//!
//! Wire-level constants of the deposit backends. Domain defaults (timeouts,
//! retry counts) live in `dsw-domain`.

// ============================================================================
// ENDPOINTS
// ============================================================================

/// Deposit registration endpoint, relative to the backend base URL
pub const CREATE_DEPOSIT_PATH: &str = "/create-deposit-equivalent";

/// Deposit status endpoint
pub const DEPOSIT_STATUS_PATH: &str = "/status";

/// Health probe endpoint
pub const HEALTH_PATH: &str = "/health";

// ============================================================================
// HEADERS
// ============================================================================

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Service-level API key header
pub const HEADER_SERVICE_KEY: &str = "X-Service-Key";

/// Member identifier header (legacy backend)
pub const HEADER_MEMBER_ID: &str = "X-Member-Id";

/// Branch identifier header (legacy backend)
pub const HEADER_BRANCH_ID: &str = "X-Branch-Id";

/// Member API key header (legacy backend)
pub const HEADER_MEMBER_KEY: &str = "X-Member-Key";

/// Organization header carrying `member:branch` (Salesforce backend)
pub const HEADER_SF_ORGANIZATION: &str = "X-SF-Organization";

// ============================================================================
// PAYLOAD FORMATS
// ============================================================================

/// Date format expected by the legacy backend
pub const LEGACY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format expected by the Salesforce backend
pub const SALESFORCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Legacy person classification of the landlord
pub const LEGACY_LANDLORD: &str = "Lead Landlord";

/// Legacy person classification of the first tenant
pub const LEGACY_LEAD_TENANT: &str = "Lead Tenant";

/// Legacy person classification of every other tenant
pub const LEGACY_JOINT_TENANT: &str = "Joint Tenant";

/// Status reported when a backend omits one
pub const STATUS_UNKNOWN: &str = "unknown";

/// Maximum length of a backend error body kept in error messages
pub const ERROR_BODY_MAX_LEN: usize = 512;
