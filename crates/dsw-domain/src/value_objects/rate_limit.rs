//! Rate limit value objects

use crate::constants::{
    DEFAULT_ORGANIZATION_ID, HEADER_RATE_LIMIT_LIMIT, HEADER_RATE_LIMIT_REMAINING,
    HEADER_RETRY_AFTER, RATE_LIMIT_DEFAULT_BURST_ALLOWANCE, RATE_LIMIT_DEFAULT_REQ_PER_HOUR,
    RATE_LIMIT_DEFAULT_REQ_PER_MINUTE,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request budget for one (integration, organization) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Steady requests allowed per minute
    pub req_per_minute: u32,
    /// Requests allowed per hour
    pub req_per_hour: u32,
    /// Extra requests allowed above the minute cap
    pub burst_allowance: u32,
    /// When false every request is admitted
    pub enabled: bool,
    /// Last modification time in the store
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            req_per_minute: RATE_LIMIT_DEFAULT_REQ_PER_MINUTE,
            req_per_hour: RATE_LIMIT_DEFAULT_REQ_PER_HOUR,
            burst_allowance: RATE_LIMIT_DEFAULT_BURST_ALLOWANCE,
            enabled: true,
            last_updated: None,
        }
    }
}

impl RateLimitConfig {
    /// Create an enabled config
    pub fn new(req_per_minute: u32, req_per_hour: u32, burst_allowance: u32) -> Self {
        Self {
            req_per_minute,
            req_per_hour,
            burst_allowance,
            enabled: true,
            last_updated: None,
        }
    }

    /// Effective per-minute cap including the burst allowance
    pub fn minute_cap(&self) -> u32 {
        self.req_per_minute.saturating_add(self.burst_allowance)
    }
}

/// Store key: integration plus organization (or `_default`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RateLimitKey {
    /// Integration name (the calling system)
    pub integration: String,
    /// Organization identifier, `_default` for integration-wide settings
    pub organization: String,
}

impl RateLimitKey {
    /// Key for a specific organization
    pub fn new(integration: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            integration: integration.into(),
            organization: organization.into(),
        }
    }

    /// Integration-wide default key
    pub fn integration_default(integration: impl Into<String>) -> Self {
        Self::new(integration, DEFAULT_ORGANIZATION_ID)
    }

    /// Whether this is an integration-wide default key
    pub fn is_default(&self) -> bool {
        self.organization == DEFAULT_ORGANIZATION_ID
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.integration, self.organization)
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Minute cap (including burst) reached
    MinuteLimitExceeded,
    /// Hourly cap reached
    HourLimitExceeded,
}

impl DenyReason {
    /// Wire label of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MinuteLimitExceeded => "minute_limit_exceeded",
            Self::HourLimitExceeded => "hour_limit_exceeded",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an admission check
///
/// A deny is a value, not an error: callers translate it to a 429 using
/// [`AdmissionDecision::headers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Deny reason, set only when `allowed` is false
    pub reason: Option<DenyReason>,
    /// Seconds until a retry may succeed, set only on deny
    pub retry_after_secs: Option<u64>,
    /// Effective per-minute limit
    pub limit: u32,
    /// Remaining budget after this request
    pub remaining: u32,
    /// Internal error swallowed by fail-open admission
    pub diagnostic: Option<String>,
}

impl AdmissionDecision {
    /// Admission without any limit applied
    pub fn unlimited() -> Self {
        Self {
            allowed: true,
            reason: None,
            retry_after_secs: None,
            limit: u32::MAX,
            remaining: u32::MAX,
            diagnostic: None,
        }
    }

    /// Admission within a configured budget
    pub fn admitted(limit: u32, remaining: u32) -> Self {
        Self {
            limit,
            remaining,
            ..Self::unlimited()
        }
    }

    /// Deny with the reason and retry hint
    pub fn denied(reason: DenyReason, retry_after_secs: u64, limit: u32) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            retry_after_secs: Some(retry_after_secs),
            limit,
            remaining: 0,
            diagnostic: None,
        }
    }

    /// Admission because the limiter itself failed
    pub fn fail_open(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..Self::unlimited()
        }
    }

    /// Response headers describing this decision
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(3);
        if self.limit != u32::MAX {
            headers.push((HEADER_RATE_LIMIT_LIMIT, self.limit.to_string()));
            headers.push((HEADER_RATE_LIMIT_REMAINING, self.remaining.to_string()));
        }
        if let Some(retry_after) = self.retry_after_secs {
            headers.push((HEADER_RETRY_AFTER, retry_after.to_string()));
        }
        headers
    }
}
