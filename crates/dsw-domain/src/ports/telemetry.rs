//! Comparison telemetry ports

use crate::error::Result;
use crate::value_objects::{ComparisonResult, OrganizationKey, RoutingMode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One dual-execution comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Request the comparison belongs to
    pub request_id: Uuid,
    /// Mode the request was routed under
    pub mode: RoutingMode,
    /// Organization, when the request was organization scoped
    pub organization: Option<OrganizationKey>,
    /// Action label (`create`, `status`)
    pub action: String,
    /// Comparison of the two outcomes
    pub comparison: ComparisonResult,
    /// Legacy call duration
    pub legacy_duration_ms: u64,
    /// New call duration
    pub new_duration_ms: u64,
    /// When the comparison was made
    pub recorded_at: DateTime<Utc>,
}

/// Request-path sink for comparison records
///
/// Submission must not block or fail the request; implementations hand the
/// record to a background executor.
pub trait ComparisonSink: Send + Sync {
    /// Queue a record for processing
    fn submit(&self, record: ComparisonRecord);
}

/// Durable destination for comparison records
#[async_trait]
pub trait ComparisonStore: Send + Sync {
    /// Persist one record
    async fn persist(&self, record: &ComparisonRecord) -> Result<()>;
}
