//! Deposit registration payloads
//!
//! The standard payload is the backend-neutral request shape accepted at the
//! ingress. Each provider adapter maps it into its own wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal address of the rented property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyAddress {
    /// First address line
    pub line1: String,
    /// Second address line
    #[serde(default)]
    pub line2: Option<String>,
    /// Town or city
    pub town: String,
    /// Postcode
    pub postcode: String,
}

/// A landlord or tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
}

/// Backend-neutral deposit registration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardDepositPayload {
    /// Caller's reference for the tenancy
    pub deposit_reference: String,
    /// Deposit amount in pounds
    pub deposit_amount: f64,
    /// Monthly rent in pounds
    pub rent_amount: f64,
    /// Tenancy start date
    pub tenancy_start_date: NaiveDate,
    /// Tenancy end date, if fixed term
    #[serde(default)]
    pub tenancy_end_date: Option<NaiveDate>,
    /// Rented property
    pub property: PropertyAddress,
    /// Landlord
    pub landlord: Party,
    /// Tenants; at least one is required by both backends
    pub tenants: Vec<Party>,
}

/// Organization credentials forwarded to the backends
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgCredentials {
    /// Member identifier at the deposit scheme
    pub member_id: String,
    /// Branch identifier at the deposit scheme
    pub branch_id: String,
    /// API key issued to the member
    pub api_key: String,
}

impl fmt::Debug for OrgCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrgCredentials")
            .field("member_id", &self.member_id)
            .field("branch_id", &self.branch_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Operation requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum DepositAction {
    /// Register a deposit
    Create {
        /// Payload to register
        payload: StandardDepositPayload,
    },
    /// Poll a previously registered deposit
    Status {
        /// Identifier issued by the backend
        external_id: String,
    },
}

impl DepositAction {
    /// Label used in logs and telemetry
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Status { .. } => "status",
        }
    }
}
