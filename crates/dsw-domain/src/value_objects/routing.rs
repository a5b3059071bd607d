//! Routing value objects
//!
//! Modes, provider identities and the execution plan produced by the
//! routing decision engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identity
///
/// `Legacy` is the current production backend; `New` is the Salesforce
/// backend traffic is being migrated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Current production backend
    Legacy,
    /// Salesforce backend
    New,
}

impl ProviderKind {
    /// Both providers in execution order
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Legacy, ProviderKind::New];

    /// Stable label used in config, logs and telemetry
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::New => "new",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "new" => Ok(Self::New),
            other => Err(Error::config_validation(format!(
                "invalid active provider '{other}', expected one of: legacy, new"
            ))),
        }
    }
}

/// Policy selecting which backend(s) serve a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    /// Only the legacy backend
    LegacyOnly,
    /// Only the Salesforce backend
    SalesforceOnly,
    /// Both backends, new result preferred
    Both,
    /// Both backends, legacy result always returned
    Shadow,
    /// Percentage-based draw between the backends
    Forwarding,
}

impl RoutingMode {
    /// Every valid mode
    pub const ALL: [RoutingMode; 5] = [
        RoutingMode::LegacyOnly,
        RoutingMode::SalesforceOnly,
        RoutingMode::Both,
        RoutingMode::Shadow,
        RoutingMode::Forwarding,
    ];

    /// Configuration label of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyOnly => "legacy-only",
            Self::SalesforceOnly => "salesforce-only",
            Self::Both => "both",
            Self::Shadow => "shadow",
            Self::Forwarding => "forwarding",
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                Error::config_validation(format!(
                    "invalid routing mode '{s}', expected one of: legacy-only, salesforce-only, both, shadow, forwarding"
                ))
            })
    }
}

/// Per-organization provider preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPreference {
    /// Follow the global configuration
    #[default]
    Auto,
    /// Pin to the legacy backend
    Current,
    /// Pin to the Salesforce backend
    Salesforce,
    /// Run both backends and compare
    Dual,
}

impl ProviderPreference {
    /// Configuration label of the preference
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Current => "current",
            Self::Salesforce => "salesforce",
            Self::Dual => "dual",
        }
    }
}

impl fmt::Display for ProviderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderPreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "current" => Ok(Self::Current),
            "salesforce" => Ok(Self::Salesforce),
            "dual" => Ok(Self::Dual),
            other => Err(Error::invalid_argument(format!(
                "invalid provider preference '{other}', expected one of: auto, current, salesforce, dual"
            ))),
        }
    }
}

/// Which backend(s) a plan targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingTarget {
    /// Legacy backend only
    Legacy,
    /// Salesforce backend only
    New,
    /// Both backends
    Both,
}

impl From<ProviderKind> for RoutingTarget {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Legacy => Self::Legacy,
            ProviderKind::New => Self::New,
        }
    }
}

/// Concrete execution plan for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Logical target of the request
    pub target: RoutingTarget,
    /// Adapters to invoke, in a stable order
    pub execute: Vec<ProviderKind>,
    /// Provider whose result must be surfaced regardless of the others
    pub return_from: Option<ProviderKind>,
}

impl ExecutionPlan {
    /// Plan that runs a single provider
    pub fn single(kind: ProviderKind) -> Self {
        Self {
            target: kind.into(),
            execute: vec![kind],
            return_from: None,
        }
    }

    /// Plan that runs both providers
    pub fn dual(return_from: Option<ProviderKind>) -> Self {
        let target = return_from.map_or(RoutingTarget::Both, RoutingTarget::from);
        Self {
            target,
            execute: ProviderKind::ALL.to_vec(),
            return_from,
        }
    }

    /// Whether more than one adapter runs
    pub fn is_dual(&self) -> bool {
        self.execute.len() > 1
    }
}
