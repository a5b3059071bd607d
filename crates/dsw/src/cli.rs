//! Command line interface
//!
//! Every command prints a JSON document on stdout; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use dsw_application::use_cases::GatewayRequest;
use dsw_domain::value_objects::{
    DepositAction, EffectiveConfig, ExecutionPlan, OrgCredentials, OrganizationKey,
    ProviderPreference, StandardDepositPayload,
};
use dsw_infrastructure::AppContext;

/// Command line interface for Deposit Switch
#[derive(Parser, Debug)]
#[command(name = "dsw")]
#[command(about = "Deposit Switch - legacy to Salesforce deposit traffic migration")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Organization a command acts for
#[derive(Args, Debug, Clone)]
pub struct OrgArgs {
    /// Agency reference
    #[arg(long)]
    pub agency: String,

    /// Branch identifier
    #[arg(long)]
    pub branch: String,

    /// Organization provider preference (auto, current, salesforce, dual)
    #[arg(long, default_value = "auto", value_parser = parse_preference)]
    pub preference: ProviderPreference,

    /// Member id sent to the backends; defaults to the agency reference
    #[arg(long)]
    pub member_id: Option<String>,

    /// Member API key sent to the backends
    #[arg(long)]
    pub api_key: Option<String>,
}

impl OrgArgs {
    fn organization(&self) -> OrganizationKey {
        OrganizationKey::new(&self.agency, &self.branch)
    }

    fn credentials(&self) -> OrgCredentials {
        OrgCredentials {
            member_id: self.member_id.clone().unwrap_or_else(|| self.agency.clone()),
            branch_id: self.branch.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
        }
    }

    fn request(&self, integration: String, action: DepositAction) -> GatewayRequest {
        GatewayRequest {
            integration,
            organization: self.organization(),
            preference: self.preference,
            credentials: self.credentials(),
            action,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the effective configuration and execution plan for an organization
    Plan {
        #[command(flatten)]
        org: OrgArgs,
    },
    /// Register a deposit from a JSON payload file
    Create {
        /// Calling integration, used for rate limiting
        #[arg(long)]
        integration: String,

        #[command(flatten)]
        org: OrgArgs,

        /// Standard deposit payload (JSON)
        #[arg(long)]
        payload: PathBuf,
    },
    /// Poll a previously registered deposit
    Status {
        /// Calling integration, used for rate limiting
        #[arg(long)]
        integration: String,

        #[command(flatten)]
        org: OrgArgs,

        /// Identifier issued by the backend
        #[arg(long)]
        external_id: String,
    },
    /// Probe both backends
    Health,
    /// Print the loaded configuration
    Config,
}

const REDACTED: &str = "<redacted>";

#[derive(Serialize)]
struct PlanOutput {
    effective: EffectiveConfig,
    plan: ExecutionPlan,
}

fn parse_preference(value: &str) -> Result<ProviderPreference, String> {
    value.parse().map_err(|e: dsw_domain::error::Error| e.to_string())
}

fn read_payload(path: &Path) -> anyhow::Result<StandardDepositPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid deposit payload in {}", path.display()))
}

/// Run a command against a wired application
///
/// Throttled requests are a successful result; provider failures on a
/// single-provider plan are errors.
pub async fn execute(context: &AppContext, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::Plan { org } => {
            let (effective, plan) = context
                .gateway
                .plan(&org.organization(), org.preference)
                .await?;
            serde_json::to_value(PlanOutput { effective, plan })?
        }
        Command::Create {
            integration,
            org,
            payload,
        } => {
            let payload = read_payload(&payload)?;
            let request = org.request(integration, DepositAction::Create { payload });
            serde_json::to_value(context.gateway.handle(&request).await?)?
        }
        Command::Status {
            integration,
            org,
            external_id,
        } => {
            let request = org.request(integration, DepositAction::Status { external_id });
            serde_json::to_value(context.gateway.handle(&request).await?)?
        }
        Command::Health => serde_json::to_value(context.gateway.health().await)?,
        Command::Config => {
            let mut config = context.config.as_ref().clone();
            for endpoint in [&mut config.providers.legacy, &mut config.providers.salesforce] {
                if endpoint.api_key.is_some() {
                    endpoint.api_key = Some(REDACTED.to_string());
                }
            }
            serde_json::to_value(config)?
        }
    };
    Ok(output)
}
