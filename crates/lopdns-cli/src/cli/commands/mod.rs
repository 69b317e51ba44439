//! Command implementations.
//!
//! One invocation runs one action: authenticate, resolve the target zones,
//! run the action, report. The first failure ends the run; once a token has
//! been obtained it is given back before returning the error.

pub mod records;
pub mod tasks;
pub mod zones;

use lopdns::LopDnsClient;
use tracing::{info, warn};

use crate::cli::args::Action;
use crate::config::Settings;
use crate::error::CommandError;

/// Shared context for all commands.
pub struct Context {
    /// Authenticated API client
    pub client: LopDnsClient,

    /// Resolved settings for this invocation
    pub settings: Settings,
}

impl Context {
    /// Zones the action applies to: the requested zone if it exists, else
    /// every zone of the account.
    pub async fn target_zones(&self) -> Result<Vec<String>, CommandError> {
        let zones = self.client.zones().list().await?;

        match &self.settings.zone {
            Some(zone) => {
                if zones.iter().any(|z| z == zone) {
                    Ok(vec![zone.clone()])
                } else {
                    Err(CommandError::ZoneNotFound(zone.clone()))
                }
            }
            None if zones.is_empty() => Err(CommandError::NoZonesAvailable),
            None => Ok(zones),
        }
    }
}

/// Authenticate, run the requested action, and clean up the token on failure.
pub async fn execute(settings: Settings) -> Result<(), CommandError> {
    let client = LopDnsClient::builder()
        .base_url(&settings.base_url)
        .timeout(settings.timeout)
        .build()
        .map_err(|e| CommandError::InvalidArguments(e.to_string()))?;

    client
        .auth()
        .authenticate(&settings.client_id, settings.token_duration)
        .await
        .map_err(|e| CommandError::AuthenticationFailed(e.to_string()))?;

    let ctx = Context { client, settings };

    let result = if ctx.client.auth().validate().await {
        dispatch(&ctx).await
    } else {
        Err(CommandError::AuthenticationFailed(
            "the API did not accept the new token".to_string(),
        ))
    };

    if let Err(e) = &result {
        warn!(error = %e, "giving up, invalidating token");
        if !ctx.client.auth().invalidate().await {
            warn!("token invalidation failed");
        }
    }

    result
}

async fn dispatch(ctx: &Context) -> Result<(), CommandError> {
    let zones = ctx.target_zones().await?;
    info!(action = %ctx.settings.action, zones = zones.len(), "running action");

    match ctx.settings.action {
        Action::GetZones => zones::get_zones(ctx, &zones),
        Action::GetRecords => records::get_records(ctx, &zones).await,
        Action::CreateRecord => records::create_record(ctx).await,
        Action::UpdateRecord => records::update_records(ctx, false).await,
        Action::CreateOrUpdateRecord => records::update_records(ctx, true).await,
        Action::DeleteRecord => records::delete_records(ctx).await,
        Action::RunTasks => tasks::run_tasks(ctx, &zones).await,
    }
}
