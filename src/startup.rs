//! Initialization of storage, services, and the janitor.

use serenity::http::Http;
use std::sync::Arc;

use crate::config::Config;
use crate::data::{invite::InviteRepository, team::TeamRepository};
use crate::error::AppError;
use crate::gateway::discord::{DiscordNotifier, DiscordVoiceProvisioner};
use crate::gateway::permissions::DiscordPermissionOracle;
use crate::scheduler::janitor;
use crate::service::team::{
    invitation::InvitationWorkflow, membership::MembershipService, TeamLocks,
};
use crate::state::AppState;

/// Loads the persisted documents, wires the services, and starts the
/// janitor.
///
/// The returned state is what the command-dispatch layer drives; this
/// function must complete before any command is accepted.
///
/// # Arguments
/// - `config` - Application configuration
///
/// # Returns
/// - `Ok(AppState)` - Initialized services with the janitor running
/// - `Err(AppError)` - Storage load or scheduler startup failed
pub async fn init(config: &Config) -> Result<AppState, AppError> {
    let teams = TeamRepository::load(config.data_dir.join("teams.json")).await?;
    let invites = InviteRepository::load(config.data_dir.join("invites.json")).await?;

    let http = Arc::new(Http::new(&config.discord_bot_token));

    let voice = Arc::new(DiscordVoiceProvisioner::new(
        http.clone(),
        config.guild_id,
        config.voice_category_id,
    ));
    let notifier = Arc::new(DiscordNotifier::new(http.clone()));
    let permissions = Arc::new(DiscordPermissionOracle::new(
        http.clone(),
        config.guild_id,
        config.admin_role_id,
    ));

    let locks = Arc::new(TeamLocks::new());
    let membership = MembershipService::new(
        teams.clone(),
        invites.clone(),
        voice,
        notifier,
        locks.clone(),
        config.max_team_size,
    );
    let invitations = InvitationWorkflow::new(membership.clone(), config.invite_ttl());

    janitor::start_janitor(
        &config.janitor_cron,
        teams,
        invites,
        membership.clone(),
        invitations.clone(),
        locks,
        config.idle_team_threshold(),
    )
    .await?;

    tracing::info!(
        "Team services initialized ({} max members, {}h invite TTL)",
        config.max_team_size,
        config.invite_ttl_hours
    );

    Ok(AppState::new(membership, invitations, permissions, http))
}
