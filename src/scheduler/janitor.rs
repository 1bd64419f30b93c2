use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::data::{invite::InviteRepository, team::TeamRepository};
use crate::error::AppError;
use crate::service::team::{
    invitation::InvitationWorkflow, membership::MembershipService, TeamLocks,
};

/// How long resolved invitations are kept before the janitor deletes them.
const RESOLVED_INVITE_RETENTION_DAYS: i64 = 7;

/// Starts the janitor scheduler
///
/// The janitor runs on the configured cron expression and performs:
/// - Invite expiry: pending invitations past their deadline become expired
/// - Team reclamation: single-member teams idle beyond the threshold are
///   disbanded as if by an administrative force-disband, attributed to the
///   system
/// - Housekeeping: old resolved invitations and unused lock entries are
///   dropped
///
/// Both sweeps reuse the serialized mutation paths commands use, so they are
/// safe to run concurrently with normal traffic and idempotent.
///
/// # Arguments
/// - `cron`: Six-field cron expression for the sweep cadence
/// - `teams`: Team repository, for finding idle teams
/// - `invites`: Invite repository, for retention of resolved records
/// - `membership`: Membership service, for the disband path
/// - `invitations`: Invitation workflow, for the expiry path
/// - `locks`: Shared lock sections, for purging unused entries
/// - `idle_after`: Inactivity threshold for single-member team reclamation
#[allow(clippy::too_many_arguments)]
pub async fn start_janitor(
    cron: &str,
    teams: TeamRepository,
    invites: InviteRepository,
    membership: MembershipService,
    invitations: InvitationWorkflow,
    locks: Arc<TeamLocks>,
    idle_after: Duration,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let teams = teams.clone();
        let invites = invites.clone();
        let membership = membership.clone();
        let invitations = invitations.clone();
        let locks = locks.clone();

        Box::pin(async move {
            run_sweeps(&teams, &invites, &membership, &invitations, idle_after).await;
            locks.purge_unused();
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Janitor scheduler started ({})", cron);

    Ok(())
}

/// Runs all janitor sweeps once, logging failures per sweep.
pub(crate) async fn run_sweeps(
    teams: &TeamRepository,
    invites: &InviteRepository,
    membership: &MembershipService,
    invitations: &InvitationWorkflow,
    idle_after: Duration,
) {
    let expired = invitations.expire_stale(Utc::now()).await;
    if expired > 0 {
        tracing::info!("Janitor expired {} stale invites", expired);
    }

    let reaped = reap_idle_teams(teams, membership, idle_after).await;
    if reaped > 0 {
        tracing::info!("Janitor reaped {} idle teams", reaped);
    }

    let cutoff = Utc::now() - Duration::days(RESOLVED_INVITE_RETENTION_DAYS);
    match invites.remove_resolved_before(cutoff).await {
        Ok(0) => {}
        Ok(removed) => tracing::info!("Janitor deleted {} old resolved invites", removed),
        Err(e) => tracing::error!("Error deleting old resolved invites: {}", e),
    }
}

/// Disbands every single-member team idle beyond the threshold.
pub(crate) async fn reap_idle_teams(
    teams: &TeamRepository,
    membership: &MembershipService,
    idle_after: Duration,
) -> usize {
    let cutoff = Utc::now() - idle_after;
    let mut reaped = 0;

    for team in teams.idle_single_member_teams(cutoff).await {
        // The scan ran outside the team lock; re-check before disbanding so
        // a team that just gained a member or activity is spared
        let current = match teams.get(&team.id).await {
            Some(current) if current.members.len() == 1 && current.last_activity_at < cutoff => {
                current
            }
            _ => continue,
        };

        match membership.force_disband(&current.id, None).await {
            Ok(_) => reaped += 1,
            Err(e) => tracing::error!("Error reaping idle team {}: {}", current.id, e),
        }
    }

    reaped
}
