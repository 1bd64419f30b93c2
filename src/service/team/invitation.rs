//! Invitation issue/respond workflow.
//!
//! Invitations are the only path into an existing team. Issuance and
//! acceptance serialize on both the team and the target player, and
//! acceptance re-validates everything that may have changed since issuance:
//! the target may have joined another team, the team may have filled up or
//! disbanded. The TTL is checked transactionally at the moment of response,
//! not only by the janitor sweep.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::data::{invite::InviteRepository, team::TeamRepository};
use crate::error::{team::TeamError, AppError};
use crate::gateway::{DirectMessage, NotificationGateway, VoiceRoomProvisioner};
use crate::model::invite::{Invitation, InviteDecision, InviteStatus};
use crate::model::team::PlayerId;
use crate::service::team::{membership::MembershipService, TeamLocks};
use crate::util::ids;

/// Length of generated invitation ids. Long enough to be unguessable.
const INVITE_ID_LENGTH: usize = 24;

/// Outcome of a `respond` call, for the command layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum RespondOutcome {
    /// The target accepted and is now a member.
    Joined(crate::model::team::Team),
    /// The target declined.
    Declined,
}

/// Issues, resolves, and expires team invitations.
///
/// Cheap to clone; clones share state with the [`MembershipService`] they
/// were built from.
#[derive(Clone)]
pub struct InvitationWorkflow {
    membership: MembershipService,
    teams: TeamRepository,
    invites: InviteRepository,
    voice: Arc<dyn VoiceRoomProvisioner>,
    notifier: Arc<dyn NotificationGateway>,
    locks: Arc<TeamLocks>,
    invite_ttl: Duration,
}

impl InvitationWorkflow {
    pub fn new(membership: MembershipService, invite_ttl: Duration) -> Self {
        Self {
            teams: membership.teams.clone(),
            invites: membership.invites.clone(),
            voice: membership.voice.clone(),
            notifier: membership.notifier.clone(),
            locks: membership.locks.clone(),
            membership,
            invite_ttl,
        }
    }

    /// Invites a player to the caller's team. Leader only.
    ///
    /// A pending invitation past its deadline does not block a new one; it
    /// is expired on the spot.
    ///
    /// # Returns
    /// - `Ok(Invitation)` - Persisted invitation; the target has been
    ///   notified best-effort with accept/deny affordances
    /// - `Err(TeamError::NotOnTeam)` / `Err(TeamError::NotLeader)` - Caller
    ///   does not lead a team
    /// - `Err(TeamError::AlreadyOnTeam)` - Target already belongs to a team
    /// - `Err(TeamError::TeamFull)` - No room for the target
    /// - `Err(TeamError::InvitePending)` - An unexpired invitation for this
    ///   pair already exists
    pub async fn invite(&self, caller: PlayerId, target: PlayerId) -> Result<Invitation, AppError> {
        let team_id = self
            .teams
            .team_id_of(caller)
            .await
            .ok_or(TeamError::NotOnTeam)?;

        let _team_lock = self.locks.team(&team_id).await;
        let _target_lock = self.locks.player(target).await;

        let team = self.teams.get(&team_id).await.ok_or(TeamError::NotOnTeam)?;
        if team.leader_id != caller {
            return Err(TeamError::NotLeader.into());
        }
        if self.teams.team_id_of(target).await.is_some() {
            return Err(TeamError::AlreadyOnTeam.into());
        }
        if team.members.len() >= self.membership.max_team_size {
            return Err(TeamError::TeamFull.into());
        }

        let now = Utc::now();
        if let Some(existing) = self.invites.pending_for(&team_id, target).await {
            if existing.is_expired(now) {
                self.invites
                    .set_status(&existing.id, InviteStatus::Expired)
                    .await?;
            } else {
                return Err(TeamError::InvitePending.into());
            }
        }

        let invite = Invitation::new(
            ids::random_id(INVITE_ID_LENGTH),
            team_id,
            caller,
            target,
            now,
            self.invite_ttl,
        );
        self.invites.insert(invite.clone()).await?;

        tracing::info!(
            "Player {} invited {} to team {} (invite {})",
            caller,
            target,
            team.name,
            invite.id
        );

        self.notifier
            .send_direct(
                target,
                DirectMessage::invite(
                    "Team invite",
                    format!(
                        "<@{}> invited you to join **{}**. The invite expires <t:{}:R>.",
                        caller,
                        team.name,
                        invite.expires_at.timestamp()
                    ),
                    &invite.id,
                ),
            )
            .await;

        Ok(invite)
    }

    /// Accepts or denies an invitation on behalf of its target.
    ///
    /// The record is re-read after the locks are held and every decision is
    /// made against that read. Acceptance re-validates that the responder is
    /// still teamless and the team still has room; when either no longer
    /// holds the invitation is resolved to a terminal non-accepted state and
    /// the corresponding conflict is returned.
    ///
    /// # Returns
    /// - `Ok(RespondOutcome)` - Joined or declined
    /// - `Err(TeamError::InviteNotFound)` - Unknown invitation id
    /// - `Err(TeamError::AlreadyResolved)` - The invitation is terminal
    /// - `Err(TeamError::InviteExpired)` - TTL passed; the record is marked
    ///   expired as a side effect
    /// - `Err(TeamError::NotYourInvite)` - Responder is not the target
    /// - `Err(TeamError::AlreadyOnTeam)` / `Err(TeamError::TeamNotFound)` /
    ///   `Err(TeamError::TeamFull)` - Acceptance re-validation failed
    pub async fn respond(
        &self,
        responder: PlayerId,
        invite_id: &str,
        decision: InviteDecision,
    ) -> Result<RespondOutcome, AppError> {
        // First read only locates the team key; all decisions are made
        // against the re-read below, under the locks.
        let invite = self
            .invites
            .get(invite_id)
            .await
            .ok_or(TeamError::InviteNotFound)?;

        let _team_lock = self.locks.team(&invite.team_id).await;
        let _target_lock = self.locks.player(invite.target_player_id).await;

        let invite = self
            .invites
            .get(invite_id)
            .await
            .ok_or(TeamError::InviteNotFound)?;
        if invite.status.is_terminal() {
            return Err(TeamError::AlreadyResolved.into());
        }

        let now = Utc::now();
        if invite.is_expired(now) {
            self.invites
                .set_status(invite_id, InviteStatus::Expired)
                .await?;
            return Err(TeamError::InviteExpired.into());
        }

        if responder != invite.target_player_id {
            return Err(TeamError::NotYourInvite.into());
        }

        match decision {
            InviteDecision::Deny => {
                self.invites
                    .set_status(invite_id, InviteStatus::Denied)
                    .await?;

                tracing::info!("Player {} denied invite {}", responder, invite.id);

                self.notifier
                    .send_direct(
                        invite.inviter_id,
                        DirectMessage::text(
                            "Invite declined",
                            format!("<@{}> declined your team invite.", responder),
                        ),
                    )
                    .await;

                Ok(RespondOutcome::Declined)
            }
            InviteDecision::Accept => {
                let team = match self.membership.add_member(&invite.team_id, responder).await {
                    Ok(team) => team,
                    Err(err) => {
                        // The world moved on since issuance; the invitation
                        // is spent either way
                        self.resolve_unusable(invite_id).await;
                        return Err(err);
                    }
                };
                self.invites
                    .set_status(invite_id, InviteStatus::Accepted)
                    .await?;

                tracing::info!(
                    "Player {} accepted invite {} and joined team {} ({})",
                    responder,
                    invite.id,
                    team.name,
                    team.id
                );

                if let Some(channel) = team.voice_channel_id {
                    if let Err(e) = self.voice.grant_access(channel, responder).await {
                        tracing::warn!("Failed to grant voice access for {}: {}", responder, e);
                    }
                }
                self.notifier
                    .send_direct(
                        invite.inviter_id,
                        DirectMessage::text(
                            "Invite accepted",
                            format!("<@{}> joined your team **{}**.", responder, team.name),
                        ),
                    )
                    .await;

                Ok(RespondOutcome::Joined(team))
            }
        }
    }

    /// Expires every pending invitation past its deadline. Janitor entry
    /// point; each record goes through the same serialized path a response
    /// would.
    ///
    /// # Returns
    /// - `usize` - Number of invitations expired
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> usize {
        let stale = self.invites.expired_pending(now).await;
        let mut expired = 0;

        for invite in stale {
            let _team_lock = self.locks.team(&invite.team_id).await;
            let _target_lock = self.locks.player(invite.target_player_id).await;

            // A response may have resolved it while we waited for the locks
            match self.invites.get(&invite.id).await {
                Some(current) if current.status == InviteStatus::Pending => {
                    match self
                        .invites
                        .set_status(&invite.id, InviteStatus::Expired)
                        .await
                    {
                        Ok(_) => expired += 1,
                        Err(e) => {
                            tracing::error!("Failed to expire invite {}: {}", invite.id, e)
                        }
                    }
                }
                _ => {}
            }
        }

        expired
    }

    /// Marks an invitation whose acceptance re-validation failed as expired,
    /// logging rather than propagating storage failures: the caller already
    /// has a more useful domain error to return.
    async fn resolve_unusable(&self, invite_id: &str) {
        if let Err(e) = self
            .invites
            .set_status(invite_id, InviteStatus::Expired)
            .await
        {
            tracing::error!("Failed to resolve unusable invite {}: {}", invite_id, e);
        }
    }
}
