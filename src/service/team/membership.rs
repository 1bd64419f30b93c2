//! Team membership state machine.
//!
//! Create, leave, kick, transfer, and disband, with every invariant of the
//! membership domain enforced here: one team per player, 1..=capacity
//! members, the leader always a member. Durable state is committed before
//! any collaborator call; voice-room and notification failures are logged
//! and never roll back a committed membership change.

use std::sync::Arc;

use crate::data::{invite::InviteRepository, team::TeamRepository};
use crate::error::{team::TeamError, AppError};
use crate::gateway::{DirectMessage, NotificationGateway, VoiceRoomProvisioner};
use crate::model::invite::InviteStatus;
use crate::model::team::{PlayerId, Team, TeamId};
use crate::service::team::TeamLocks;
use crate::util::ids;

/// Length of generated team ids.
const TEAM_ID_LENGTH: usize = 12;

/// Bounds on a trimmed team name, in characters.
const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 20;

/// Outcome of a `leave` call, for the command layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveOutcome {
    /// The caller left; the team lives on.
    Left(Team),
    /// The caller was the leader; the whole team was disbanded.
    Disbanded(Team),
}

/// Core state machine for team membership.
///
/// Cheap to clone; clones share repositories, locks, and collaborators.
#[derive(Clone)]
pub struct MembershipService {
    pub(super) teams: TeamRepository,
    pub(super) invites: InviteRepository,
    pub(super) voice: Arc<dyn VoiceRoomProvisioner>,
    pub(super) notifier: Arc<dyn NotificationGateway>,
    pub(super) locks: Arc<TeamLocks>,
    pub(super) max_team_size: usize,
}

impl MembershipService {
    pub fn new(
        teams: TeamRepository,
        invites: InviteRepository,
        voice: Arc<dyn VoiceRoomProvisioner>,
        notifier: Arc<dyn NotificationGateway>,
        locks: Arc<TeamLocks>,
        max_team_size: usize,
    ) -> Self {
        Self {
            teams,
            invites,
            voice,
            notifier,
            locks,
            max_team_size,
        }
    }

    /// Creates a new team with the caller as leader and only member.
    ///
    /// The team record is committed first; voice-room provisioning runs
    /// afterwards and its outcome is recorded against the team whether or
    /// not it succeeds.
    ///
    /// # Returns
    /// - `Ok(Team)` - The created team
    /// - `Err(TeamError::InvalidName)` - Trimmed name outside 2-20 characters
    /// - `Err(TeamError::AlreadyOnTeam)` - Caller already belongs to a team
    /// - `Err(TeamError::NameTaken)` - Name collides case-insensitively
    pub async fn create_team(&self, caller: PlayerId, name: &str) -> Result<Team, AppError> {
        let name = name.trim();
        let chars = name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
            return Err(TeamError::InvalidName.into());
        }

        let _caller_lock = self.locks.player(caller).await;

        if self.teams.team_id_of(caller).await.is_some() {
            return Err(TeamError::AlreadyOnTeam.into());
        }
        if self.teams.name_taken(name).await {
            return Err(TeamError::NameTaken.into());
        }

        let team = Team::new(
            ids::random_id(TEAM_ID_LENGTH),
            name,
            caller,
            chrono::Utc::now(),
        );
        self.teams.insert(team.clone()).await?;

        tracing::info!("Player {} created team {} ({})", caller, team.name, team.id);

        // Best-effort provisioning; the outcome is recorded either way
        let channel = match self.voice.create(&team).await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!("Failed to provision voice room for team {}: {}", team.id, e);
                None
            }
        };
        let team = self.teams.set_voice_channel(&team.id, channel).await?;

        Ok(team)
    }

    /// Adds a player to a team. Internal primitive used by invitation
    /// acceptance; the workflow holds the team and player locks when it
    /// calls this.
    ///
    /// # Returns
    /// - `Ok(Team)` - The updated team
    /// - `Err(TeamError::TeamNotFound)` - The team no longer exists
    /// - `Err(TeamError::TeamFull)` - The team is at capacity
    /// - `Err(TeamError::AlreadyOnTeam)` - The player belongs to a team
    ///   already, this one included
    pub(crate) async fn add_member(
        &self,
        team_id: &str,
        player: PlayerId,
    ) -> Result<Team, AppError> {
        let team = self
            .teams
            .get(team_id)
            .await
            .ok_or(TeamError::TeamNotFound)?;
        if team.members.len() >= self.max_team_size {
            return Err(TeamError::TeamFull.into());
        }

        self.teams.add_member(team_id, player).await
    }

    /// Removes the caller from their team.
    ///
    /// A departing leader takes the team down with them: the full disband
    /// cascade runs and every other member is notified. A departing member
    /// just leaves; the leader is notified.
    pub async fn leave(&self, caller: PlayerId) -> Result<LeaveOutcome, AppError> {
        let team_id = self
            .teams
            .team_id_of(caller)
            .await
            .ok_or(TeamError::NotOnTeam)?;

        let _team_lock = self.locks.team(&team_id).await;

        // The team may have disbanded while we waited for the lock
        let team = self.teams.get(&team_id).await.ok_or(TeamError::NotOnTeam)?;
        if !team.members.contains(&caller) {
            return Err(TeamError::NotOnTeam.into());
        }

        if team.leader_id == caller {
            let team = self.disband_locked(team, Some(caller)).await?;
            return Ok(LeaveOutcome::Disbanded(team));
        }

        let team = self.teams.remove_member(&team_id, caller).await?;

        tracing::info!("Player {} left team {} ({})", caller, team.name, team.id);

        if let Some(channel) = team.voice_channel_id {
            if let Err(e) = self.voice.revoke_access(channel, caller).await {
                tracing::warn!("Failed to revoke voice access for {}: {}", caller, e);
            }
        }
        self.notifier
            .send_direct(
                team.leader_id,
                DirectMessage::text(
                    "Member left",
                    format!("<@{}> left your team **{}**.", caller, team.name),
                ),
            )
            .await;

        Ok(LeaveOutcome::Left(team))
    }

    /// Removes another member from the caller's team. Leader only.
    ///
    /// # Returns
    /// - `Ok(Team)` - The updated team
    /// - `Err(TeamError::NotOnTeam)` - Caller has no team
    /// - `Err(TeamError::NotLeader)` - Caller is not the leader
    /// - `Err(TeamError::SelfTarget)` - Caller targeted themselves
    /// - `Err(TeamError::NotAMember)` - Target is not on the team
    pub async fn kick(&self, caller: PlayerId, target: PlayerId) -> Result<Team, AppError> {
        let team_id = self
            .teams
            .team_id_of(caller)
            .await
            .ok_or(TeamError::NotOnTeam)?;

        let _team_lock = self.locks.team(&team_id).await;

        let team = self.teams.get(&team_id).await.ok_or(TeamError::NotOnTeam)?;
        if team.leader_id != caller {
            return Err(TeamError::NotLeader.into());
        }
        if target == caller {
            return Err(TeamError::SelfTarget.into());
        }
        if !team.members.contains(&target) {
            return Err(TeamError::NotAMember.into());
        }

        let team = self.teams.remove_member(&team_id, target).await?;

        tracing::info!(
            "Player {} kicked {} from team {} ({})",
            caller,
            target,
            team.name,
            team.id
        );

        if let Some(channel) = team.voice_channel_id {
            if let Err(e) = self.voice.revoke_access(channel, target).await {
                tracing::warn!("Failed to revoke voice access for {}: {}", target, e);
            }
        }
        self.notifier
            .send_direct(
                target,
                DirectMessage::text(
                    "Removed from team",
                    format!("You were removed from team **{}**.", team.name),
                ),
            )
            .await;

        Ok(team)
    }

    /// Hands leadership to another member of the caller's team.
    pub async fn transfer_leadership(
        &self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<Team, AppError> {
        let team_id = self
            .teams
            .team_id_of(caller)
            .await
            .ok_or(TeamError::NotOnTeam)?;

        let _team_lock = self.locks.team(&team_id).await;

        let team = self.teams.get(&team_id).await.ok_or(TeamError::NotOnTeam)?;
        if team.leader_id != caller {
            return Err(TeamError::NotLeader.into());
        }
        if target == caller {
            return Err(TeamError::SelfTarget.into());
        }

        let team = self.teams.set_leader(&team_id, target).await?;

        tracing::info!(
            "Player {} transferred leadership of team {} ({}) to {}",
            caller,
            team.name,
            team.id,
            target
        );

        self.notifier
            .send_direct(
                target,
                DirectMessage::text(
                    "Team leadership",
                    format!("You are now the leader of team **{}**.", team.name),
                ),
            )
            .await;

        Ok(team)
    }

    /// Disbands a team on behalf of an administrator or the janitor.
    ///
    /// `initiator` is the player who triggered the disband, or `None` when
    /// the system did. Same cascade as a leader leaving.
    pub async fn force_disband(
        &self,
        team_id: &str,
        initiator: Option<PlayerId>,
    ) -> Result<Team, AppError> {
        let _team_lock = self.locks.team(team_id).await;

        let team = self
            .teams
            .get(team_id)
            .await
            .ok_or(TeamError::TeamNotFound)?;
        self.disband_locked(team, initiator).await
    }

    /// Disband cascade. Caller must hold the team lock.
    ///
    /// Durable state goes first: the team record and all index entries in
    /// one commit, then every pending invitation resolved to a terminal
    /// state. Voice-room deletion and member notifications follow,
    /// best-effort.
    async fn disband_locked(
        &self,
        team: Team,
        initiator: Option<PlayerId>,
    ) -> Result<Team, AppError> {
        let team = self.teams.remove(&team.id).await?;
        let cancelled = self
            .invites
            .resolve_pending_for_team(&team.id, InviteStatus::Expired)
            .await?;

        tracing::info!(
            "Disbanded team {} ({}) with {} members, cancelling {} pending invites (initiator: {})",
            team.name,
            team.id,
            team.members.len(),
            cancelled.len(),
            initiator.map_or_else(|| "system".to_string(), |id| id.to_string()),
        );

        if let Some(channel) = team.voice_channel_id {
            if let Err(e) = self.voice.delete(channel).await {
                tracing::warn!("Failed to delete voice channel {}: {}", channel, e);
            }
        }

        for member in &team.members {
            if Some(*member) == initiator {
                continue;
            }
            self.notifier
                .send_direct(
                    *member,
                    DirectMessage::text(
                        "Team disbanded",
                        format!("Your team **{}** has been disbanded.", team.name),
                    ),
                )
                .await;
        }

        Ok(team)
    }

    /// Toggles the team's public-stats setting. Leader only.
    pub async fn set_public_stats(
        &self,
        caller: PlayerId,
        public: bool,
    ) -> Result<Team, AppError> {
        let team_id = self
            .teams
            .team_id_of(caller)
            .await
            .ok_or(TeamError::NotOnTeam)?;

        let _team_lock = self.locks.team(&team_id).await;

        let team = self.teams.get(&team_id).await.ok_or(TeamError::NotOnTeam)?;
        if team.leader_id != caller {
            return Err(TeamError::NotLeader.into());
        }

        self.teams.set_public_stats(&team_id, public).await
    }

    /// Records a community event result for a team. Called by the events
    /// feature when a round finishes; also counts as team activity.
    pub async fn record_event_result(&self, team_id: &str, won: bool) -> Result<Team, AppError> {
        let _team_lock = self.locks.team(team_id).await;

        self.teams.record_event_result(team_id, won).await
    }

    /// Read-only projection of all teams.
    pub async fn list_teams(&self) -> Vec<Team> {
        self.teams.list().await
    }

    /// Read-only projection of one team.
    pub async fn get_team(&self, team_id: &str) -> Option<Team> {
        self.teams.get(team_id).await
    }

    /// Read-only projection of the team a player belongs to.
    pub async fn team_of(&self, player: PlayerId) -> Option<Team> {
        self.teams.get_by_player(player).await
    }

    /// Id of the team a player belongs to, if any.
    pub async fn team_id_of(&self, player: PlayerId) -> Option<TeamId> {
        self.teams.team_id_of(player).await
    }
}
