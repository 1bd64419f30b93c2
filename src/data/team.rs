use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::store;
use crate::error::{team::TeamError, AppError};
use crate::model::team::{PlayerId, Team, TeamId, TeamsDocument};

/// Repository for the teams document and the player index.
///
/// Owns `teams.json`. The `player_teams` index is maintained in the same
/// commit as the team records, so the two can never drift apart on disk or
/// in memory. Clones share the underlying document.
#[derive(Clone, Debug)]
pub struct TeamRepository {
    path: PathBuf,
    doc: Arc<RwLock<TeamsDocument>>,
}

impl TeamRepository {
    /// Loads the teams document from disk, starting empty when the file does
    /// not exist yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let doc: TeamsDocument = store::load_or_default(&path).await?;

        tracing::debug!(
            "Loaded {} teams and {} index entries from {}",
            doc.teams.len(),
            doc.player_teams.len(),
            path.display()
        );

        Ok(Self {
            path,
            doc: Arc::new(RwLock::new(doc)),
        })
    }

    /// Gets a team by id.
    pub async fn get(&self, team_id: &str) -> Option<Team> {
        self.doc.read().await.teams.get(team_id).cloned()
    }

    /// Gets the team a player belongs to, if any.
    pub async fn get_by_player(&self, player_id: PlayerId) -> Option<Team> {
        let doc = self.doc.read().await;
        let team_id = doc.player_teams.get(&player_id)?;
        doc.teams.get(team_id).cloned()
    }

    /// Gets the id of the team a player belongs to, if any.
    pub async fn team_id_of(&self, player_id: PlayerId) -> Option<TeamId> {
        self.doc.read().await.player_teams.get(&player_id).cloned()
    }

    /// Lists all currently-existing teams.
    pub async fn list(&self) -> Vec<Team> {
        self.doc.read().await.teams.values().cloned().collect()
    }

    /// Whether any existing team uses this name, compared case-insensitively.
    pub async fn name_taken(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.doc
            .read()
            .await
            .teams
            .values()
            .any(|team| team.name.to_lowercase() == wanted)
    }

    /// Single-member teams whose last activity is older than `cutoff`.
    pub async fn idle_single_member_teams(&self, cutoff: DateTime<Utc>) -> Vec<Team> {
        self.doc
            .read()
            .await
            .teams
            .values()
            .filter(|team| team.members.len() == 1 && team.last_activity_at < cutoff)
            .cloned()
            .collect()
    }

    /// Inserts a new team and indexes its members.
    ///
    /// Enforces the document-level invariants a database would enforce with
    /// constraints: the name must be free (case-insensitively) and no member
    /// may already be indexed to a team.
    ///
    /// # Returns
    /// - `Ok(())` - Team and index entries committed
    /// - `Err(TeamError::NameTaken)` - Name collides with an existing team
    /// - `Err(TeamError::AlreadyOnTeam)` - A member is already indexed
    pub async fn insert(&self, team: Team) -> Result<(), AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let wanted = team.name.to_lowercase();
        if next.teams.values().any(|t| t.name.to_lowercase() == wanted) {
            return Err(TeamError::NameTaken.into());
        }
        if team.members.iter().any(|m| next.player_teams.contains_key(m)) {
            return Err(TeamError::AlreadyOnTeam.into());
        }

        for member in &team.members {
            next.player_teams.insert(*member, team.id.clone());
        }
        next.teams.insert(team.id.clone(), team);

        self.commit(&mut doc, next).await
    }

    /// Adds a player to a team's member set and the index, bumping the
    /// team's last activity.
    ///
    /// Capacity is the caller's concern; this method only guards the index
    /// invariant that a player belongs to at most one team.
    pub async fn add_member(&self, team_id: &str, player_id: PlayerId) -> Result<Team, AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        if next.player_teams.contains_key(&player_id) {
            return Err(TeamError::AlreadyOnTeam.into());
        }
        let team = next
            .teams
            .get_mut(team_id)
            .ok_or(TeamError::TeamNotFound)?;

        team.members.insert(player_id);
        team.last_activity_at = Utc::now();
        let updated = team.clone();
        next.player_teams.insert(player_id, team_id.to_string());

        self.commit(&mut doc, next).await?;
        Ok(updated)
    }

    /// Removes a non-leader member from a team and the index.
    ///
    /// Removing the leader would orphan the team; leader departure goes
    /// through the disband path instead.
    pub async fn remove_member(&self, team_id: &str, player_id: PlayerId) -> Result<Team, AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let team = next
            .teams
            .get_mut(team_id)
            .ok_or(TeamError::TeamNotFound)?;
        debug_assert_ne!(team.leader_id, player_id);

        if !team.members.remove(&player_id) {
            return Err(TeamError::NotAMember.into());
        }
        team.last_activity_at = Utc::now();
        let updated = team.clone();
        next.player_teams.remove(&player_id);

        self.commit(&mut doc, next).await?;
        Ok(updated)
    }

    /// Transfers leadership to an existing member.
    pub async fn set_leader(&self, team_id: &str, new_leader: PlayerId) -> Result<Team, AppError> {
        self.update(team_id, |team| {
            if !team.members.contains(&new_leader) {
                return Err(TeamError::NotAMember);
            }
            team.leader_id = new_leader;
            team.last_activity_at = Utc::now();
            Ok(())
        })
        .await
    }

    /// Records the provisioning outcome for the team's voice channel.
    pub async fn set_voice_channel(
        &self,
        team_id: &str,
        channel_id: Option<u64>,
    ) -> Result<Team, AppError> {
        self.update(team_id, |team| {
            team.voice_channel_id = channel_id;
            Ok(())
        })
        .await
    }

    /// Toggles whether the team's stats appear on public leaderboards.
    pub async fn set_public_stats(&self, team_id: &str, public: bool) -> Result<Team, AppError> {
        self.update(team_id, |team| {
            team.settings.public_stats = public;
            team.last_activity_at = Utc::now();
            Ok(())
        })
        .await
    }

    /// Bumps the event counters after a community event, counting a win when
    /// `won` is set.
    pub async fn record_event_result(&self, team_id: &str, won: bool) -> Result<Team, AppError> {
        self.update(team_id, |team| {
            team.stats.events_entered += 1;
            if won {
                team.stats.event_wins += 1;
            }
            team.last_activity_at = Utc::now();
            Ok(())
        })
        .await
    }

    /// Deletes a team record and every member's index entry in one commit.
    ///
    /// # Returns
    /// - `Ok(Team)` - The removed team, for cascading cleanup
    /// - `Err(TeamError::TeamNotFound)` - No such team
    pub async fn remove(&self, team_id: &str) -> Result<Team, AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let team = next.teams.remove(team_id).ok_or(TeamError::TeamNotFound)?;
        for member in &team.members {
            next.player_teams.remove(member);
        }

        self.commit(&mut doc, next).await?;
        Ok(team)
    }

    /// Applies a closure to one team and commits the result.
    async fn update(
        &self,
        team_id: &str,
        mutate: impl FnOnce(&mut Team) -> Result<(), TeamError>,
    ) -> Result<Team, AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let team = next
            .teams
            .get_mut(team_id)
            .ok_or(TeamError::TeamNotFound)?;
        mutate(team)?;
        let updated = team.clone();

        self.commit(&mut doc, next).await?;
        Ok(updated)
    }

    /// Persists `next` and, only on success, replaces the in-memory document.
    async fn commit(
        &self,
        current: &mut TeamsDocument,
        next: TeamsDocument,
    ) -> Result<(), AppError> {
        store::persist(&self.path, &next).await?;
        *current = next;
        Ok(())
    }

    /// Snapshot of the full document, for invariant checks in tests.
    #[cfg(test)]
    pub async fn document(&self) -> TeamsDocument {
        self.doc.read().await.clone()
    }

    /// Shifts a team's last activity into the past, for janitor tests.
    #[cfg(test)]
    pub async fn backdate_activity(&self, team_id: &str, by: chrono::Duration) {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();
        if let Some(team) = next.teams.get_mut(team_id) {
            team.last_activity_at -= by;
        }
        self.commit(&mut doc, next).await.expect("backdate commit");
    }
}
