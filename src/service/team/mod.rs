//! Team membership and invitation services.
//!
//! All mutation of the team and invitation documents funnels through the two
//! services in this module, which serialize their read-modify-write sections
//! with the shared [`TeamLocks`]. Lock order is always team before player;
//! collaborator calls (voice room, notifications) happen after the durable
//! commit and are never awaited while another lock is being taken.

pub mod invitation;
pub mod membership;

#[cfg(test)]
pub(crate) mod test;

use tokio::sync::OwnedMutexGuard;

use crate::model::team::{PlayerId, TeamId};
use crate::util::keyed_lock::KeyedMutex;

/// The per-key exclusion sections shared by both team services and the
/// janitor.
///
/// Mutations affecting a given team are serialized on its team key;
/// invitation issuance and acceptance additionally serialize on the target
/// player's key, which is what makes the "accepted two invites at once"
/// race resolve to exactly one membership.
pub struct TeamLocks {
    teams: KeyedMutex<TeamId>,
    players: KeyedMutex<PlayerId>,
}

impl TeamLocks {
    pub fn new() -> Self {
        Self {
            teams: KeyedMutex::new(),
            players: KeyedMutex::new(),
        }
    }

    /// Acquires the exclusion section for a team.
    pub async fn team(&self, team_id: &str) -> OwnedMutexGuard<()> {
        self.teams.acquire(team_id.to_string()).await
    }

    /// Acquires the exclusion section for a player. Always taken after the
    /// team lock when both are needed.
    pub async fn player(&self, player_id: PlayerId) -> OwnedMutexGuard<()> {
        self.players.acquire(player_id).await
    }

    /// Drops lock entries nobody holds. Called by the janitor.
    pub fn purge_unused(&self) {
        self.teams.purge_unused();
        self.players.purge_unused();
    }
}

impl Default for TeamLocks {
    fn default() -> Self {
        Self::new()
    }
}
