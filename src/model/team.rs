//! Team domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Discord user id of a player.
pub type PlayerId = u64;

/// Opaque team identifier.
pub type TeamId = String;

/// A capacity-bounded named group with exactly one leader.
///
/// Every team has between one and `max_team_size` members, and the leader is
/// always one of them. A player belongs to at most one team at a time; the
/// `player_teams` index in [`TeamsDocument`] is kept consistent with the
/// `members` set of every team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier for the team.
    pub id: TeamId,
    /// Display name, 2-20 characters, unique case-insensitively among
    /// currently-existing teams.
    pub name: String,
    /// Discord id of the team leader. Always a member.
    pub leader_id: PlayerId,
    /// Discord ids of all members, leader included.
    pub members: BTreeSet<PlayerId>,
    /// Voice channel provisioned for this team, if provisioning succeeded.
    #[serde(default)]
    pub voice_channel_id: Option<u64>,
    /// Timestamp when the team was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last membership or stats mutation. The janitor reaps
    /// single-member teams whose last activity is older than the configured
    /// threshold.
    pub last_activity_at: DateTime<Utc>,
    /// Event participation counters.
    #[serde(default)]
    pub stats: TeamStats,
    /// Per-team settings controlled by the leader.
    #[serde(default)]
    pub settings: TeamSettings,
}

impl Team {
    /// Creates a new team with the given leader as its only member.
    pub fn new(id: TeamId, name: impl Into<String>, leader_id: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            leader_id,
            members: BTreeSet::from([leader_id]),
            voice_channel_id: None,
            created_at: now,
            last_activity_at: now,
            stats: TeamStats::default(),
            settings: TeamSettings::default(),
        }
    }
}

/// Counters for community events the team has taken part in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Events the team has won.
    pub event_wins: u32,
    /// Events the team has entered.
    pub events_entered: u32,
}

/// Settings the leader can toggle for their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettings {
    /// Whether the team's stats are shown on public leaderboards.
    pub public_stats: bool,
}

impl Default for TeamSettings {
    fn default() -> Self {
        Self { public_stats: true }
    }
}

/// Persisted layout of the teams document.
///
/// Written wholesale to `teams.json` on every committed mutation and reloaded
/// wholesale at startup. `player_teams` maps each member to the id of the one
/// team they belong to and is maintained in the same commit as `teams`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamsDocument {
    /// All currently-existing teams, keyed by team id.
    #[serde(default)]
    pub teams: HashMap<TeamId, Team>,
    /// Index mapping each player to the team they belong to.
    #[serde(default)]
    pub player_teams: HashMap<PlayerId, TeamId>,
}
