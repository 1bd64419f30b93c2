//! Invitation domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::team::{PlayerId, TeamId};

/// Opaque, unpredictable invitation identifier.
pub type InviteId = String;

/// Lifecycle state of an invitation.
///
/// A pending invitation transitions exactly once to one of the terminal
/// states and never leaves it. Expiry can happen lazily when a late response
/// arrives or through the janitor sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Awaiting a response from the target player.
    Pending,
    /// The target accepted and joined the team.
    Accepted,
    /// The target declined.
    Denied,
    /// The TTL passed, the team went away, or acceptance was no longer
    /// possible when the response arrived.
    Expired,
}

impl InviteStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(self) -> bool {
        self != InviteStatus::Pending
    }
}

/// The target player's answer to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteDecision {
    Accept,
    Deny,
}

/// A time-limited, single-use proposal for a specific non-member to join a
/// specific team.
///
/// At most one pending invitation exists per `(team_id, target_player_id)`
/// pair. The TTL is a soft deadline checked transactionally at the moment of
/// response, not only by the janitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique, unpredictable identifier.
    pub id: InviteId,
    /// Team the target is invited to.
    pub team_id: TeamId,
    /// The team's leader at issuance time.
    pub inviter_id: PlayerId,
    /// Player the invitation is addressed to.
    pub target_player_id: PlayerId,
    /// Current lifecycle state.
    pub status: InviteStatus,
    /// Timestamp when the invitation was issued.
    pub created_at: DateTime<Utc>,
    /// Soft deadline, `created_at` plus the configured TTL.
    pub expires_at: DateTime<Utc>,
}

impl Invitation {
    /// Creates a new pending invitation with the given TTL.
    pub fn new(
        id: InviteId,
        team_id: TeamId,
        inviter_id: PlayerId,
        target_player_id: PlayerId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            team_id,
            inviter_id,
            target_player_id,
            status: InviteStatus::Pending,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the TTL has passed at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Persisted layout of the invitations document: a single map from invite id
/// to record, written wholesale to `invites.json` on each committed mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitesDocument {
    pub invites: HashMap<InviteId, Invitation>,
}
