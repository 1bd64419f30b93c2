//! External collaborator interfaces.
//!
//! The membership core calls out to two collaborators: a voice-room
//! provisioner and a direct-message notification gateway. Both are
//! best-effort from the core's perspective: their failures are logged and
//! never roll back or block the membership mutation they accompany. The
//! `PermissionOracle` capability is consumed by the command-dispatch layer
//! before this core is invoked at all; the core itself only enforces domain
//! roles such as "is the team leader".

pub mod discord;
pub mod permissions;

use serenity::async_trait;

use crate::error::AppError;
use crate::model::team::{PlayerId, Team};

/// Id of a provisioned voice channel.
pub type VoiceChannelId = u64;

/// Provisions and maintains a per-team voice room.
///
/// Access control on the room mirrors team membership: members are granted
/// access when they join and revoked when they leave or are kicked, and the
/// room is deleted when the team disbands. All calls may fail; the caller
/// logs the failure and carries on.
#[async_trait]
pub trait VoiceRoomProvisioner: Send + Sync {
    /// Creates a room for a newly-formed team.
    ///
    /// # Returns
    /// - `Ok(Some(id))` - Room created
    /// - `Ok(None)` - Provisioning is not configured; nothing was created
    /// - `Err(AppError)` - The platform call failed
    async fn create(&self, team: &Team) -> Result<Option<VoiceChannelId>, AppError>;

    /// Grants a player access to a team's room.
    async fn grant_access(&self, channel: VoiceChannelId, player: PlayerId)
        -> Result<(), AppError>;

    /// Revokes a player's access to a team's room.
    async fn revoke_access(
        &self,
        channel: VoiceChannelId,
        player: PlayerId,
    ) -> Result<(), AppError>;

    /// Deletes a team's room.
    async fn delete(&self, channel: VoiceChannelId) -> Result<(), AppError>;
}

/// Best-effort direct message delivery to a player.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Sends a direct message. Never errors outward; delivery failure is
    /// logged by the implementation and reported as `false`.
    async fn send_direct(&self, player: PlayerId, message: DirectMessage) -> bool;
}

/// Payload for a direct message to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub title: String,
    pub body: String,
    /// When set, the message carries accept/deny affordances for this
    /// invitation.
    pub invite_action: Option<InviteAction>,
}

/// Accept/deny affordance attached to an invitation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteAction {
    pub invite_id: String,
}

impl DirectMessage {
    /// A plain informational message.
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            invite_action: None,
        }
    }

    /// An invitation message carrying accept/deny affordances.
    pub fn invite(
        title: impl Into<String>,
        body: impl Into<String>,
        invite_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            invite_action: Some(InviteAction {
                invite_id: invite_id.into(),
            }),
        }
    }
}
