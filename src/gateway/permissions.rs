//! Platform-level permission checks for the command-dispatch layer.
//!
//! The membership core never consults this oracle: it enforces only its own
//! domain rules ("is the team leader"). The command layer checks platform
//! roles here before invoking administrative entry points such as
//! force-disband.

use serenity::all::{GuildId, RoleId, UserId};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::model::team::PlayerId;

/// Capability consulted by the command-dispatch layer before invoking
/// privileged entry points.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Whether the player may use team administration commands
    /// (force-disband, stats adjustment).
    async fn can_administer_teams(&self, player: PlayerId) -> bool;
}

/// Role-based oracle backed by the Discord guild's role assignments.
pub struct DiscordPermissionOracle {
    http: Arc<Http>,
    guild_id: GuildId,
    /// Role granting team administration. Nobody qualifies when unset.
    admin_role_id: Option<RoleId>,
}

impl DiscordPermissionOracle {
    pub fn new(http: Arc<Http>, guild_id: u64, admin_role_id: Option<u64>) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
            admin_role_id: admin_role_id.map(RoleId::new),
        }
    }
}

#[async_trait]
impl PermissionOracle for DiscordPermissionOracle {
    async fn can_administer_teams(&self, player: PlayerId) -> bool {
        let Some(admin_role_id) = self.admin_role_id else {
            return false;
        };

        match self
            .http
            .get_member(self.guild_id, UserId::new(player))
            .await
        {
            Ok(member) => member.roles.contains(&admin_role_id),
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch member {} from guild {}: {}",
                    player,
                    self.guild_id,
                    e
                );
                false
            }
        }
    }
}
