//! Discord implementations of the collaborator interfaces.
//!
//! Voice rooms are per-team voice channels created under a configured
//! category, visible and connectable only to team members. Notifications are
//! direct-message embeds; invitation notifications carry accept/deny buttons
//! whose interactions are handled by the command-dispatch layer.

use serenity::all::{
    ButtonStyle, ChannelId, ChannelType, CreateActionRow, CreateButton, CreateChannel,
    CreateEmbed, CreateMessage, GuildId, PermissionOverwrite, PermissionOverwriteType,
    Permissions, RoleId, Timestamp, UserId,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::error::AppError;
use crate::gateway::{DirectMessage, NotificationGateway, VoiceChannelId, VoiceRoomProvisioner};
use crate::model::team::{PlayerId, Team};

/// Embed color for team notifications.
const EMBED_COLOR: u32 = 0x3498db;

/// Custom id prefix for the accept button on invitation messages.
pub const INVITE_ACCEPT_PREFIX: &str = "team-invite-accept:";
/// Custom id prefix for the deny button on invitation messages.
pub const INVITE_DENY_PREFIX: &str = "team-invite-deny:";

/// Provisions team voice channels through the Discord API.
pub struct DiscordVoiceProvisioner {
    http: Arc<Http>,
    guild_id: GuildId,
    /// Category the team channels are created under. Provisioning is
    /// disabled when unset.
    category_id: Option<ChannelId>,
}

impl DiscordVoiceProvisioner {
    pub fn new(http: Arc<Http>, guild_id: u64, category_id: Option<u64>) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
            category_id: category_id.map(ChannelId::new),
        }
    }

    /// Permission overwrite granting a member access to their team channel.
    fn member_overwrite(player: PlayerId) -> PermissionOverwrite {
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::CONNECT,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(UserId::new(player)),
        }
    }
}

#[async_trait]
impl VoiceRoomProvisioner for DiscordVoiceProvisioner {
    async fn create(&self, team: &Team) -> Result<Option<VoiceChannelId>, AppError> {
        let Some(category_id) = self.category_id else {
            return Ok(None);
        };

        // Hide the channel from the guild at large; the @everyone role id
        // equals the guild id.
        let mut overwrites = vec![PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL | Permissions::CONNECT,
            kind: PermissionOverwriteType::Role(RoleId::new(self.guild_id.get())),
        }];
        overwrites.extend(team.members.iter().map(|m| Self::member_overwrite(*m)));

        let builder = CreateChannel::new(format!("Team {}", team.name))
            .kind(ChannelType::Voice)
            .category(category_id)
            .permissions(overwrites);

        let channel = self.guild_id.create_channel(&self.http, builder).await?;

        tracing::info!(
            "Created voice channel {} for team {} ({})",
            channel.id,
            team.name,
            team.id
        );

        Ok(Some(channel.id.get()))
    }

    async fn grant_access(
        &self,
        channel: VoiceChannelId,
        player: PlayerId,
    ) -> Result<(), AppError> {
        ChannelId::new(channel)
            .create_permission(&self.http, Self::member_overwrite(player))
            .await?;
        Ok(())
    }

    async fn revoke_access(
        &self,
        channel: VoiceChannelId,
        player: PlayerId,
    ) -> Result<(), AppError> {
        ChannelId::new(channel)
            .delete_permission(
                &self.http,
                PermissionOverwriteType::Member(UserId::new(player)),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, channel: VoiceChannelId) -> Result<(), AppError> {
        ChannelId::new(channel).delete(&self.http).await?;
        Ok(())
    }
}

/// Delivers notifications as direct-message embeds.
pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl NotificationGateway for DiscordNotifier {
    async fn send_direct(&self, player: PlayerId, message: DirectMessage) -> bool {
        let user = UserId::new(player);

        // Users with DMs disabled or without a mutual guild fail here
        let dm = match user.create_dm_channel(&self.http).await {
            Ok(channel) => channel,
            Err(e) => {
                tracing::warn!("Failed to open DM channel with {}: {}", player, e);
                return false;
            }
        };

        let embed = CreateEmbed::new()
            .title(&message.title)
            .description(&message.body)
            .color(EMBED_COLOR)
            .timestamp(Timestamp::now());

        let mut builder = CreateMessage::new().embed(embed);
        if let Some(action) = &message.invite_action {
            builder = builder.components(vec![CreateActionRow::Buttons(vec![
                CreateButton::new(format!("{}{}", INVITE_ACCEPT_PREFIX, action.invite_id))
                    .label("Accept")
                    .style(ButtonStyle::Success),
                CreateButton::new(format!("{}{}", INVITE_DENY_PREFIX, action.invite_id))
                    .label("Deny")
                    .style(ButtonStyle::Danger),
            ])]);
        }

        match dm.id.send_message(&self.http, builder).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Failed to send DM to {}: {}", player, e);
                false
            }
        }
    }
}
