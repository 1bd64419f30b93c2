use std::path::PathBuf;

use crate::error::{config::ConfigError, AppError};

/// Default member capacity per team.
const DEFAULT_MAX_TEAM_SIZE: usize = 6;

/// Default invitation time-to-live, in hours.
const DEFAULT_INVITE_TTL_HOURS: i64 = 24;

/// Default inactivity threshold for reclaiming single-member teams, in days.
const DEFAULT_IDLE_TEAM_DAYS: i64 = 14;

/// Default janitor cadence: every five minutes.
const DEFAULT_JANITOR_CRON: &str = "0 */5 * * * *";

pub struct Config {
    pub discord_bot_token: String,
    pub guild_id: u64,

    /// Directory holding the flat-file documents.
    pub data_dir: PathBuf,

    /// Category the team voice channels are created under. Voice-room
    /// provisioning is disabled when unset.
    pub voice_category_id: Option<u64>,
    /// Role allowed to use team administration commands.
    pub admin_role_id: Option<u64>,

    pub max_team_size: usize,
    pub invite_ttl_hours: i64,
    pub idle_team_days: i64,
    pub janitor_cron: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            discord_bot_token: require("DISCORD_BOT_TOKEN")?,
            guild_id: require("DISCORD_GUILD_ID")?.parse().map_err(|_| invalid("DISCORD_GUILD_ID"))?,
            data_dir: optional("SQUADRON_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            voice_category_id: parse_optional("TEAM_VOICE_CATEGORY_ID")?,
            admin_role_id: parse_optional("TEAM_ADMIN_ROLE_ID")?,
            max_team_size: parse_optional("MAX_TEAM_SIZE")?.unwrap_or(DEFAULT_MAX_TEAM_SIZE),
            invite_ttl_hours: parse_optional("INVITE_TTL_HOURS")?
                .unwrap_or(DEFAULT_INVITE_TTL_HOURS),
            idle_team_days: parse_optional("IDLE_TEAM_DAYS")?.unwrap_or(DEFAULT_IDLE_TEAM_DAYS),
            janitor_cron: optional("JANITOR_CRON")
                .unwrap_or_else(|| DEFAULT_JANITOR_CRON.to_string()),
        })
    }

    /// Invitation time-to-live.
    pub fn invite_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.invite_ttl_hours)
    }

    /// Inactivity threshold for single-member team reclamation.
    pub fn idle_team_threshold(&self) -> chrono::Duration {
        chrono::Duration::days(self.idle_team_days)
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_optional<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match optional(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

fn invalid(name: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: std::env::var(name).unwrap_or_default(),
    }
}
