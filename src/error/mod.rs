//! Error types and user-facing message handling.
//!
//! This module provides the application's error hierarchy. The `AppError`
//! enum serves as the top-level error type that wraps domain-specific errors
//! from the team subsystem together with infrastructure failures. The command
//! layer that drives this crate renders domain errors back to the invoking
//! player via [`AppError::user_message`]; infrastructure errors are logged
//! and rendered generically.

pub mod config;
pub mod storage;
pub mod team;

use thiserror::Error;

use crate::error::{config::ConfigError, storage::StorageError, team::TeamError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the crate. Most
/// variants use `#[from]` for automatic conversion. Domain errors
/// (`TeamError`) carry their own user-facing messages, while infrastructure
/// variants are surfaced generically to avoid leaking internals.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Domain rule violation from the team subsystem.
    ///
    /// Carries a message suitable for rendering directly to the player who
    /// issued the command.
    #[error(transparent)]
    TeamErr(#[from] TeamError),

    /// Failure reading or writing a persisted document.
    #[error(transparent)]
    StorageErr(#[from] StorageError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as
/// serenity::Error is very large and would make all AppError variants larger
/// if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Message the command layer can render back to the invoking player.
    ///
    /// Domain errors explain exactly which rule was violated. All other
    /// errors produce a generic message; the details are logged server-side.
    pub fn user_message(&self) -> String {
        match self {
            Self::TeamErr(err) => err.to_string(),
            err => {
                tracing::error!("Internal error: {}", err);
                "Something went wrong, please try again later.".to_string()
            }
        }
    }
}
