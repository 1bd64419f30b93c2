//! Team management core for a game-community Discord bot.
//!
//! This crate implements the bot's team (group) subsystem: capacity-bounded
//! teams with a single leader, time-limited invitations, per-team voice
//! channels, and a background janitor that reclaims stale state. The
//! command-dispatch layer (slash commands, platform permission checks,
//! message rendering) lives outside this crate and drives it through the
//! service entry points.
//!
//! # Architecture
//!
//! The crate follows a layered architecture with clear separation of concerns:
//!
//! - **Service Layer** (`service/`) - Membership and invitation business logic
//! - **Data Layer** (`data/`) - Flat-file JSON repositories for teams and invites
//! - **Model Layer** (`model/`) - Domain records and persisted document shapes
//! - **Gateway Layer** (`gateway/`) - External collaborator interfaces and their
//!   Discord implementations (voice rooms, direct messages, permission checks)
//! - **Error Layer** (`error/`) - Application error types and user-facing messages
//!
//! # Infrastructure
//!
//! Supporting modules provide application infrastructure:
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state handed to the command layer
//! - **Startup** (`startup`) - Initialization of storage, services, and the janitor
//! - **Scheduler** (`scheduler/`) - Cron job for invite expiry and team reclamation
//! - **Util** (`util/`) - Keyed async locks and id generation

pub mod config;
pub mod data;
pub mod error;
pub mod gateway;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
