//! Application state shared with the command-dispatch layer.
//!
//! This module defines the `AppState` struct which holds the initialized
//! services the command layer drives. The state is assembled once during
//! startup and then cloned into each command handler.

use serenity::http::Http;
use std::sync::Arc;

use crate::gateway::permissions::PermissionOracle;
use crate::service::team::{invitation::InvitationWorkflow, membership::MembershipService};

/// Application state containing the initialized team services.
///
/// All fields use cheap-to-clone types: the services share their
/// repositories and locks through `Arc`s, and `Arc<Http>` is a
/// reference-counted pointer.
#[derive(Clone)]
pub struct AppState {
    /// Core membership state machine: create, leave, kick, transfer,
    /// disband.
    pub membership: MembershipService,

    /// Invitation workflow: issue, accept, deny, expire.
    pub invitations: InvitationWorkflow,

    /// Platform-role oracle the command layer consults before invoking
    /// administrative entry points.
    pub permissions: Arc<dyn PermissionOracle>,

    /// Discord HTTP client, shared with the command layer for rendering.
    pub discord_http: Arc<Http>,
}

impl AppState {
    /// Creates a new application state with the provided services.
    pub fn new(
        membership: MembershipService,
        invitations: InvitationWorkflow,
        permissions: Arc<dyn PermissionOracle>,
        discord_http: Arc<Http>,
    ) -> Self {
        Self {
            membership,
            invitations,
            permissions,
            discord_http,
        }
    }
}
