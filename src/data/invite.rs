use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::store;
use crate::error::{team::TeamError, AppError};
use crate::model::invite::{Invitation, InviteStatus, InvitesDocument};
use crate::model::team::PlayerId;

/// Repository for the invitations document.
///
/// Owns `invites.json`. Status transitions are the only mutation after
/// insertion; a terminal invitation never changes again and is eventually
/// garbage-collected by the janitor.
#[derive(Clone)]
pub struct InviteRepository {
    path: PathBuf,
    doc: Arc<RwLock<InvitesDocument>>,
}

impl InviteRepository {
    /// Loads the invitations document from disk, starting empty when the
    /// file does not exist yet.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let doc: InvitesDocument = store::load_or_default(&path).await?;

        tracing::debug!(
            "Loaded {} invitations from {}",
            doc.invites.len(),
            path.display()
        );

        Ok(Self {
            path,
            doc: Arc::new(RwLock::new(doc)),
        })
    }

    /// Gets an invitation by id.
    pub async fn get(&self, invite_id: &str) -> Option<Invitation> {
        self.doc.read().await.invites.get(invite_id).cloned()
    }

    /// The pending invitation for a `(team, target)` pair, if one exists.
    ///
    /// At most one can exist at a time; issuance enforces this.
    pub async fn pending_for(&self, team_id: &str, target: PlayerId) -> Option<Invitation> {
        self.doc
            .read()
            .await
            .invites
            .values()
            .find(|invite| {
                invite.status == InviteStatus::Pending
                    && invite.team_id == team_id
                    && invite.target_player_id == target
            })
            .cloned()
    }

    /// All pending invitations for a team.
    pub async fn pending_for_team(&self, team_id: &str) -> Vec<Invitation> {
        self.doc
            .read()
            .await
            .invites
            .values()
            .filter(|invite| invite.status == InviteStatus::Pending && invite.team_id == team_id)
            .cloned()
            .collect()
    }

    /// Pending invitations whose deadline has passed at `now`.
    pub async fn expired_pending(&self, now: DateTime<Utc>) -> Vec<Invitation> {
        self.doc
            .read()
            .await
            .invites
            .values()
            .filter(|invite| invite.status == InviteStatus::Pending && invite.is_expired(now))
            .cloned()
            .collect()
    }

    /// Inserts a new pending invitation.
    pub async fn insert(&self, invite: Invitation) -> Result<(), AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        next.invites.insert(invite.id.clone(), invite);

        self.commit(&mut doc, next).await
    }

    /// Moves a pending invitation into a terminal status.
    ///
    /// # Returns
    /// - `Ok(Invitation)` - The updated record
    /// - `Err(TeamError::InviteNotFound)` - Unknown id
    /// - `Err(TeamError::AlreadyResolved)` - The invitation was already
    ///   terminal; terminal states are never left
    pub async fn set_status(
        &self,
        invite_id: &str,
        status: InviteStatus,
    ) -> Result<Invitation, AppError> {
        debug_assert!(status.is_terminal());

        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let invite = next
            .invites
            .get_mut(invite_id)
            .ok_or(TeamError::InviteNotFound)?;
        if invite.status.is_terminal() {
            return Err(TeamError::AlreadyResolved.into());
        }
        invite.status = status;
        let updated = invite.clone();

        self.commit(&mut doc, next).await?;
        Ok(updated)
    }

    /// Resolves every pending invitation for a team to `status` in one
    /// commit. Used by the disband cascade.
    ///
    /// # Returns
    /// - `Ok(Vec<Invitation>)` - The invitations that were resolved
    pub async fn resolve_pending_for_team(
        &self,
        team_id: &str,
        status: InviteStatus,
    ) -> Result<Vec<Invitation>, AppError> {
        debug_assert!(status.is_terminal());

        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let mut resolved = Vec::new();
        for invite in next.invites.values_mut() {
            if invite.status == InviteStatus::Pending && invite.team_id == team_id {
                invite.status = status;
                resolved.push(invite.clone());
            }
        }

        if resolved.is_empty() {
            return Ok(resolved);
        }

        self.commit(&mut doc, next).await?;
        Ok(resolved)
    }

    /// Deletes terminal invitations whose deadline passed before `cutoff`.
    ///
    /// Resolved records are kept around briefly so late responders get a
    /// proper "already resolved" answer, then reaped here by the janitor.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of records deleted
    pub async fn remove_resolved_before(&self, cutoff: DateTime<Utc>) -> Result<usize, AppError> {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();

        let before = next.invites.len();
        next.invites
            .retain(|_, invite| !(invite.status.is_terminal() && invite.expires_at < cutoff));
        let removed = before - next.invites.len();

        if removed == 0 {
            return Ok(0);
        }

        self.commit(&mut doc, next).await?;
        Ok(removed)
    }

    /// Persists `next` and, only on success, replaces the in-memory document.
    async fn commit(
        &self,
        current: &mut InvitesDocument,
        next: InvitesDocument,
    ) -> Result<(), AppError> {
        store::persist(&self.path, &next).await?;
        *current = next;
        Ok(())
    }

    /// Snapshot of the full document, for invariant checks in tests.
    #[cfg(test)]
    pub async fn document(&self) -> InvitesDocument {
        self.doc.read().await.clone()
    }

    /// Shifts an invitation's timestamps into the past, for expiry tests.
    #[cfg(test)]
    pub async fn backdate(&self, invite_id: &str, by: chrono::Duration) {
        let mut doc = self.doc.write().await;
        let mut next = doc.clone();
        if let Some(invite) = next.invites.get_mut(invite_id) {
            invite.created_at -= by;
            invite.expires_at -= by;
        }
        self.commit(&mut doc, next).await.expect("backdate commit");
    }
}
