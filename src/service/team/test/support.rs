//! Shared doubles and fixtures for the service tests.

use chrono::Duration;
use serenity::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::data::{invite::InviteRepository, team::TeamRepository};
use crate::error::AppError;
use crate::gateway::{DirectMessage, NotificationGateway, VoiceChannelId, VoiceRoomProvisioner};
use crate::model::team::{PlayerId, Team};
use crate::service::team::{
    invitation::InvitationWorkflow, membership::MembershipService, TeamLocks,
};

/// Voice provisioner double that records every call and can be made to
/// fail channel creation.
pub(crate) struct StubVoice {
    next_channel: AtomicU64,
    fail_create: AtomicBool,
    pub granted: Mutex<Vec<(VoiceChannelId, PlayerId)>>,
    pub revoked: Mutex<Vec<(VoiceChannelId, PlayerId)>>,
    pub deleted: Mutex<Vec<VoiceChannelId>>,
}

impl StubVoice {
    fn new() -> Self {
        Self {
            next_channel: AtomicU64::new(100),
            fail_create: AtomicBool::new(false),
            granted: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VoiceRoomProvisioner for StubVoice {
    async fn create(&self, _team: &Team) -> Result<Option<VoiceChannelId>, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(serenity::Error::Other("provisioner down").into());
        }
        Ok(Some(self.next_channel.fetch_add(1, Ordering::SeqCst)))
    }

    async fn grant_access(
        &self,
        channel: VoiceChannelId,
        player: PlayerId,
    ) -> Result<(), AppError> {
        self.granted.lock().unwrap().push((channel, player));
        Ok(())
    }

    async fn revoke_access(
        &self,
        channel: VoiceChannelId,
        player: PlayerId,
    ) -> Result<(), AppError> {
        self.revoked.lock().unwrap().push((channel, player));
        Ok(())
    }

    async fn delete(&self, channel: VoiceChannelId) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(channel);
        Ok(())
    }
}

/// Notification double that records every direct message.
pub(crate) struct RecordingNotifier {
    pub sent: Mutex<Vec<(PlayerId, DirectMessage)>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// All messages delivered to one player.
    pub fn sent_to(&self, player: PlayerId) -> Vec<DirectMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotifier {
    async fn send_direct(&self, player: PlayerId, message: DirectMessage) -> bool {
        self.sent.lock().unwrap().push((player, message));
        true
    }
}

/// Fully-wired services over a throwaway data directory and recording
/// collaborator doubles.
pub(crate) struct Harness {
    pub membership: MembershipService,
    pub workflow: InvitationWorkflow,
    pub teams: TeamRepository,
    pub invites: InviteRepository,
    pub voice: Arc<StubVoice>,
    pub notifier: Arc<RecordingNotifier>,
    pub max_team_size: usize,
    _dir: TempDir,
}

pub(crate) async fn harness() -> Harness {
    harness_with(6, Duration::hours(24)).await
}

pub(crate) async fn harness_with(max_team_size: usize, invite_ttl: Duration) -> Harness {
    let dir = TempDir::new().unwrap();
    let teams = TeamRepository::load(dir.path().join("teams.json"))
        .await
        .unwrap();
    let invites = InviteRepository::load(dir.path().join("invites.json"))
        .await
        .unwrap();

    let voice = Arc::new(StubVoice::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let locks = Arc::new(TeamLocks::new());

    let membership = MembershipService::new(
        teams.clone(),
        invites.clone(),
        voice.clone(),
        notifier.clone(),
        locks,
        max_team_size,
    );
    let workflow = InvitationWorkflow::new(membership.clone(), invite_ttl);

    Harness {
        membership,
        workflow,
        teams,
        invites,
        voice,
        notifier,
        max_team_size,
        _dir: dir,
    }
}

/// Asserts the cross-entity invariants: every team within size bounds with
/// its leader among the members, and the player index exactly mirroring the
/// member sets (so no player is on more than one team).
pub(crate) async fn assert_invariants(h: &Harness) {
    let doc = h.teams.document().await;

    for (id, team) in &doc.teams {
        assert!(
            !team.members.is_empty() && team.members.len() <= h.max_team_size,
            "team {} has {} members",
            id,
            team.members.len()
        );
        assert!(
            team.members.contains(&team.leader_id),
            "leader of team {} is not a member",
            id
        );
        for member in &team.members {
            assert_eq!(
                doc.player_teams.get(member),
                Some(id),
                "index entry missing or wrong for player {}",
                member
            );
        }
    }

    for (player, team_id) in &doc.player_teams {
        let team = doc
            .teams
            .get(team_id)
            .unwrap_or_else(|| panic!("index points at missing team {}", team_id));
        assert!(
            team.members.contains(player),
            "index lists player {} who is not a member of {}",
            player,
            team_id
        );
    }
}
