use super::*;

#[tokio::test]
async fn inserts_and_gets_by_id() {
    let (repo, _dir) = repo().await;

    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();

    let stored = repo.get("i1").await.unwrap();
    assert_eq!(stored.team_id, "t1");
    assert_eq!(stored.inviter_id, 1);
    assert_eq!(stored.target_player_id, 2);
    assert_eq!(stored.status, InviteStatus::Pending);
    assert_eq!(stored.expires_at, stored.created_at + Duration::hours(24));
}

#[tokio::test]
async fn pending_for_matches_exact_pair() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();

    assert!(repo.pending_for("t1", 2).await.is_some());
    assert!(repo.pending_for("t1", 3).await.is_none());
    assert!(repo.pending_for("t2", 2).await.is_none());
}

#[tokio::test]
async fn pending_for_ignores_resolved_invites() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();
    repo.set_status("i1", InviteStatus::Denied).await.unwrap();

    assert!(repo.pending_for("t1", 2).await.is_none());
}

#[tokio::test]
async fn pending_for_team_lists_only_that_teams_pending() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();
    repo.insert(invite("i2", "t1", 1, 3)).await.unwrap();
    repo.insert(invite("i3", "t2", 4, 5)).await.unwrap();
    repo.set_status("i2", InviteStatus::Expired).await.unwrap();

    let pending = repo.pending_for_team("t1").await;

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "i1");
}

#[tokio::test]
async fn expired_pending_filters_by_deadline() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("fresh", "t1", 1, 2)).await.unwrap();
    repo.insert(invite("stale", "t1", 1, 3)).await.unwrap();
    repo.backdate("stale", Duration::hours(30)).await;

    let stale = repo.expired_pending(Utc::now()).await;

    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].id, "stale");
}

/// Round-trip: reloading the persisted document reproduces the records.
#[tokio::test]
async fn round_trip_reproduces_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("invites.json");

    let repo = InviteRepository::load(&path).await.unwrap();
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();
    repo.insert(invite("i2", "t2", 3, 4)).await.unwrap();
    repo.set_status("i2", InviteStatus::Accepted).await.unwrap();

    let reloaded = InviteRepository::load(&path).await.unwrap();

    assert_eq!(repo.document().await, reloaded.document().await);
}
