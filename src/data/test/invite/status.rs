use super::*;

/// An invitation transitions exactly once; terminal states are never left.
#[tokio::test]
async fn set_status_transitions_exactly_once() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();

    let updated = repo.set_status("i1", InviteStatus::Accepted).await.unwrap();
    assert_eq!(updated.status, InviteStatus::Accepted);

    for status in [
        InviteStatus::Accepted,
        InviteStatus::Denied,
        InviteStatus::Expired,
    ] {
        let err = repo.set_status("i1", status).await.unwrap_err();
        assert!(matches!(err, AppError::TeamErr(TeamError::AlreadyResolved)));
    }
    assert_eq!(repo.get("i1").await.unwrap().status, InviteStatus::Accepted);
}

#[tokio::test]
async fn set_status_unknown_invite_fails() {
    let (repo, _dir) = repo().await;

    let err = repo
        .set_status("missing", InviteStatus::Denied)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::InviteNotFound)));
}

/// Disband cascade: every pending invitation of the team resolves in one
/// commit, other teams and resolved records untouched.
#[tokio::test]
async fn resolve_pending_for_team_cascades() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("i1", "t1", 1, 2)).await.unwrap();
    repo.insert(invite("i2", "t1", 1, 3)).await.unwrap();
    repo.insert(invite("i3", "t2", 4, 5)).await.unwrap();
    repo.insert(invite("i4", "t1", 1, 6)).await.unwrap();
    repo.set_status("i4", InviteStatus::Denied).await.unwrap();

    let resolved = repo
        .resolve_pending_for_team("t1", InviteStatus::Expired)
        .await
        .unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(repo.get("i1").await.unwrap().status, InviteStatus::Expired);
    assert_eq!(repo.get("i2").await.unwrap().status, InviteStatus::Expired);
    assert_eq!(repo.get("i3").await.unwrap().status, InviteStatus::Pending);
    assert_eq!(repo.get("i4").await.unwrap().status, InviteStatus::Denied);
}

#[tokio::test]
async fn remove_resolved_before_keeps_pending_and_recent() {
    let (repo, _dir) = repo().await;
    repo.insert(invite("old-denied", "t1", 1, 2)).await.unwrap();
    repo.set_status("old-denied", InviteStatus::Denied)
        .await
        .unwrap();
    repo.backdate("old-denied", Duration::days(10)).await;

    repo.insert(invite("old-pending", "t1", 1, 3)).await.unwrap();
    repo.backdate("old-pending", Duration::days(10)).await;

    repo.insert(invite("fresh-denied", "t1", 1, 4)).await.unwrap();
    repo.set_status("fresh-denied", InviteStatus::Denied)
        .await
        .unwrap();

    let cutoff = Utc::now() - Duration::days(7);
    let removed = repo.remove_resolved_before(cutoff).await.unwrap();

    assert_eq!(removed, 1);
    assert!(repo.get("old-denied").await.is_none());
    // Pending records are the sweep's business, not retention's
    assert!(repo.get("old-pending").await.is_some());
    assert!(repo.get("fresh-denied").await.is_some());
}
