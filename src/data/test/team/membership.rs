use super::*;

#[tokio::test]
async fn add_member_updates_set_and_index() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();

    let updated = repo.add_member("t1", 2).await.unwrap();

    assert!(updated.members.contains(&2));
    assert_eq!(repo.team_id_of(2).await.as_deref(), Some("t1"));
}

#[tokio::test]
async fn add_member_advances_last_activity() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    let before = repo.get("t1").await.unwrap().last_activity_at;

    let updated = repo.add_member("t1", 2).await.unwrap();

    assert!(updated.last_activity_at >= before);
}

/// A player indexed anywhere is rejected, whether the target team is the
/// one they are on or another one.
#[tokio::test]
async fn add_member_rejects_player_on_any_team() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    repo.insert(team("t2", "Bravo", 2)).await.unwrap();

    let err = repo.add_member("t1", 2).await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::AlreadyOnTeam)));

    let err = repo.add_member("t1", 1).await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::AlreadyOnTeam)));
}

#[tokio::test]
async fn add_member_unknown_team_fails() {
    let (repo, _dir) = repo().await;

    let err = repo.add_member("missing", 2).await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::TeamNotFound)));
    assert!(repo.team_id_of(2).await.is_none());
}

#[tokio::test]
async fn remove_member_clears_index() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    repo.add_member("t1", 2).await.unwrap();

    let updated = repo.remove_member("t1", 2).await.unwrap();

    assert!(!updated.members.contains(&2));
    assert!(repo.team_id_of(2).await.is_none());
    // The leader is untouched
    assert_eq!(repo.team_id_of(1).await.as_deref(), Some("t1"));
}

#[tokio::test]
async fn remove_member_requires_membership() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();

    let err = repo.remove_member("t1", 9).await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::NotAMember)));
}

#[tokio::test]
async fn set_leader_requires_membership() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    repo.add_member("t1", 2).await.unwrap();

    let err = repo.set_leader("t1", 9).await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::NotAMember)));

    let updated = repo.set_leader("t1", 2).await.unwrap();
    assert_eq!(updated.leader_id, 2);
}

#[tokio::test]
async fn set_voice_channel_records_outcome() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();

    let updated = repo.set_voice_channel("t1", Some(42)).await.unwrap();
    assert_eq!(updated.voice_channel_id, Some(42));

    // A failed provisioning run is recorded as absent
    let updated = repo.set_voice_channel("t1", None).await.unwrap();
    assert_eq!(updated.voice_channel_id, None);
}

#[tokio::test]
async fn record_event_result_bumps_counters() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();

    let updated = repo.record_event_result("t1", true).await.unwrap();
    assert_eq!(updated.stats.events_entered, 1);
    assert_eq!(updated.stats.event_wins, 1);

    let updated = repo.record_event_result("t1", false).await.unwrap();
    assert_eq!(updated.stats.events_entered, 2);
    assert_eq!(updated.stats.event_wins, 1);
}

#[tokio::test]
async fn set_public_stats_toggles_setting() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    assert!(repo.get("t1").await.unwrap().settings.public_stats);

    let updated = repo.set_public_stats("t1", false).await.unwrap();
    assert!(!updated.settings.public_stats);
}
