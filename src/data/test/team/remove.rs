use super::*;

/// Tests that removing a team deletes the record and every member's index
/// entry in one commit.
#[tokio::test]
async fn remove_deletes_record_and_all_index_entries() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    repo.add_member("t1", 2).await.unwrap();
    repo.add_member("t1", 3).await.unwrap();
    repo.insert(team("t2", "Bravo", 4)).await.unwrap();

    let removed = repo.remove("t1").await.unwrap();

    assert_eq!(removed.members.len(), 3);
    assert!(repo.get("t1").await.is_none());
    for player in [1, 2, 3] {
        assert!(repo.team_id_of(player).await.is_none());
    }
    // The other team is untouched
    assert_eq!(repo.team_id_of(4).await.as_deref(), Some("t2"));
}

#[tokio::test]
async fn remove_unknown_team_fails() {
    let (repo, _dir) = repo().await;

    let err = repo.remove("missing").await.unwrap_err();
    assert!(matches!(err, AppError::TeamErr(TeamError::TeamNotFound)));
}

#[tokio::test]
async fn idle_single_member_teams_filters_by_size_and_age() {
    let (repo, _dir) = repo().await;
    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    repo.insert(team("t2", "Bravo", 2)).await.unwrap();
    repo.add_member("t2", 3).await.unwrap();
    repo.backdate_activity("t1", chrono::Duration::days(30)).await;
    repo.backdate_activity("t2", chrono::Duration::days(30)).await;

    let cutoff = Utc::now() - chrono::Duration::days(14);
    let idle = repo.idle_single_member_teams(cutoff).await;

    assert_eq!(idle.len(), 1);
    assert_eq!(idle[0].id, "t1");
}
