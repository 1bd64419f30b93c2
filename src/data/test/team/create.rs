use super::*;

/// Tests inserting a new team.
///
/// Verifies that the record is stored and the leader is indexed to it.
///
/// Expected: Ok with team retrievable by id and by player
#[tokio::test]
async fn creates_and_indexes_members() {
    let (repo, _dir) = repo().await;

    repo.insert(team("t1", "Alpha", 1)).await.unwrap();

    let stored = repo.get("t1").await.unwrap();
    assert_eq!(stored.name, "Alpha");
    assert_eq!(stored.leader_id, 1);
    assert!(stored.members.contains(&1));

    assert_eq!(repo.team_id_of(1).await.as_deref(), Some("t1"));
    assert_eq!(repo.get_by_player(1).await.unwrap().id, "t1");
    assert_eq!(repo.list().await.len(), 1);
}

/// Tests the case-insensitive name uniqueness constraint.
///
/// Expected: second insert fails NameTaken, first team untouched
#[tokio::test]
async fn rejects_duplicate_name_case_insensitively() {
    let (repo, _dir) = repo().await;

    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    let err = repo.insert(team("t2", "ALPHA", 2)).await.unwrap_err();

    assert!(matches!(err, AppError::TeamErr(TeamError::NameTaken)));
    assert_eq!(repo.list().await.len(), 1);
    assert!(repo.team_id_of(2).await.is_none());
}

/// Tests that an already-indexed player cannot lead a second team.
///
/// Expected: insert fails AlreadyOnTeam
#[tokio::test]
async fn rejects_member_already_indexed() {
    let (repo, _dir) = repo().await;

    repo.insert(team("t1", "Alpha", 1)).await.unwrap();
    let err = repo.insert(team("t2", "Bravo", 1)).await.unwrap_err();

    assert!(matches!(err, AppError::TeamErr(TeamError::AlreadyOnTeam)));
    assert_eq!(repo.team_id_of(1).await.as_deref(), Some("t1"));
}

#[tokio::test]
async fn name_taken_matches_case_insensitively() {
    let (repo, _dir) = repo().await;

    repo.insert(team("t1", "Night Crew", 1)).await.unwrap();

    assert!(repo.name_taken("night crew").await);
    assert!(repo.name_taken("NIGHT CREW").await);
    assert!(!repo.name_taken("Day Crew").await);
}
