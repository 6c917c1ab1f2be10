//! Integration tests for the SQLite backend

use std::sync::Arc;

use tempfile::tempdir;

use myfaith::engagement::ReactionLedger;
use myfaith::feed::Feed;
use myfaith::progression::ProgressionEngine;
use myfaith::store::{Backend, SqliteBackend, StoreError};
use myfaith::{
    ActionKind, Comment, ContributionKind, PostDraft, ProfilePatch, ReactionKind, ReactionRecord,
    TargetId, TargetKind, UserId,
};

fn open(path: &std::path::Path) -> Arc<dyn Backend> {
    Arc::new(SqliteBackend::open(path).expect("Failed to open database"))
}

#[tokio::test]
async fn test_profile_round_trip() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("myfaith.db");
    let engine = ProgressionEngine::new(open(&db_path));

    let mut profile = engine
        .create_profile(UserId::new("u1"), "Ruth")
        .await
        .unwrap();
    engine.apply_action(&mut profile, ActionKind::CreatePost).await.unwrap();
    engine.apply_action(&mut profile, ActionKind::Prayer).await.unwrap();
    engine.apply_action(&mut profile, ActionKind::Guidance).await.unwrap();
    engine.record_daily_activity(&mut profile).await.unwrap();

    // Fresh connection to the same file
    let reloaded = ProgressionEngine::new(open(&db_path))
        .load_profile(&profile.id)
        .await
        .unwrap();
    assert_eq!(reloaded.name, "Ruth");
    assert_eq!(reloaded.xp, 30);
    assert_eq!(reloaded.level, 1);
    assert_eq!(reloaded.stats, profile.stats);
    assert!(!reloaded.can_create_circle);
    assert_eq!(
        reloaded.join_date.timestamp_millis(),
        profile.join_date.timestamp_millis()
    );
}

#[tokio::test]
async fn test_patch_only_touches_given_columns() {
    let backend: Arc<dyn Backend> = Arc::new(SqliteBackend::open_in_memory().unwrap());
    let engine = ProgressionEngine::new(backend.clone());
    let mut profile = engine.create_profile(UserId::new("u1"), "Ruth").await.unwrap();
    engine.apply_action(&mut profile, ActionKind::Prayer).await.unwrap();

    let patch = ProfilePatch {
        xp: Some(1200),
        can_create_circle: Some(true),
        ..Default::default()
    };
    backend.patch_profile(&profile.id, &patch).await.unwrap();

    let stored = backend.fetch_profile(&profile.id).await.unwrap();
    assert_eq!(stored.xp, 1200);
    assert!(stored.can_create_circle);
    assert_eq!(stored.stats.prayers_given, 1);
    assert_eq!(stored.level, 1);
}

#[tokio::test]
async fn test_patch_missing_profile() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let patch = ProfilePatch {
        xp: Some(5),
        ..Default::default()
    };
    let result = backend.patch_profile(&UserId::new("ghost"), &patch).await;
    assert!(matches!(result, Err(StoreError::NotFound { entity: "profile", .. })));
}

#[tokio::test]
async fn test_reaction_rows_are_idempotent() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let target = PostDraft::new(TargetKind::Prayer, "exam tomorrow").into_target(UserId::new("author"));
    backend.insert_target(&target).await.unwrap();

    let record = ReactionRecord::new(target.id.clone(), UserId::new("viewer"), ReactionKind::Pray);
    backend.insert_reaction(&record).await.unwrap();
    backend.insert_reaction(&record).await.unwrap();
    assert_eq!(backend.fetch_target(&target.id).await.unwrap().counts.prayers, 1);

    let rows = backend
        .reactions_for_user(&UserId::new("viewer"), &[target.id.clone()])
        .await
        .unwrap();
    assert_eq!(rows, vec![record.clone()]);

    backend.delete_reaction(&record).await.unwrap();
    backend.delete_reaction(&record).await.unwrap();
    let stored = backend.fetch_target(&target.id).await.unwrap();
    assert_eq!(stored.counts.prayers, 0);
    assert!(backend
        .reactions_for_user(&UserId::new("viewer"), &[target.id.clone()])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reaction_on_missing_post() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let record = ReactionRecord::new(TargetId::new("nope"), UserId::new("viewer"), ReactionKind::Like);
    let result = backend.insert_reaction(&record).await;
    assert!(matches!(result, Err(StoreError::NotFound { entity: "post", .. })));
}

#[tokio::test]
async fn test_comments_bump_counter() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let target = PostDraft::new(TargetKind::Guidance, "which job?").into_target(UserId::new("author"));
    backend.insert_target(&target).await.unwrap();

    let first = Comment::new(target.id.clone(), UserId::new("a"), ContributionKind::Guidance, "Pray on it");
    let second = Comment::new(target.id.clone(), UserId::new("b"), ContributionKind::Comment, "Good luck");
    backend.insert_comment(&first).await.unwrap();
    backend.insert_comment(&second).await.unwrap();

    let stored = backend.fetch_target(&target.id).await.unwrap();
    assert_eq!(stored.comments_count, 2);

    let comments = backend.comments_for_target(&target.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments.iter().any(|c| c.id == first.id && c.kind == ContributionKind::Guidance));
    assert!(comments.iter().any(|c| c.id == second.id && c.content == "Good luck"));

    let orphan = Comment::new(TargetId::new("nope"), UserId::new("a"), ContributionKind::Comment, "hi");
    let result = backend.insert_comment(&orphan).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn test_deletes_restore_counters() {
    let backend = SqliteBackend::open_in_memory().unwrap();
    let target = PostDraft::new(TargetKind::Prayer, "surgery friday").into_target(UserId::new("author"));
    backend.insert_target(&target).await.unwrap();

    let comment = Comment::new(target.id.clone(), UserId::new("a"), ContributionKind::Prayer, "Praying");
    backend.insert_comment(&comment).await.unwrap();
    backend.delete_comment(&comment).await.unwrap();
    backend.delete_comment(&comment).await.unwrap();
    assert_eq!(backend.fetch_target(&target.id).await.unwrap().comments_count, 0);
    assert!(backend.comments_for_target(&target.id).await.unwrap().is_empty());

    let record = ReactionRecord::new(target.id.clone(), UserId::new("a"), ReactionKind::Pray);
    backend.insert_reaction(&record).await.unwrap();
    backend.insert_comment(&comment).await.unwrap();
    backend.delete_target(&target.id).await.unwrap();

    assert!(matches!(
        backend.fetch_target(&target.id).await,
        Err(StoreError::NotFound { entity: "post", .. })
    ));
    assert!(backend
        .reactions_for_user(&UserId::new("a"), &[target.id.clone()])
        .await
        .unwrap()
        .is_empty());
    assert!(backend.comments_for_target(&target.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_engagement_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("myfaith.db");

    let post_id = {
        let backend = open(&db_path);
        let engine = ProgressionEngine::new(backend.clone());
        let feed = Feed::new(backend.clone());
        let ledger = ReactionLedger::new(backend.clone());

        let mut author = engine.create_profile(UserId::new("author"), "Naomi").await.unwrap();
        let mut helper = engine.create_profile(UserId::new("helper"), "Boaz").await.unwrap();

        let draft = PostDraft::new(TargetKind::Confession, "I lied to my friend").anonymous();
        let (_, _) = feed.publish(&mut author, draft).await.unwrap();
        let mut view = feed.load(&helper.id).await.unwrap().remove(0);

        ledger
            .contribute(&mut helper, &mut view, ContributionKind::Prayer, "Praying for you")
            .await
            .unwrap();
        ledger.toggle(&helper.id, &mut view, ReactionKind::Like).await.unwrap();
        view.target.id.clone()
    };

    let backend = open(&db_path);
    let view = Feed::new(backend.clone())
        .view(&UserId::new("helper"), &post_id)
        .await
        .unwrap();
    assert!(view.target.is_anonymous);
    assert_eq!(view.target.kind, TargetKind::Confession);
    assert!(view.is_on(ReactionKind::Pray));
    assert!(view.is_on(ReactionKind::Like));
    assert_eq!(view.count(ReactionKind::Pray), 1);
    // Confessions keep no comment thread
    assert_eq!(view.target.comments_count, 0);
    assert!(backend.comments_for_target(&post_id).await.unwrap().is_empty());

    let engine = ProgressionEngine::new(backend);
    let helper = engine.load_profile(&UserId::new("helper")).await.unwrap();
    assert_eq!(helper.xp, 5);
    assert_eq!(helper.stats.prayers_given, 1);
    let author = engine.load_profile(&UserId::new("author")).await.unwrap();
    assert_eq!(author.stats.posts_count, 1);
}
