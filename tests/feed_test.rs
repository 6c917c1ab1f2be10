//! Integration tests for publishing and feed loading

mod common;

use myfaith::engagement::ReactionLedger;
use myfaith::feed::Feed;
use myfaith::progression::{ProgressionEvent, XpRewards};
use myfaith::store::Backend;
use myfaith::{
    ActionKind, CoreError, PostDraft, ReactionCounts, ReactionKind, TargetId, TargetKind, UserId,
};

use common::{as_backend, memory_backend, seed_profile, seed_target};

#[tokio::test]
async fn test_publish_credits_author() {
    let backend = memory_backend();
    let shared = as_backend(&backend);
    let feed = Feed::new(shared.clone());
    let mut author = seed_profile(backend.as_ref(), "author").await;

    let draft = PostDraft::new(TargetKind::Testimony, "He carried me through").anonymous();
    let (view, events) = feed.publish(&mut author, draft).await.unwrap();

    assert_eq!(view.target.counts, ReactionCounts::default());
    assert_eq!(view.target.comments_count, 0);
    assert!(view.target.is_anonymous);
    assert!(!view.is_on(ReactionKind::Like));
    assert_eq!(
        events,
        vec![ProgressionEvent::XpAwarded {
            action: ActionKind::CreatePost,
            amount: XpRewards::CREATE_POST
        }]
    );
    assert_eq!(author.xp, XpRewards::CREATE_POST);
    assert_eq!(author.stats.posts_count, 1);

    let stored = shared.fetch_target(&view.target.id).await.unwrap();
    assert_eq!(stored, view.target);
}

#[tokio::test]
async fn test_failed_publish_credits_nothing() {
    let backend = memory_backend();
    let shared = as_backend(&backend);
    let feed = Feed::new(shared.clone());
    let mut author = seed_profile(backend.as_ref(), "author").await;
    let before = author.clone();

    backend.fail_next_writes(1);
    let result = feed
        .publish(&mut author, PostDraft::new(TargetKind::Normal, "hello"))
        .await;

    assert!(matches!(result, Err(CoreError::Persistence(_))));
    assert_eq!(author, before);
    assert!(shared.list_targets(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_credit_removes_post() {
    let backend = memory_backend();
    let shared = as_backend(&backend);
    let feed = Feed::new(shared.clone());
    let mut author = seed_profile(backend.as_ref(), "author").await;
    let before = author.clone();

    backend.fail_next_patches(1);
    let result = feed
        .publish(&mut author, PostDraft::new(TargetKind::Prayer, "pray for my mother"))
        .await;

    assert!(matches!(result, Err(CoreError::Persistence(_))));
    assert_eq!(author, before);
    assert!(shared.list_targets(10).await.unwrap().is_empty());

    // Retrying yields exactly one post and one credit
    feed.publish(&mut author, PostDraft::new(TargetKind::Prayer, "pray for my mother"))
        .await
        .unwrap();
    assert_eq!(shared.list_targets(10).await.unwrap().len(), 1);
    assert_eq!(author.stats.posts_count, 1);
    assert_eq!(author.xp, XpRewards::CREATE_POST);
}

#[tokio::test]
async fn test_load_is_newest_first_and_paged() {
    let backend = memory_backend();
    let shared = as_backend(&backend);
    let oldest = seed_target(backend.as_ref(), "a", TargetKind::Normal, ReactionCounts::default(), 30).await;
    let newest = seed_target(backend.as_ref(), "b", TargetKind::Prayer, ReactionCounts::default(), 10).await;
    let middle = seed_target(backend.as_ref(), "c", TargetKind::Guidance, ReactionCounts::default(), 20).await;

    let viewer = UserId::new("viewer");
    let views = Feed::new(shared.clone()).load(&viewer).await.unwrap();
    let ids: Vec<&TargetId> = views.iter().map(|v| &v.target.id).collect();
    assert_eq!(ids, vec![&newest.id, &middle.id, &oldest.id]);

    let page = Feed::new(shared).with_page_size(2).load(&viewer).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].target.id, newest.id);
}

#[tokio::test]
async fn test_load_carries_each_viewers_own_reactions() {
    let backend = memory_backend();
    let shared = as_backend(&backend);
    let feed = Feed::new(shared.clone());
    let ledger = ReactionLedger::new(shared.clone());
    let target = seed_target(backend.as_ref(), "author", TargetKind::Prayer, ReactionCounts::default(), 5).await;

    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let mut view = feed.view(&alice, &target.id).await.unwrap();
    ledger.toggle(&alice, &mut view, ReactionKind::Pray).await.unwrap();
    ledger.toggle(&alice, &mut view, ReactionKind::Like).await.unwrap();

    let for_alice = feed.load(&alice).await.unwrap();
    assert!(for_alice[0].is_on(ReactionKind::Pray));
    assert!(for_alice[0].is_on(ReactionKind::Like));
    assert!(!for_alice[0].is_on(ReactionKind::Share));

    let for_bob = feed.load(&bob).await.unwrap();
    assert!(!for_bob[0].is_on(ReactionKind::Pray));
    assert!(!for_bob[0].is_on(ReactionKind::Like));
    assert_eq!(for_bob[0].count(ReactionKind::Pray), 1);
    assert_eq!(for_bob[0].count(ReactionKind::Like), 1);
}

#[tokio::test]
async fn test_view_missing_post() {
    let backend = memory_backend();
    let feed = Feed::new(as_backend(&backend));

    let result = feed
        .view(&UserId::new("viewer"), &TargetId::new("nope"))
        .await;
    assert!(matches!(
        result,
        Err(CoreError::NotFound { entity: "post", .. })
    ));
}
