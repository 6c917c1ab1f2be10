//! Shared test utilities for progression and engagement tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use myfaith::store::{Backend, MemoryBackend};
use myfaith::{EngagementTarget, PostDraft, Profile, ReactionCounts, TargetKind, UserId};

/// Fresh in-memory backend
pub fn memory_backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new())
}

/// Same backend behind the trait object the engines take
pub fn as_backend(backend: &Arc<MemoryBackend>) -> Arc<dyn Backend> {
    backend.clone()
}

/// Insert a sign-up profile and return it
pub async fn seed_profile(backend: &dyn Backend, id: &str) -> Profile {
    let profile = Profile::new(UserId::new(id), format!("User {}", id));
    backend
        .insert_profile(&profile)
        .await
        .expect("Failed to seed profile");
    profile
}

/// Insert a prepared profile as-is
pub async fn seed_profile_with(backend: &dyn Backend, profile: &Profile) {
    backend
        .insert_profile(profile)
        .await
        .expect("Failed to seed profile");
}

/// Insert a target with preset counts, `age_minutes` old
pub async fn seed_target(
    backend: &dyn Backend,
    author: &str,
    kind: TargetKind,
    counts: ReactionCounts,
    age_minutes: i64,
) -> EngagementTarget {
    let mut target = PostDraft::new(kind, format!("{} post by {}", kind, author))
        .into_target(UserId::new(author));
    target.counts = counts;
    target.created_at = Utc::now() - Duration::minutes(age_minutes);
    backend
        .insert_target(&target)
        .await
        .expect("Failed to seed target");
    target
}
