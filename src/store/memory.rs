//! In-process backend
//!
//! Holds the same tables as the SQLite store behind one mutex, so each call is
//! atomic with respect to the others. Writes can be made to fail on demand to
//! exercise persistence-failure paths.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Backend, StoreError};
use crate::domain::{
    Comment, EngagementTarget, Profile, ProfilePatch, ReactionRecord, TargetId, UserId,
};

#[derive(Default)]
struct Tables {
    profiles: HashMap<UserId, Profile>,
    targets: HashMap<TargetId, EngagementTarget>,
    reactions: BTreeSet<(TargetId, UserId, &'static str)>,
    comments: Vec<Comment>,
}

/// Backend kept entirely in memory
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    offline: AtomicBool,
    reject_reactions: AtomicBool,
    failing_writes: AtomicUsize,
    failing_patches: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// While set, reaction inserts and deletes fail; other writes succeed
    pub fn reject_reactions(&self, reject: bool) {
        self.reject_reactions.store(reject, Ordering::SeqCst);
    }

    /// Make the next `n` write calls fail
    pub fn fail_next_writes(&self, n: usize) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` profile patches fail; other writes succeed
    pub fn fail_next_patches(&self, n: usize) {
        self.failing_patches.store(n, Ordering::SeqCst);
    }

    /// Number of reaction rows currently stored (all targets, all users)
    pub fn reaction_rows(&self) -> usize {
        self.tables().reactions.len()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock poisoned")
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        self.check_read()?;
        if take_failure(&self.failing_writes) {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        Ok(())
    }

    fn check_patch(&self) -> Result<(), StoreError> {
        self.check_write()?;
        if take_failure(&self.failing_patches) {
            return Err(StoreError::Unavailable("profile patch rejected".to_string()));
        }
        Ok(())
    }

    fn check_reaction_write(&self) -> Result<(), StoreError> {
        if self.reject_reactions.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reaction write rejected".to_string()));
        }
        self.check_write()
    }
}

/// Consume one pending injected failure, if any
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn reaction_key(reaction: &ReactionRecord) -> (TargetId, UserId, &'static str) {
    (
        reaction.target_id.clone(),
        reaction.user_id.clone(),
        reaction.kind.as_str(),
    )
}

fn target_not_found(id: &TargetId) -> StoreError {
    StoreError::NotFound {
        entity: "post",
        id: id.to_string(),
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_profile(&self, id: &UserId) -> Result<Profile, StoreError> {
        self.check_read()?;
        self.tables()
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "profile",
                id: id.to_string(),
            })
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.check_write()?;
        self.tables()
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn patch_profile(&self, id: &UserId, patch: &ProfilePatch) -> Result<(), StoreError> {
        self.check_patch()?;
        let mut tables = self.tables();
        let profile = tables
            .profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "profile",
                id: id.to_string(),
            })?;
        profile.apply_patch(patch);
        Ok(())
    }

    async fn insert_target(&self, target: &EngagementTarget) -> Result<(), StoreError> {
        self.check_write()?;
        self.tables()
            .targets
            .insert(target.id.clone(), target.clone());
        Ok(())
    }

    async fn delete_target(&self, id: &TargetId) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables();
        if tables.targets.remove(id).is_some() {
            tables.reactions.retain(|(target, _, _)| target != id);
            tables.comments.retain(|c| &c.target_id != id);
        }
        Ok(())
    }

    async fn fetch_target(&self, id: &TargetId) -> Result<EngagementTarget, StoreError> {
        self.check_read()?;
        self.tables()
            .targets
            .get(id)
            .cloned()
            .ok_or_else(|| target_not_found(id))
    }

    async fn list_targets(&self, limit: usize) -> Result<Vec<EngagementTarget>, StoreError> {
        self.check_read()?;
        let mut targets: Vec<_> = self.tables().targets.values().cloned().collect();
        targets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        targets.truncate(limit);
        Ok(targets)
    }

    async fn insert_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError> {
        self.check_reaction_write()?;
        let mut tables = self.tables();
        if !tables.targets.contains_key(&reaction.target_id) {
            return Err(target_not_found(&reaction.target_id));
        }
        if tables.reactions.insert(reaction_key(reaction)) {
            if let Some(target) = tables.targets.get_mut(&reaction.target_id) {
                let count = target.counts.get_mut(reaction.kind);
                *count = count.saturating_add(1);
            }
        }
        Ok(())
    }

    async fn delete_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError> {
        self.check_reaction_write()?;
        let mut tables = self.tables();
        if tables.reactions.remove(&reaction_key(reaction)) {
            if let Some(target) = tables.targets.get_mut(&reaction.target_id) {
                let count = target.counts.get_mut(reaction.kind);
                *count = count.saturating_sub(1);
            }
        }
        Ok(())
    }

    async fn reactions_for_user(
        &self,
        user: &UserId,
        targets: &[TargetId],
    ) -> Result<Vec<ReactionRecord>, StoreError> {
        self.check_read()?;
        let tables = self.tables();
        let rows = tables
            .reactions
            .iter()
            .filter(|(target, owner, _)| owner == user && targets.contains(target))
            .filter_map(|(target, owner, kind)| {
                kind.parse()
                    .ok()
                    .map(|kind| ReactionRecord::new(target.clone(), owner.clone(), kind))
            })
            .collect();
        Ok(rows)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables();
        let target = tables
            .targets
            .get_mut(&comment.target_id)
            .ok_or_else(|| target_not_found(&comment.target_id))?;
        target.comments_count = target.comments_count.saturating_add(1);
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        self.check_write()?;
        let mut tables = self.tables();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != comment.id);
        if tables.comments.len() < before {
            if let Some(target) = tables.targets.get_mut(&comment.target_id) {
                target.comments_count = target.comments_count.saturating_sub(1);
            }
        }
        Ok(())
    }

    async fn comments_for_target(&self, target: &TargetId) -> Result<Vec<Comment>, StoreError> {
        self.check_read()?;
        Ok(self
            .tables()
            .comments
            .iter()
            .filter(|c| &c.target_id == target)
            .cloned()
            .collect())
    }
}
