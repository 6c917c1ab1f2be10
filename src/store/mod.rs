//! Backing store for profiles, posts, reactions and comments
//!
//! The core treats the relational backend as opaque CRUD storage reached
//! through [`Backend`]. Two implementations ship with the crate:
//!
//! - [`SqliteBackend`]: on-disk store (`~/.myfaith/myfaith.db`)
//! - [`MemoryBackend`]: in-process store with write-failure injection
//!
//! Every method is a single request/response call; suspension only happens
//! at these boundaries.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use async_trait::async_trait;

use crate::domain::{
    Comment, EngagementTarget, Profile, ProfilePatch, ReactionRecord, TargetId, UserId,
};

/// Errors raised by a [`Backend`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt {column} value: {value:?}")]
    Corrupt { column: &'static str, value: String },
}

/// Generic relational collaborator
///
/// Reaction aggregate counters are denormalized onto the target row and are
/// maintained by the same call that writes or deletes the reaction row.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read a profile by id
    async fn fetch_profile(&self, id: &UserId) -> Result<Profile, StoreError>;

    /// Insert a new profile row
    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Apply a partial-field patch as one atomic update
    async fn patch_profile(&self, id: &UserId, patch: &ProfilePatch) -> Result<(), StoreError>;

    /// Insert a new target row
    async fn insert_target(&self, target: &EngagementTarget) -> Result<(), StoreError>;

    /// Delete a target row together with its reactions and comments.
    /// Deleting a missing row changes nothing.
    async fn delete_target(&self, id: &TargetId) -> Result<(), StoreError>;

    /// Read a target by id
    async fn fetch_target(&self, id: &TargetId) -> Result<EngagementTarget, StoreError>;

    /// Most recent targets first
    async fn list_targets(&self, limit: usize) -> Result<Vec<EngagementTarget>, StoreError>;

    /// Insert a reaction row and bump the matching counter.
    /// Inserting a row that already exists changes nothing.
    async fn insert_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError>;

    /// Delete a reaction row (filtered by all three key fields) and decrement
    /// the matching counter. Deleting a missing row changes nothing.
    async fn delete_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError>;

    /// Reaction rows held by `user` on any of `targets`
    async fn reactions_for_user(
        &self,
        user: &UserId,
        targets: &[TargetId],
    ) -> Result<Vec<ReactionRecord>, StoreError>;

    /// Insert a comment and bump the target's `comments_count`
    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError>;

    /// Delete a comment and decrement the target's `comments_count`.
    /// Deleting a missing comment changes nothing.
    async fn delete_comment(&self, comment: &Comment) -> Result<(), StoreError>;

    /// Comments on a target, oldest first
    async fn comments_for_target(&self, target: &TargetId) -> Result<Vec<Comment>, StoreError>;
}
