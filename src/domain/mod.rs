//! Core domain types for My Faith
//!
//! Records here mirror the rows the backend stores: profiles, posts (engagement
//! targets), reaction rows and comments.

mod action;
mod ids;
mod profile;
mod reaction;
mod target;

pub use action::{ActionKind, ContributionKind};
pub use ids::{TargetId, UserId};
pub use profile::{Profile, ProfileCounter, ProfilePatch, ProfileStats};
pub use reaction::{ReactionCounts, ReactionKind, ReactionRecord, UserReactions};
pub use target::{Comment, EngagementTarget, PostDraft, TargetKind};
