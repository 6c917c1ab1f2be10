use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContributionKind, ReactionCounts, TargetId, UserId};
use crate::error::CoreError;

/// Subtype of a post; gates which reactions and affordances it exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Confession,
    Prayer,
    Guidance,
    Testimony,
    Normal,
}

impl TargetKind {
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Normal,
        TargetKind::Prayer,
        TargetKind::Testimony,
        TargetKind::Guidance,
        TargetKind::Confession,
    ];

    /// Value stored in the `post_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confession => "confession",
            Self::Prayer => "prayer",
            Self::Guidance => "guidance",
            Self::Testimony => "testimony",
            Self::Normal => "normal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Confession => "Confession",
            Self::Prayer => "Prayer Request",
            Self::Guidance => "Guidance Request",
            Self::Testimony => "Testimony",
            Self::Normal => "Post",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confession" => Ok(Self::Confession),
            "prayer" => Ok(Self::Prayer),
            "guidance" => Ok(Self::Guidance),
            "testimony" => Ok(Self::Testimony),
            "normal" => Ok(Self::Normal),
            other => Err(CoreError::Validation {
                what: "post type",
                value: other.to_string(),
            }),
        }
    }
}

/// A post (or similar content unit) carrying reaction counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTarget {
    pub id: TargetId,
    pub author_id: UserId,
    pub kind: TargetKind,
    pub content: String,
    pub is_anonymous: bool,
    pub counts: ReactionCounts,
    pub comments_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Input for publishing a new target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub kind: TargetKind,
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl PostDraft {
    pub fn new(kind: TargetKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            is_anonymous: false,
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self
    }

    /// Materialize the target row; every counter starts at zero
    pub fn into_target(self, author_id: UserId) -> EngagementTarget {
        EngagementTarget {
            id: TargetId::generate(),
            author_id,
            kind: self.kind,
            content: self.content,
            is_anonymous: self.is_anonymous,
            counts: ReactionCounts::default(),
            comments_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// A comment left on a target through the contribution flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub target_id: TargetId,
    pub user_id: UserId,
    pub kind: ContributionKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        target_id: TargetId,
        user_id: UserId,
        kind: ContributionKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            target_id,
            user_id,
            kind,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
