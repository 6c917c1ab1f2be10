use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{TargetId, UserId};
use crate::error::CoreError;

/// Engagement verbs a user can toggle on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Pray,
    Guide,
    Share,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::Like,
        ReactionKind::Pray,
        ReactionKind::Guide,
        ReactionKind::Share,
    ];

    /// Value stored in the `reaction_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pray => "pray",
            Self::Guide => "guide",
            Self::Share => "share",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "pray" => Ok(Self::Pray),
            "guide" => Ok(Self::Guide),
            "share" => Ok(Self::Share),
            other => Err(CoreError::Validation {
                what: "reaction kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Denormalized per-kind counters on a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: u32,
    pub prayers: u32,
    pub guides: u32,
    pub shares: u32,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Pray => self.prayers,
            ReactionKind::Guide => self.guides,
            ReactionKind::Share => self.shares,
        }
    }

    pub fn get_mut(&mut self, kind: ReactionKind) -> &mut u32 {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Pray => &mut self.prayers,
            ReactionKind::Guide => &mut self.guides,
            ReactionKind::Share => &mut self.shares,
        }
    }
}

/// Which kinds one viewing user currently has applied to a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReactions {
    pub liked: bool,
    pub prayed: bool,
    pub guided: bool,
    pub shared: bool,
}

impl UserReactions {
    pub fn get(&self, kind: ReactionKind) -> bool {
        match kind {
            ReactionKind::Like => self.liked,
            ReactionKind::Pray => self.prayed,
            ReactionKind::Guide => self.guided,
            ReactionKind::Share => self.shared,
        }
    }

    pub fn set(&mut self, kind: ReactionKind, on: bool) {
        match kind {
            ReactionKind::Like => self.liked = on,
            ReactionKind::Pray => self.prayed = on,
            ReactionKind::Guide => self.guided = on,
            ReactionKind::Share => self.shared = on,
        }
    }

    /// Build from the reaction rows one user holds on one target
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ReactionRecord>) -> Self {
        let mut mine = Self::default();
        for record in records {
            mine.set(record.kind, true);
        }
        mine
    }
}

/// Existence-based reaction row: present means On
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionRecord {
    pub target_id: TargetId,
    pub user_id: UserId,
    pub kind: ReactionKind,
}

impl ReactionRecord {
    pub fn new(target_id: TargetId, user_id: UserId, kind: ReactionKind) -> Self {
        Self {
            target_id,
            user_id,
            kind,
        }
    }
}
