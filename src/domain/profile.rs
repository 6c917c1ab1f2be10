use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Per-action counters kept on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub posts_count: u32,
    pub prayers_given: u32,
    pub helpful_guidance: u32,
    pub daily_streak: u32,
}

/// Names one of the [`ProfileStats`] counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCounter {
    PostsCount,
    PrayersGiven,
    HelpfulGuidance,
    DailyStreak,
}

impl ProfileStats {
    pub fn get(&self, counter: ProfileCounter) -> u32 {
        match counter {
            ProfileCounter::PostsCount => self.posts_count,
            ProfileCounter::PrayersGiven => self.prayers_given,
            ProfileCounter::HelpfulGuidance => self.helpful_guidance,
            ProfileCounter::DailyStreak => self.daily_streak,
        }
    }

    fn get_mut(&mut self, counter: ProfileCounter) -> &mut u32 {
        match counter {
            ProfileCounter::PostsCount => &mut self.posts_count,
            ProfileCounter::PrayersGiven => &mut self.prayers_given,
            ProfileCounter::HelpfulGuidance => &mut self.helpful_guidance,
            ProfileCounter::DailyStreak => &mut self.daily_streak,
        }
    }

    /// Increment one counter by exactly one
    pub fn bump(&mut self, counter: ProfileCounter) {
        let value = self.get_mut(counter);
        *value = value.saturating_add(1);
    }
}

/// One profile per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
    pub xp: u32,
    /// Always `level_for_xp(xp)`; recomputed whenever xp changes
    pub level: u32,
    pub stats: ProfileStats,
    /// Sticky: once true it is never cleared
    pub can_create_circle: bool,
    pub join_date: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile as written at sign-up
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            xp: 0,
            level: 1,
            stats: ProfileStats::default(),
            can_create_circle: false,
            join_date: Utc::now(),
        }
    }

    /// Apply a partial-field patch in memory (after the store accepted it)
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(xp) = patch.xp {
            self.xp = xp;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(v) = patch.posts_count {
            self.stats.posts_count = v;
        }
        if let Some(v) = patch.prayers_given {
            self.stats.prayers_given = v;
        }
        if let Some(v) = patch.helpful_guidance {
            self.stats.helpful_guidance = v;
        }
        if let Some(v) = patch.daily_streak {
            self.stats.daily_streak = v;
        }
        if let Some(flag) = patch.can_create_circle {
            self.can_create_circle = flag;
        }
    }
}

/// Partial-field update keyed by profile id; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub xp: Option<u32>,
    pub level: Option<u32>,
    pub posts_count: Option<u32>,
    pub prayers_given: Option<u32>,
    pub helpful_guidance: Option<u32>,
    pub daily_streak: Option<u32>,
    pub can_create_circle: Option<bool>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record the new value of one counter
    pub fn set_counter(&mut self, counter: ProfileCounter, value: u32) {
        let slot = match counter {
            ProfileCounter::PostsCount => &mut self.posts_count,
            ProfileCounter::PrayersGiven => &mut self.prayers_given,
            ProfileCounter::HelpfulGuidance => &mut self.helpful_guidance,
            ProfileCounter::DailyStreak => &mut self.daily_streak,
        };
        *slot = Some(value);
    }
}
