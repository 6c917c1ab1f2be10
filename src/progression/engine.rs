//! Progression engine - applies XP deltas against the backing store
//!
//! A profile mutation is computed in full first, written as one patch, and
//! only then copied into the caller's profile. A failed write leaves the
//! caller's profile untouched.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::levels::{level_for_xp, XpRewards};
use super::unlock::latch_circle_unlock;
use crate::domain::{ActionKind, Profile, ProfileCounter, ProfilePatch, UserId};
use crate::error::CoreError;
use crate::store::Backend;

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Events produced while applying an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressionEvent {
    XpAwarded { action: ActionKind, amount: u32 },
    LevelUp(LevelUp),
    CircleUnlocked,
    StreakExtended { count: u32 },
}

/// Compute the profile that results from `action`, the patch that persists it,
/// and the events it produces. Pure; touches no storage.
pub fn plan_action(profile: &Profile, action: ActionKind) -> (Profile, ProfilePatch, Vec<ProgressionEvent>) {
    let mut next = profile.clone();
    let mut patch = ProfilePatch::default();
    let mut events = Vec::new();

    if let Some(counter) = XpRewards::counter_for(action) {
        next.stats.bump(counter);
        patch.set_counter(counter, next.stats.get(counter));
    }

    let amount = XpRewards::for_action(action);
    next.xp = next.xp.saturating_add(amount);
    next.level = level_for_xp(next.xp);
    patch.xp = Some(next.xp);
    patch.level = Some(next.level);
    events.push(ProgressionEvent::XpAwarded { action, amount });

    if next.level > profile.level {
        events.push(ProgressionEvent::LevelUp(LevelUp {
            old_level: profile.level,
            new_level: next.level,
        }));
    }

    if latch_circle_unlock(&mut next) {
        patch.can_create_circle = Some(true);
        events.push(ProgressionEvent::CircleUnlocked);
    }

    (next, patch, events)
}

/// Converts action events into durable profile mutations
#[derive(Clone)]
pub struct ProgressionEngine {
    backend: Arc<dyn Backend>,
}

impl ProgressionEngine {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Write a fresh sign-up profile
    pub async fn create_profile(
        &self,
        id: UserId,
        name: impl Into<String>,
    ) -> Result<Profile, CoreError> {
        let profile = Profile::new(id, name);
        self.backend.insert_profile(&profile).await?;
        info!("Created profile {}", profile.id);
        Ok(profile)
    }

    /// Read a profile; a missing row is [`CoreError::NotFound`]
    pub async fn load_profile(&self, id: &UserId) -> Result<Profile, CoreError> {
        let mut profile = self.backend.fetch_profile(id).await?;
        profile.level = level_for_xp(profile.xp);
        Ok(profile)
    }

    /// Apply one action: bump its counter, add its XP, recompute the level and
    /// latch the circle unlock, all in a single patch.
    ///
    /// The engine does not deduplicate; callers must not submit the same
    /// discrete action twice.
    pub async fn apply_action(
        &self,
        profile: &mut Profile,
        action: ActionKind,
    ) -> Result<Vec<ProgressionEvent>, CoreError> {
        let (next, patch, events) = plan_action(profile, action);

        self.backend.patch_profile(&profile.id, &patch).await?;
        *profile = next;

        for event in &events {
            match event {
                ProgressionEvent::XpAwarded { action, amount } => {
                    debug!("{} earned {} XP for {} (total {})", profile.id, amount, action, profile.xp)
                }
                ProgressionEvent::LevelUp(level_up) => info!(
                    "{} reached level {} (was {})",
                    profile.id, level_up.new_level, level_up.old_level
                ),
                ProgressionEvent::CircleUnlocked => {
                    info!("{} unlocked circle creation", profile.id)
                }
                ProgressionEvent::StreakExtended { .. } => {}
            }
        }

        Ok(events)
    }

    /// Count one day of activity toward `daily_streak` (no XP, no decay)
    pub async fn record_daily_activity(
        &self,
        profile: &mut Profile,
    ) -> Result<ProgressionEvent, CoreError> {
        let mut stats = profile.stats;
        stats.bump(ProfileCounter::DailyStreak);

        let mut patch = ProfilePatch::default();
        patch.set_counter(ProfileCounter::DailyStreak, stats.daily_streak);
        self.backend.patch_profile(&profile.id, &patch).await?;

        profile.stats = stats;
        debug!("{} daily streak now {}", profile.id, stats.daily_streak);
        Ok(ProgressionEvent::StreakExtended {
            count: stats.daily_streak,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(xp: u32, prayers: u32, guidance: u32) -> Profile {
        let mut p = Profile::new(UserId::new("u1"), "Ruth");
        p.xp = xp;
        p.level = level_for_xp(xp);
        p.stats.prayers_given = prayers;
        p.stats.helpful_guidance = guidance;
        p
    }

    #[test]
    fn test_plan_guidance_unlocks_circle() {
        let before = profile(985, 50, 9);
        let (next, patch, events) = plan_action(&before, ActionKind::Guidance);

        assert_eq!(next.xp, 1000);
        assert_eq!(next.stats.helpful_guidance, 10);
        assert_eq!(next.level, 3);
        assert!(next.can_create_circle);

        assert_eq!(patch.xp, Some(1000));
        assert_eq!(patch.level, Some(3));
        assert_eq!(patch.helpful_guidance, Some(10));
        assert_eq!(patch.can_create_circle, Some(true));
        assert_eq!(patch.prayers_given, None);

        assert!(events.contains(&ProgressionEvent::LevelUp(LevelUp {
            old_level: 2,
            new_level: 3
        })));
        assert!(events.contains(&ProgressionEvent::CircleUnlocked));
    }

    #[test]
    fn test_plan_comment_touches_no_counter() {
        let before = profile(0, 0, 0);
        let (next, patch, events) = plan_action(&before, ActionKind::Comment);

        assert_eq!(next.xp, 3);
        assert_eq!(next.stats, before.stats);
        assert_eq!(patch.posts_count, None);
        assert_eq!(patch.prayers_given, None);
        assert_eq!(patch.helpful_guidance, None);
        assert_eq!(
            events,
            vec![ProgressionEvent::XpAwarded {
                action: ActionKind::Comment,
                amount: 3
            }]
        );
    }

    #[test]
    fn test_plan_does_not_rewrite_latched_flag() {
        let mut before = profile(2000, 0, 0);
        before.can_create_circle = true;
        let (next, patch, events) = plan_action(&before, ActionKind::CreatePost);

        assert!(next.can_create_circle);
        assert_eq!(patch.can_create_circle, None);
        assert!(!events.contains(&ProgressionEvent::CircleUnlocked));
    }
}
