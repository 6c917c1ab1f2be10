//! XP and Level system
//!
//! Levels are fixed-width bands of [`XP_PER_LEVEL`] XP, starting at level 1.

use crate::domain::{ActionKind, ProfileCounter};

/// Width of one level band
pub const XP_PER_LEVEL: u32 = 500;

/// Level for a given XP total: `floor(xp / 500) + 1`
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// First XP value that belongs to the next level.
///
/// Exclusive on the low end: `xp = 500` is already level 2, so its threshold is 1000.
pub fn xp_threshold_for_next_level(xp: u32) -> u64 {
    u64::from(level_for_xp(xp)) * u64::from(XP_PER_LEVEL)
}

/// Progress through the current level band, in `[0, 1)`
pub fn progress_fraction(xp: u32) -> f64 {
    let band_start = (level_for_xp(xp) - 1) * XP_PER_LEVEL;
    f64::from(xp - band_start) / f64::from(XP_PER_LEVEL)
}

/// XP rewards for various actions
pub struct XpRewards;

impl XpRewards {
    /// XP for publishing a post
    pub const CREATE_POST: u32 = 10;

    /// XP for giving a prayer
    pub const PRAYER: u32 = 5;

    /// XP for giving guidance
    pub const GUIDANCE: u32 = 15;

    /// XP for a plain comment
    pub const COMMENT: u32 = 3;

    /// XP delta for an action
    pub fn for_action(action: ActionKind) -> u32 {
        match action {
            ActionKind::CreatePost => Self::CREATE_POST,
            ActionKind::Prayer => Self::PRAYER,
            ActionKind::Guidance => Self::GUIDANCE,
            ActionKind::Comment => Self::COMMENT,
        }
    }

    /// Profile counter an action increments (plain comments touch none)
    pub fn counter_for(action: ActionKind) -> Option<ProfileCounter> {
        match action {
            ActionKind::CreatePost => Some(ProfileCounter::PostsCount),
            ActionKind::Prayer => Some(ProfileCounter::PrayersGiven),
            ActionKind::Guidance => Some(ProfileCounter::HelpfulGuidance),
            ActionKind::Comment => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_for_xp(999), 2);
        assert_eq!(level_for_xp(1000), 3);
        assert_eq!(level_for_xp(u32::MAX), u32::MAX / 500 + 1);
    }

    #[test]
    fn test_level_matches_formula_across_range() {
        for xp in 0..5_000u32 {
            assert_eq!(level_for_xp(xp), xp / 500 + 1, "xp = {}", xp);
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        for xp in (0..10_000u32).step_by(7).chain([499, 500, 501, 999, 1000]) {
            let threshold = xp_threshold_for_next_level(xp);
            let just_below = (threshold - 1) as u32;
            assert_eq!(level_for_xp(just_below), level_for_xp(xp), "xp = {}", xp);
            assert_eq!(level_for_xp(threshold as u32), level_for_xp(xp) + 1);
        }
        assert_eq!(xp_threshold_for_next_level(500), 1000);
    }

    #[test]
    fn test_threshold_does_not_overflow_at_max() {
        let threshold = xp_threshold_for_next_level(u32::MAX);
        assert!(threshold > u64::from(u32::MAX));
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(progress_fraction(0), 0.0);
        assert_eq!(progress_fraction(500), 0.0);
        assert_eq!(progress_fraction(250), 0.5);
        assert!((progress_fraction(499) - 0.998).abs() < 1e-9);
        for xp in (0..5_000u32).step_by(13) {
            let p = progress_fraction(xp);
            assert!((0.0..1.0).contains(&p), "xp = {} -> {}", xp, p);
        }
    }

    #[test]
    fn test_reward_table() {
        assert_eq!(XpRewards::for_action(ActionKind::CreatePost), 10);
        assert_eq!(XpRewards::for_action(ActionKind::Prayer), 5);
        assert_eq!(XpRewards::for_action(ActionKind::Guidance), 15);
        assert_eq!(XpRewards::for_action(ActionKind::Comment), 3);
        assert_eq!(XpRewards::counter_for(ActionKind::Comment), None);
        assert_eq!(
            XpRewards::counter_for(ActionKind::Prayer),
            Some(ProfileCounter::PrayersGiven)
        );
    }
}
