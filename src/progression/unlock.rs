//! Circle-creation unlock
//!
//! The predicate is pure and stateless. The latch is the only place that sets
//! the flag and only ever sets it to `true`. It runs inside
//! [`plan_action`](super::plan_action), so only applied actions can flip it.

use serde::Serialize;

use crate::domain::Profile;
use crate::error::CoreError;

pub const CIRCLE_MIN_XP: u32 = 1000;
pub const CIRCLE_MIN_PRAYERS: u32 = 50;
pub const CIRCLE_MIN_GUIDANCE: u32 = 10;

/// Whether the three thresholds jointly hold
pub fn meets_circle_requirements(xp: u32, prayers_given: u32, helpful_guidance: u32) -> bool {
    xp >= CIRCLE_MIN_XP
        && prayers_given >= CIRCLE_MIN_PRAYERS
        && helpful_guidance >= CIRCLE_MIN_GUIDANCE
}

/// Set `can_create_circle` if it is not set yet and the predicate holds.
///
/// Returns true only on the call that flips the flag.
pub fn latch_circle_unlock(profile: &mut Profile) -> bool {
    if profile.can_create_circle {
        return false;
    }
    if meets_circle_requirements(
        profile.xp,
        profile.stats.prayers_given,
        profile.stats.helpful_guidance,
    ) {
        profile.can_create_circle = true;
        return true;
    }
    false
}

/// Gate for the privileged "create circle" action. Reads the sticky flag only.
pub fn require_circle_unlock(profile: &Profile) -> Result<(), CoreError> {
    if profile.can_create_circle {
        Ok(())
    } else {
        Err(CoreError::CircleLocked(UnlockProgress::for_profile(profile)))
    }
}

/// One threshold of the unlock predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub label: &'static str,
    pub current: u32,
    pub required: u32,
}

impl Requirement {
    pub fn is_met(&self) -> bool {
        self.current >= self.required
    }
}

/// Per-requirement progress toward the circle unlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnlockProgress {
    pub unlocked: bool,
    pub requirements: [Requirement; 3],
}

impl UnlockProgress {
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            unlocked: profile.can_create_circle,
            requirements: [
                Requirement {
                    label: "XP",
                    current: profile.xp,
                    required: CIRCLE_MIN_XP,
                },
                Requirement {
                    label: "prayers given",
                    current: profile.stats.prayers_given,
                    required: CIRCLE_MIN_PRAYERS,
                },
                Requirement {
                    label: "helpful guidance",
                    current: profile.stats.helpful_guidance,
                    required: CIRCLE_MIN_GUIDANCE,
                },
            ],
        }
    }
}

impl std::fmt::Display for UnlockProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .requirements
            .iter()
            .map(|r| format!("{}/{} {}", r.current, r.required, r.label))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
