//! Progression: XP, levels and the circle-creation unlock
//!
//! Pure level math lives in [`levels`], the sticky unlock predicate and latch in
//! [`unlock`], and [`ProgressionEngine`] applies action deltas against the
//! backing store.

mod engine;
mod levels;
mod unlock;

pub use engine::{plan_action, LevelUp, ProgressionEngine, ProgressionEvent};
pub use levels::{
    level_for_xp, progress_fraction, xp_threshold_for_next_level, XpRewards, XP_PER_LEVEL,
};
pub use unlock::{
    latch_circle_unlock, meets_circle_requirements, require_circle_unlock, Requirement,
    UnlockProgress, CIRCLE_MIN_GUIDANCE, CIRCLE_MIN_PRAYERS, CIRCLE_MIN_XP,
};
