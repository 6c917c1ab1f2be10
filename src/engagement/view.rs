//! Local optimistic state for one target as seen by one user

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::{EngagementTarget, ReactionKind, UserReactions};

/// A target plus the viewing user's reaction booleans.
///
/// The local boolean decides the direction of the next toggle; the remote
/// ledger is never consulted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementView {
    pub target: EngagementTarget,
    pub mine: UserReactions,
}

/// Record of one local transition, enough to undo it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalFlip {
    pub kind: ReactionKind,
    /// State after the flip
    pub now_on: bool,
    pub previous_count: u32,
    pub count: u32,
    /// The decrement would have gone below zero and was held at zero
    pub clamped: bool,
}

impl EngagementView {
    pub fn new(target: EngagementTarget, mine: UserReactions) -> Self {
        Self { target, mine }
    }

    pub fn is_on(&self, kind: ReactionKind) -> bool {
        self.mine.get(kind)
    }

    pub fn count(&self, kind: ReactionKind) -> u32 {
        self.target.counts.get(kind)
    }

    /// Off→On adds one, On→Off removes one (never below zero)
    pub fn flip(&mut self, kind: ReactionKind) -> LocalFlip {
        let was_on = self.mine.get(kind);
        let count = self.target.counts.get_mut(kind);
        let previous_count = *count;
        let mut clamped = false;

        if was_on {
            if *count == 0 {
                error!(
                    "{} count on {} would go negative; holding at zero",
                    kind, self.target.id
                );
                clamped = true;
            } else {
                *count -= 1;
            }
        } else {
            *count = count.saturating_add(1);
        }

        let count = *count;
        self.mine.set(kind, !was_on);

        LocalFlip {
            kind,
            now_on: !was_on,
            previous_count,
            count,
            clamped,
        }
    }

    /// Undo a flip whose remote write did not land
    pub fn rollback(&mut self, flip: &LocalFlip) {
        *self.target.counts.get_mut(flip.kind) = flip.previous_count;
        self.mine.set(flip.kind, !flip.now_on);
    }
}
