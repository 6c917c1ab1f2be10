//! Which reactions and affordances each post type exposes

use crate::domain::{ReactionKind, TargetKind};
use crate::error::CoreError;

/// Whether `kind` can be toggled on a target of `target_kind`
pub fn reaction_available(kind: ReactionKind, target_kind: TargetKind) -> bool {
    match kind {
        ReactionKind::Like | ReactionKind::Share => true,
        ReactionKind::Pray => matches!(
            target_kind,
            TargetKind::Prayer | TargetKind::Confession | TargetKind::Guidance
        ),
        ReactionKind::Guide => matches!(target_kind, TargetKind::Guidance | TargetKind::Confession),
    }
}

/// Confessions expose reactions only, never threaded discussion
pub fn comments_available(target_kind: TargetKind) -> bool {
    target_kind != TargetKind::Confession
}

/// Reaction kinds offered on a post type, in display order
pub fn available_reactions(target_kind: TargetKind) -> Vec<ReactionKind> {
    ReactionKind::ALL
        .into_iter()
        .filter(|kind| reaction_available(*kind, target_kind))
        .collect()
}

pub(crate) fn ensure_reaction(kind: ReactionKind, target_kind: TargetKind) -> Result<(), CoreError> {
    if reaction_available(kind, target_kind) {
        Ok(())
    } else {
        Err(CoreError::Unavailable { kind, target_kind })
    }
}
