//! Error taxonomy surfaced by the progression and engagement components

use crate::domain::{ReactionKind, TargetKind};
use crate::progression::UnlockProgress;
use crate::store::StoreError;

/// Errors returned to callers of the core
///
/// Callers own user-facing messaging; nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A profile or target that the operation needs does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The backing store rejected a read or write
    #[error("update failed: {0}")]
    Persistence(#[source] StoreError),

    /// Reaction kind is not offered on this post type
    #[error("'{kind}' is not available on {target_kind} posts")]
    Unavailable {
        kind: ReactionKind,
        target_kind: TargetKind,
    },

    /// Threaded comments are not offered on this post type
    #[error("comments are not available on {0} posts")]
    CommentsDisabled(TargetKind),

    /// Privileged feature requested before the unlock flag was latched
    #[error("circle creation is locked ({0})")]
    CircleLocked(UnlockProgress),

    /// Malformed input from a caller
    #[error("invalid {what}: {value:?}")]
    Validation { what: &'static str, value: String },
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            other => CoreError::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_stays_distinct() {
        let err: CoreError = StoreError::NotFound {
            entity: "profile",
            id: "u9".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { entity: "profile", .. }));

        let err: CoreError = StoreError::Unavailable("offline".to_string()).into();
        assert!(matches!(err, CoreError::Persistence(_)));
        assert!(err.to_string().starts_with("update failed"));
    }
}
