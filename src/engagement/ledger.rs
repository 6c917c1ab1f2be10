//! Toggle protocol and contribution flow

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use super::policy::{comments_available, ensure_reaction};
use super::view::{EngagementView, LocalFlip};
use crate::domain::{Comment, ContributionKind, Profile, ReactionKind, ReactionRecord, UserId};
use crate::error::CoreError;
use crate::progression::{ProgressionEngine, ProgressionEvent};
use crate::store::{Backend, StoreError};

/// Whether the remote ledger accepted the write behind a local flip
#[derive(Debug)]
pub enum SyncStatus {
    /// Applied locally and remotely
    Synced,
    /// Applied locally only; the remote write failed and nothing retries it
    Pending(StoreError),
}

/// Result of a toggle that passed the availability policy
#[derive(Debug)]
pub struct ToggleOutcome {
    pub flip: LocalFlip,
    pub sync: SyncStatus,
}

impl ToggleOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self.sync, SyncStatus::Synced)
    }
}

/// Result of a contribution (prayer, guidance or plain comment)
#[derive(Debug, Serialize)]
pub struct Contribution {
    /// Stored comment; `None` on confessions, which keep no thread
    pub comment: Option<Comment>,
    /// Present when the contribution latched the matching reaction On
    pub reaction: Option<LocalFlip>,
    /// Progression events credited to the contributor (empty when nothing was earned)
    pub events: Vec<ProgressionEvent>,
}

impl Contribution {
    pub fn credited(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Reaction ledger bound to a backend
#[derive(Clone)]
pub struct ReactionLedger {
    backend: Arc<dyn Backend>,
    progression: ProgressionEngine,
}

impl ReactionLedger {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            progression: ProgressionEngine::new(backend.clone()),
            backend,
        }
    }

    /// Reaction-bar toggle. Never credits XP.
    ///
    /// The local view flips first; the remote insert/delete follows. A remote
    /// failure is reported as [`SyncStatus::Pending`] and the local flip is kept;
    /// callers that prefer consistency call [`EngagementView::rollback`].
    pub async fn toggle(
        &self,
        actor: &UserId,
        view: &mut EngagementView,
        kind: ReactionKind,
    ) -> Result<ToggleOutcome, CoreError> {
        ensure_reaction(kind, view.target.kind)?;

        let flip = view.flip(kind);
        let record = ReactionRecord::new(view.target.id.clone(), actor.clone(), kind);
        let result = if flip.now_on {
            self.backend.insert_reaction(&record).await
        } else {
            self.backend.delete_reaction(&record).await
        };

        let sync = match result {
            Ok(()) => {
                debug!(
                    "{} {} {} on {} (count {})",
                    actor,
                    if flip.now_on { "applied" } else { "removed" },
                    kind,
                    view.target.id,
                    flip.count
                );
                SyncStatus::Synced
            }
            Err(e) => {
                warn!(
                    "Remote {} write for {} on {} failed, local state left pending: {}",
                    kind, actor, view.target.id, e
                );
                SyncStatus::Pending(e)
            }
        };

        Ok(ToggleOutcome { flip, sync })
    }

    /// Contribution flow: store the comment, then credit the actor.
    ///
    /// Prayer and guidance contributions latch the `pray` / `guide` reaction and
    /// credit XP only when that reaction goes Off→On. Plain comments always
    /// credit the comment reward and are refused on confessions. Prayer and
    /// guidance on a confession latch and credit without storing a comment.
    ///
    /// All or nothing: if any write after the comment insert fails, the comment
    /// and reaction are removed again, `view` is restored, and the error is
    /// returned, so the caller can retry the same contribution.
    pub async fn contribute(
        &self,
        actor: &mut Profile,
        view: &mut EngagementView,
        kind: ContributionKind,
        content: &str,
    ) -> Result<Contribution, CoreError> {
        let reaction_kind = match kind {
            ContributionKind::Prayer => Some(ReactionKind::Pray),
            ContributionKind::Guidance => Some(ReactionKind::Guide),
            ContributionKind::Comment => None,
        };
        match reaction_kind {
            Some(reaction_kind) => ensure_reaction(reaction_kind, view.target.kind)?,
            None if !comments_available(view.target.kind) => {
                return Err(CoreError::CommentsDisabled(view.target.kind))
            }
            None => {}
        }

        let comment = if comments_available(view.target.kind) {
            let comment = Comment::new(view.target.id.clone(), actor.id.clone(), kind, content);
            self.backend.insert_comment(&comment).await?;
            view.target.comments_count = view.target.comments_count.saturating_add(1);
            Some(comment)
        } else {
            None
        };

        let Some(reaction_kind) = reaction_kind else {
            return match self.progression.apply_action(actor, kind.action()).await {
                Ok(events) => Ok(Contribution {
                    comment,
                    reaction: None,
                    events,
                }),
                Err(e) => {
                    self.undo_comment(view, comment.as_ref()).await;
                    Err(e)
                }
            };
        };

        if view.is_on(reaction_kind) {
            debug!(
                "{} already holds {} on {}; contribution earns nothing",
                actor.id, reaction_kind, view.target.id
            );
            return Ok(Contribution {
                comment,
                reaction: None,
                events: Vec::new(),
            });
        }

        let outcome = self.toggle(&actor.id, view, reaction_kind).await?;
        let flip = outcome.flip;
        if let SyncStatus::Pending(e) = outcome.sync {
            view.rollback(&flip);
            self.undo_comment(view, comment.as_ref()).await;
            return Err(CoreError::Persistence(e));
        }

        match self.progression.apply_action(actor, kind.action()).await {
            Ok(events) => Ok(Contribution {
                comment,
                reaction: Some(flip),
                events,
            }),
            Err(e) => {
                self.undo_reaction(&actor.id, view, &flip).await;
                self.undo_comment(view, comment.as_ref()).await;
                Err(e)
            }
        }
    }

    /// Remove a reaction row written by a contribution that did not complete
    async fn undo_reaction(&self, actor: &UserId, view: &mut EngagementView, flip: &LocalFlip) {
        let record = ReactionRecord::new(view.target.id.clone(), actor.clone(), flip.kind);
        if let Err(e) = self.backend.delete_reaction(&record).await {
            error!(
                "Failed to undo {} by {} on {}: {}",
                flip.kind, actor, view.target.id, e
            );
        }
        view.rollback(flip);
    }

    async fn undo_comment(&self, view: &mut EngagementView, comment: Option<&Comment>) {
        let Some(comment) = comment else {
            return;
        };
        match self.backend.delete_comment(comment).await {
            Ok(()) => {
                view.target.comments_count = view.target.comments_count.saturating_sub(1);
            }
            Err(e) => error!(
                "Failed to undo comment {} on {}: {}",
                comment.id, view.target.id, e
            ),
        }
    }
}
