//! Publishing posts and loading a viewer's feed

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::domain::{
    ActionKind, PostDraft, Profile, ReactionRecord, TargetId, UserId, UserReactions,
};
use crate::engagement::EngagementView;
use crate::error::CoreError;
use crate::progression::{ProgressionEngine, ProgressionEvent};
use crate::store::Backend;

/// Default number of posts per feed page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Feed access for the current session
#[derive(Clone)]
pub struct Feed {
    backend: Arc<dyn Backend>,
    progression: ProgressionEngine,
    page_size: usize,
}

impl Feed {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            progression: ProgressionEngine::new(backend.clone()),
            backend,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Publish a post (all counts zero) and credit the author.
    ///
    /// Nothing is credited when the insert fails. When crediting fails the
    /// post is deleted again, so a retry does not leave a duplicate.
    pub async fn publish(
        &self,
        author: &mut Profile,
        draft: PostDraft,
    ) -> Result<(EngagementView, Vec<ProgressionEvent>), CoreError> {
        let target = draft.into_target(author.id.clone());
        self.backend.insert_target(&target).await?;

        let events = match self
            .progression
            .apply_action(author, ActionKind::CreatePost)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                if let Err(undo) = self.backend.delete_target(&target.id).await {
                    error!("Failed to remove uncredited post {}: {}", target.id, undo);
                }
                return Err(e);
            }
        };

        info!("{} published {} post {}", author.id, target.kind, target.id);
        Ok((EngagementView::new(target, UserReactions::default()), events))
    }

    /// Most recent posts with the viewer's own reaction state
    pub async fn load(&self, viewer: &UserId) -> Result<Vec<EngagementView>, CoreError> {
        let targets = self.backend.list_targets(self.page_size).await?;
        let ids: Vec<TargetId> = targets.iter().map(|t| t.id.clone()).collect();
        let rows = self.backend.reactions_for_user(viewer, &ids).await?;

        let mut by_target: HashMap<TargetId, Vec<ReactionRecord>> = HashMap::new();
        for row in rows {
            by_target.entry(row.target_id.clone()).or_default().push(row);
        }

        Ok(targets
            .into_iter()
            .map(|target| {
                let mine = by_target
                    .get(&target.id)
                    .map(|rows| UserReactions::from_records(rows))
                    .unwrap_or_default();
                EngagementView::new(target, mine)
            })
            .collect())
    }

    /// One post with the viewer's reaction state
    pub async fn view(&self, viewer: &UserId, id: &TargetId) -> Result<EngagementView, CoreError> {
        let target = self.backend.fetch_target(id).await?;
        let rows = self
            .backend
            .reactions_for_user(viewer, std::slice::from_ref(id))
            .await?;
        Ok(EngagementView::new(target, UserReactions::from_records(&rows)))
    }
}
