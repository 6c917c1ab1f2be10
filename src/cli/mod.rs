//! CLI command implementations

pub mod init;
pub mod post;
pub mod profile;
pub mod react;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use serde::Serialize;

use myfaith::config::Config;
use myfaith::engagement::ReactionLedger;
use myfaith::feed::Feed;
use myfaith::progression::ProgressionEngine;
use myfaith::store::{Backend, SqliteBackend};
use myfaith::{ActionKind, ContributionKind, ReactionKind, TargetKind, UserId};

/// Everything a command needs: config, backend and the acting user
pub struct Context {
    pub config: Config,
    pub backend: Arc<dyn Backend>,
    user: Option<UserId>,
    pub json: bool,
}

impl Context {
    pub fn open(
        config_path: Option<&Path>,
        db: Option<PathBuf>,
        user: Option<String>,
        json: bool,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };

        let db_path = db.unwrap_or_else(|| config.database_path());
        let backend = SqliteBackend::open(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        Ok(Self {
            config,
            backend: Arc::new(backend),
            user: user.map(UserId::new),
            json,
        })
    }

    /// The acting user; every command except `init` needs one
    pub fn user(&self) -> Result<&UserId> {
        self.user
            .as_ref()
            .context("No acting user: pass --user <id>")
    }

    pub fn engine(&self) -> ProgressionEngine {
        ProgressionEngine::new(self.backend.clone())
    }

    pub fn ledger(&self) -> ReactionLedger {
        ReactionLedger::new(self.backend.clone())
    }

    pub fn feed(&self) -> Feed {
        Feed::new(self.backend.clone()).with_page_size(self.config.feed.page_size)
    }

    /// Print `value` as pretty JSON when `--json` was given, else run `human`
    pub fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human();
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ActionArg {
    Post,
    Prayer,
    Guidance,
    Comment,
}

impl From<ActionArg> for ActionKind {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Post => ActionKind::CreatePost,
            ActionArg::Prayer => ActionKind::Prayer,
            ActionArg::Guidance => ActionKind::Guidance,
            ActionArg::Comment => ActionKind::Comment,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PostTypeArg {
    Normal,
    Prayer,
    Testimony,
    Guidance,
    Confession,
}

impl From<PostTypeArg> for TargetKind {
    fn from(arg: PostTypeArg) -> Self {
        match arg {
            PostTypeArg::Normal => TargetKind::Normal,
            PostTypeArg::Prayer => TargetKind::Prayer,
            PostTypeArg::Testimony => TargetKind::Testimony,
            PostTypeArg::Guidance => TargetKind::Guidance,
            PostTypeArg::Confession => TargetKind::Confession,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReactionArg {
    Like,
    Pray,
    Guide,
    Share,
}

impl From<ReactionArg> for ReactionKind {
    fn from(arg: ReactionArg) -> Self {
        match arg {
            ReactionArg::Like => ReactionKind::Like,
            ReactionArg::Pray => ReactionKind::Pray,
            ReactionArg::Guide => ReactionKind::Guide,
            ReactionArg::Share => ReactionKind::Share,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ContributionArg {
    Prayer,
    Guidance,
    Comment,
}

impl From<ContributionArg> for ContributionKind {
    fn from(arg: ContributionArg) -> Self {
        match arg {
            ContributionArg::Prayer => ContributionKind::Prayer,
            ContributionArg::Guidance => ContributionKind::Guidance,
            ContributionArg::Comment => ContributionKind::Comment,
        }
    }
}

/// One line per progression event
pub fn print_events(events: &[myfaith::progression::ProgressionEvent]) {
    use myfaith::progression::ProgressionEvent;

    for event in events {
        match event {
            ProgressionEvent::XpAwarded { action, amount } => {
                println!("  +{} XP ({})", amount, action)
            }
            ProgressionEvent::LevelUp(level_up) => {
                println!("  Level up! {} -> {}", level_up.old_level, level_up.new_level)
            }
            ProgressionEvent::CircleUnlocked => println!("  Circle creation unlocked"),
            ProgressionEvent::StreakExtended { count } => println!("  Daily streak: {}", count),
        }
    }
}
