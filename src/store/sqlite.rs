//! SQLite-backed store with automatic schema setup
//!
//! rusqlite is synchronous, so every [`Backend`] call runs its statements on
//! the blocking pool via `tokio::task::spawn_blocking` while holding the
//! connection mutex. Callers therefore need a tokio runtime.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{Backend, StoreError};
use crate::domain::{
    Comment, EngagementTarget, Profile, ProfilePatch, ProfileStats, ReactionCounts,
    ReactionKind, ReactionRecord, TargetId, UserId,
};

const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Database wrapper around one shared connection
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!(
                    "failed to create database dir {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::from_connection(conn)
    }

    /// Private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().expect("database lock poisoned");
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("database task failed: {}", e)))?
    }
}

/// Upgrade hook for future schema versions. Refuses databases written by a
/// newer build.
fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Unavailable(format!(
            "database schema v{} is newer than supported v{}",
            version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

/// Denormalized counter column for a reaction kind
fn count_column(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Like => "likes_count",
        ReactionKind::Pray => "prayers_count",
        ReactionKind::Guide => "guides_count",
        ReactionKind::Share => "shares_count",
    }
}

fn parse_column<T>(column: &'static str, value: String) -> Result<T, StoreError>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| StoreError::Corrupt { column, value })
}

fn post_not_found(id: &TargetId) -> StoreError {
    StoreError::NotFound {
        entity: "post",
        id: id.to_string(),
    }
}

const TARGET_COLUMNS: &str = "id, user_id, post_type, content, is_anonymous, likes_count, \
     prayers_count, guides_count, shares_count, comments_count, created_at";

/// Row as read from `posts`, before enum columns are parsed
struct TargetRow {
    id: String,
    user_id: String,
    post_type: String,
    content: String,
    is_anonymous: bool,
    counts: ReactionCounts,
    comments_count: u32,
    created_at: i64,
}

impl TargetRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            user_id: r.get(1)?,
            post_type: r.get(2)?,
            content: r.get(3)?,
            is_anonymous: r.get(4)?,
            counts: ReactionCounts {
                likes: r.get(5)?,
                prayers: r.get(6)?,
                guides: r.get(7)?,
                shares: r.get(8)?,
            },
            comments_count: r.get(9)?,
            created_at: r.get(10)?,
        })
    }

    fn into_target(self) -> Result<EngagementTarget, StoreError> {
        Ok(EngagementTarget {
            id: TargetId::new(self.id),
            author_id: UserId::new(self.user_id),
            kind: parse_column("post_type", self.post_type)?,
            content: self.content,
            is_anonymous: self.is_anonymous,
            counts: self.counts,
            comments_count: self.comments_count,
            created_at: from_ms(self.created_at),
        })
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn fetch_profile(&self, id: &UserId) -> Result<Profile, StoreError> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let profile = conn
                .query_row(
                    r#"SELECT id, name, xp, level, posts_count, prayers_given, helpful_guidance,
                              daily_streak, can_create_circle, join_date
                       FROM profiles WHERE id = ?1"#,
                    [id.as_str()],
                    |r| {
                        Ok(Profile {
                            id: UserId::new(r.get::<_, String>(0)?),
                            name: r.get(1)?,
                            xp: r.get(2)?,
                            level: r.get(3)?,
                            stats: ProfileStats {
                                posts_count: r.get(4)?,
                                prayers_given: r.get(5)?,
                                helpful_guidance: r.get(6)?,
                                daily_streak: r.get(7)?,
                            },
                            can_create_circle: r.get(8)?,
                            join_date: from_ms(r.get(9)?),
                        })
                    },
                )
                .optional()?;

            profile.ok_or_else(|| StoreError::NotFound {
                entity: "profile",
                id: id.to_string(),
            })
        })
        .await
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let profile = profile.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"INSERT INTO profiles
                   (id, name, xp, level, posts_count, prayers_given, helpful_guidance,
                    daily_streak, can_create_circle, join_date, created_at, updated_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)"#,
                params![
                    profile.id.as_str(),
                    profile.name,
                    profile.xp,
                    profile.level,
                    profile.stats.posts_count,
                    profile.stats.prayers_given,
                    profile.stats.helpful_guidance,
                    profile.stats.daily_streak,
                    profile.can_create_circle,
                    profile.join_date.timestamp_millis(),
                    now_ms(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn patch_profile(&self, id: &UserId, patch: &ProfilePatch) -> Result<(), StoreError> {
        let id = id.clone();
        let patch = patch.clone();
        self.with_conn(move |conn| {
            // One statement: every patched column lands together or not at all
            let changed = conn.execute(
                r#"UPDATE profiles SET
                       xp = COALESCE(?1, xp),
                       level = COALESCE(?2, level),
                       posts_count = COALESCE(?3, posts_count),
                       prayers_given = COALESCE(?4, prayers_given),
                       helpful_guidance = COALESCE(?5, helpful_guidance),
                       daily_streak = COALESCE(?6, daily_streak),
                       can_create_circle = COALESCE(?7, can_create_circle),
                       updated_at = ?8
                   WHERE id = ?9"#,
                params![
                    patch.xp,
                    patch.level,
                    patch.posts_count,
                    patch.prayers_given,
                    patch.helpful_guidance,
                    patch.daily_streak,
                    patch.can_create_circle,
                    now_ms(),
                    id.as_str(),
                ],
            )?;

            if changed == 0 {
                return Err(StoreError::NotFound {
                    entity: "profile",
                    id: id.to_string(),
                });
            }
            Ok(())
        })
        .await
    }

    async fn insert_target(&self, target: &EngagementTarget) -> Result<(), StoreError> {
        let target = target.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"INSERT INTO posts
                   (id, user_id, post_type, content, is_anonymous, likes_count, prayers_count,
                    guides_count, shares_count, comments_count, created_at, updated_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)"#,
                params![
                    target.id.as_str(),
                    target.author_id.as_str(),
                    target.kind.as_str(),
                    target.content,
                    target.is_anonymous,
                    target.counts.likes,
                    target.counts.prayers,
                    target.counts.guides,
                    target.counts.shares,
                    target.comments_count,
                    target.created_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete_target(&self, id: &TargetId) -> Result<(), StoreError> {
        let id = id.clone();
        self.with_conn(move |conn| {
            // Reaction and comment rows go with it (ON DELETE CASCADE)
            conn.execute("DELETE FROM posts WHERE id = ?1", [id.as_str()])?;
            Ok(())
        })
        .await
    }

    async fn fetch_target(&self, id: &TargetId) -> Result<EngagementTarget, StoreError> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM posts WHERE id = ?1", TARGET_COLUMNS),
                    [id.as_str()],
                    TargetRow::from_row,
                )
                .optional()?;

            match row {
                Some(row) => row.into_target(),
                None => Err(post_not_found(&id)),
            }
        })
        .await
    }

    async fn list_targets(&self, limit: usize) -> Result<Vec<EngagementTarget>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM posts ORDER BY created_at DESC LIMIT ?1",
                TARGET_COLUMNS
            ))?;
            let rows = stmt
                .query_map([limit as i64], TargetRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(TargetRow::into_target).collect()
        })
        .await
    }

    async fn insert_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError> {
        let reaction = reaction.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let exists = tx
                .query_row(
                    "SELECT 1 FROM posts WHERE id = ?1",
                    [reaction.target_id.as_str()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Err(post_not_found(&reaction.target_id));
            }

            let inserted = tx.execute(
                r#"INSERT OR IGNORE INTO post_reactions (post_id, user_id, reaction_type, created_at)
                   VALUES (?1, ?2, ?3, ?4)"#,
                params![
                    reaction.target_id.as_str(),
                    reaction.user_id.as_str(),
                    reaction.kind.as_str(),
                    now_ms(),
                ],
            )?;
            if inserted > 0 {
                tx.execute(
                    &format!(
                        "UPDATE posts SET {col} = {col} + 1, updated_at = ?2 WHERE id = ?1",
                        col = count_column(reaction.kind)
                    ),
                    params![reaction.target_id.as_str(), now_ms()],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete_reaction(&self, reaction: &ReactionRecord) -> Result<(), StoreError> {
        let reaction = reaction.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let deleted = tx.execute(
                "DELETE FROM post_reactions WHERE post_id = ?1 AND user_id = ?2 AND reaction_type = ?3",
                params![
                    reaction.target_id.as_str(),
                    reaction.user_id.as_str(),
                    reaction.kind.as_str(),
                ],
            )?;
            if deleted > 0 {
                tx.execute(
                    &format!(
                        "UPDATE posts SET {col} = MAX({col} - 1, 0), updated_at = ?2 WHERE id = ?1",
                        col = count_column(reaction.kind)
                    ),
                    params![reaction.target_id.as_str(), now_ms()],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn reactions_for_user(
        &self,
        user: &UserId,
        targets: &[TargetId],
    ) -> Result<Vec<ReactionRecord>, StoreError> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let user = user.clone();
        let targets = targets.to_vec();
        self.with_conn(move |conn| {
            let placeholders = (2..targets.len() + 2)
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "SELECT post_id, reaction_type FROM post_reactions WHERE user_id = ?1 AND post_id IN ({})",
                placeholders
            );

            let mut stmt = conn.prepare(&sql)?;
            let values =
                std::iter::once(user.as_str()).chain(targets.iter().map(TargetId::as_str));
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values), |r| {
                    Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(post_id, kind)| -> Result<ReactionRecord, StoreError> {
                    Ok(ReactionRecord::new(
                        TargetId::new(post_id),
                        user.clone(),
                        parse_column("reaction_type", kind)?,
                    ))
                })
                .collect()
        })
        .await
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        let comment = comment.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let bumped = tx.execute(
                "UPDATE posts SET comments_count = comments_count + 1, updated_at = ?2 WHERE id = ?1",
                params![comment.target_id.as_str(), now_ms()],
            )?;
            if bumped == 0 {
                return Err(post_not_found(&comment.target_id));
            }

            tx.execute(
                r#"INSERT INTO comments (id, post_id, user_id, comment_type, content, created_at)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    comment.id,
                    comment.target_id.as_str(),
                    comment.user_id.as_str(),
                    comment.kind.as_str(),
                    comment.content,
                    comment.created_at.timestamp_millis(),
                ],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn delete_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        let comment = comment.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let deleted = tx.execute("DELETE FROM comments WHERE id = ?1", [comment.id.as_str()])?;
            if deleted > 0 {
                tx.execute(
                    r#"UPDATE posts SET comments_count = MAX(comments_count - 1, 0), updated_at = ?2
                       WHERE id = ?1"#,
                    params![comment.target_id.as_str(), now_ms()],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn comments_for_target(&self, target: &TargetId) -> Result<Vec<Comment>, StoreError> {
        let target = target.clone();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                r#"SELECT id, user_id, comment_type, content, created_at
                   FROM comments WHERE post_id = ?1 ORDER BY created_at ASC"#,
            )?;
            let rows = stmt
                .query_map([target.as_str()], |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                        r.get::<_, i64>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, user_id, kind, content, created_at)| -> Result<Comment, StoreError> {
                    Ok(Comment {
                        id,
                        target_id: target.clone(),
                        user_id: UserId::new(user_id),
                        kind: parse_column("comment_type", kind)?,
                        content,
                        created_at: from_ms(created_at),
                    })
                })
                .collect()
        })
        .await
    }
}

/// SQL schema for the database
const SCHEMA_SQL: &str = r#"
-- One row per user
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    xp INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    posts_count INTEGER NOT NULL DEFAULT 0,
    prayers_given INTEGER NOT NULL DEFAULT 0,
    helpful_guidance INTEGER NOT NULL DEFAULT 0,
    daily_streak INTEGER NOT NULL DEFAULT 0,
    can_create_circle INTEGER NOT NULL DEFAULT 0,
    join_date INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Posts with denormalized reaction counters
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    post_type TEXT NOT NULL,
    content TEXT NOT NULL,
    is_anonymous INTEGER NOT NULL DEFAULT 0,
    likes_count INTEGER NOT NULL DEFAULT 0,
    prayers_count INTEGER NOT NULL DEFAULT 0,
    guides_count INTEGER NOT NULL DEFAULT 0,
    shares_count INTEGER NOT NULL DEFAULT 0,
    comments_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);

-- Existence-based reaction rows
CREATE TABLE IF NOT EXISTS post_reactions (
    post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    reaction_type TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (post_id, user_id, reaction_type)
);
CREATE INDEX IF NOT EXISTS idx_reactions_user ON post_reactions(user_id);

-- Prayer, guidance and plain comments
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    comment_type TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;
