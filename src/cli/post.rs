//! Post and feed commands

use anyhow::Result;

use myfaith::engagement::{available_reactions, comments_available};
use myfaith::timefmt::time_ago_now;
use myfaith::{PostDraft, TargetKind};

use super::{print_events, Context};

/// Publish a post as the acting user
pub async fn post_command(
    ctx: &Context,
    kind: TargetKind,
    anonymous: bool,
    content: String,
) -> Result<()> {
    let mut profile = ctx.engine().load_profile(ctx.user()?).await?;
    let mut draft = PostDraft::new(kind, content);
    if anonymous {
        draft = draft.anonymous();
    }

    let (view, events) = ctx.feed().publish(&mut profile, draft).await?;
    ctx.emit(&view, || {
        println!("Published {} {}", view.target.kind.label(), view.target.id);
        print_events(&events);
    })
}

/// Show the latest posts
pub async fn feed_command(ctx: &Context) -> Result<()> {
    let views = ctx.feed().load(ctx.user()?).await?;
    ctx.emit(&views, || {
        if views.is_empty() {
            println!("No posts yet.");
            return;
        }

        for view in &views {
            let target = &view.target;
            let author = if target.is_anonymous {
                "Anonymous".to_string()
            } else {
                target.author_id.to_string()
            };
            println!(
                "{} [{}] {} - {}",
                target.id,
                target.kind.label(),
                author,
                time_ago_now(target.created_at)
            );
            println!("    {}", target.content);

            let reactions: Vec<String> = available_reactions(target.kind)
                .into_iter()
                .map(|kind| {
                    let marker = if view.is_on(kind) { "*" } else { "" };
                    format!("{}{} {}", marker, kind, view.count(kind))
                })
                .collect();
            if comments_available(target.kind) {
                println!(
                    "    {}  comments {}",
                    reactions.join("  "),
                    target.comments_count
                );
            } else {
                println!("    {}", reactions.join("  "));
            }
            println!();
        }
    })
}
