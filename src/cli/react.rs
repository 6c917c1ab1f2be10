//! Reaction and contribution commands

use anyhow::Result;
use serde::Serialize;

use myfaith::engagement::{SyncStatus, ToggleOutcome};
use myfaith::{ContributionKind, ReactionKind, TargetId};

use super::{print_events, Context};

#[derive(Serialize)]
struct ToggleReport {
    kind: ReactionKind,
    on: bool,
    count: u32,
    synced: bool,
    rolled_back: bool,
}

/// Apply the configured failure policy to a toggle and describe the result
fn settle(
    ctx: &Context,
    view: &mut myfaith::engagement::EngagementView,
    outcome: &ToggleOutcome,
) -> ToggleReport {
    let rolled_back = !outcome.is_synced() && ctx.config.engagement.rollback_on_failure;
    if rolled_back {
        view.rollback(&outcome.flip);
    }
    ToggleReport {
        kind: outcome.flip.kind,
        on: view.is_on(outcome.flip.kind),
        count: view.count(outcome.flip.kind),
        synced: outcome.is_synced(),
        rolled_back,
    }
}

fn print_toggle(report: &ToggleReport, outcome: &ToggleOutcome) {
    println!(
        "{} {} (count {})",
        report.kind,
        if report.on { "on" } else { "off" },
        report.count
    );
    if let SyncStatus::Pending(e) = &outcome.sync {
        if report.rolled_back {
            println!("  Not saved, rolled back: {}", e);
        } else {
            println!("  Not saved yet: {}", e);
        }
    }
}

/// Toggle a reaction-bar icon
pub async fn react_command(ctx: &Context, post: &str, kind: ReactionKind) -> Result<()> {
    let user = ctx.user()?;
    let mut view = ctx.feed().view(user, &TargetId::new(post)).await?;
    let outcome = ctx.ledger().toggle(user, &mut view, kind).await?;
    let report = settle(ctx, &mut view, &outcome);
    ctx.emit(&report, || print_toggle(&report, &outcome))
}

/// Leave a prayer, guidance or plain comment
pub async fn contribute_command(
    ctx: &Context,
    post: &str,
    kind: ContributionKind,
    content: &str,
) -> Result<()> {
    let user = ctx.user()?;
    let mut profile = ctx.engine().load_profile(user).await?;
    let mut view = ctx.feed().view(user, &TargetId::new(post)).await?;

    let contribution = ctx
        .ledger()
        .contribute(&mut profile, &mut view, kind, content)
        .await?;

    ctx.emit(&contribution, || {
        match &contribution.comment {
            Some(comment) => println!("Added {} to {}", comment.kind, view.target.id),
            None => println!("Recorded {} on {}", kind, view.target.id),
        }
        if let Some(flip) = &contribution.reaction {
            println!("{} on (count {})", flip.kind, flip.count);
        }
        if contribution.credited() {
            print_events(&contribution.events);
        } else {
            println!("  No XP: already gave {} on this post", kind);
        }
    })
}
