//! Profile, action, streak and circle commands

use anyhow::Result;
use serde::Serialize;

use myfaith::progression::{
    progress_fraction, require_circle_unlock, xp_threshold_for_next_level, UnlockProgress,
};
use myfaith::{ActionKind, CoreError, Profile};

use super::{print_events, Context};

#[derive(Serialize)]
struct ProfileSummary<'a> {
    profile: &'a Profile,
    next_level_xp: u64,
    progress: f64,
    unlock: UnlockProgress,
}

fn print_profile(profile: &Profile) {
    let unlock = UnlockProgress::for_profile(profile);
    println!("{} ({})", profile.name, profile.id);
    println!(
        "  Level {} - {} XP ({:.1}% to {} XP)",
        profile.level,
        profile.xp,
        progress_fraction(profile.xp) * 100.0,
        xp_threshold_for_next_level(profile.xp)
    );
    println!(
        "  Posts: {}  Prayers given: {}  Helpful guidance: {}  Daily streak: {}",
        profile.stats.posts_count,
        profile.stats.prayers_given,
        profile.stats.helpful_guidance,
        profile.stats.daily_streak
    );
    if unlock.unlocked {
        println!("  Circle creation: unlocked");
    } else {
        println!("  Circle creation: locked ({})", unlock);
    }
}

/// Create a profile for the acting user
pub async fn create_command(ctx: &Context, name: String) -> Result<()> {
    let user = ctx.user()?.clone();
    let profile = ctx.engine().create_profile(user, name).await?;
    ctx.emit(&profile, || print_profile(&profile))
}

/// Show the acting user's profile
pub async fn show_command(ctx: &Context) -> Result<()> {
    let profile = ctx.engine().load_profile(ctx.user()?).await?;
    let summary = ProfileSummary {
        profile: &profile,
        next_level_xp: xp_threshold_for_next_level(profile.xp),
        progress: progress_fraction(profile.xp),
        unlock: UnlockProgress::for_profile(&profile),
    };
    ctx.emit(&summary, || print_profile(&profile))
}

/// Apply one XP action
pub async fn act_command(ctx: &Context, action: ActionKind) -> Result<()> {
    let engine = ctx.engine();
    let mut profile = engine.load_profile(ctx.user()?).await?;
    let events = engine.apply_action(&mut profile, action).await?;
    ctx.emit(&events, || {
        println!("{} -> {}", profile.id, action);
        print_events(&events);
    })
}

/// Count today toward the daily streak
pub async fn streak_command(ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let mut profile = engine.load_profile(ctx.user()?).await?;
    let event = engine.record_daily_activity(&mut profile).await?;
    ctx.emit(&event, || print_events(std::slice::from_ref(&event)))
}

/// Check the circle-creation gate
pub async fn circle_command(ctx: &Context) -> Result<()> {
    let profile = ctx.engine().load_profile(ctx.user()?).await?;
    match require_circle_unlock(&profile) {
        Ok(()) => ctx.emit(&UnlockProgress::for_profile(&profile), || {
            println!("{} can create circles", profile.id)
        }),
        Err(CoreError::CircleLocked(progress)) => {
            ctx.emit(&progress, || {
                println!("Circle creation is locked. Requirements:");
                for requirement in &progress.requirements {
                    println!(
                        "  [{}] {} {} (have {})",
                        if requirement.is_met() { "x" } else { " " },
                        requirement.required,
                        requirement.label,
                        requirement.current
                    );
                }
            })
        }
        Err(e) => Err(e.into()),
    }
}
