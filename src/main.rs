use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::{ActionArg, ContributionArg, PostTypeArg, ReactionArg};

#[derive(Parser)]
#[command(name = "myfaith")]
#[command(about = "My Faith - XP progression and reaction ledger")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.myfaith/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the database path from the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Acting user id
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default ~/.myfaith/config.toml (records --db when given)
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Profile operations
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Apply an XP action to the acting user
    Act {
        #[arg(value_enum)]
        action: ActionArg,
    },

    /// Count today toward the daily streak
    Streak,

    /// Publish a post
    Post {
        #[arg(long, value_enum, default_value = "normal")]
        kind: PostTypeArg,

        /// Hide the author in the feed
        #[arg(long)]
        anonymous: bool,

        content: String,
    },

    /// Show the latest posts with your reactions
    Feed,

    /// Toggle a reaction-bar icon on a post (earns no XP)
    React {
        post: String,

        #[arg(value_enum)]
        kind: ReactionArg,
    },

    /// Leave a prayer, guidance or plain comment on a post
    Contribute {
        post: String,

        #[arg(value_enum)]
        kind: ContributionArg,

        content: String,
    },

    /// Check whether the acting user may create a circle
    Circle,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Create a profile for the acting user
    Create {
        /// Display name
        name: String,
    },
    /// Show level, progress and unlock status
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config.as_deref(), cli.db.as_deref(), force);
    }

    let ctx = cli::Context::open(cli.config.as_deref(), cli.db, cli.user, cli.json)?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Profile { command } => match command {
            ProfileCommands::Create { name } => cli::profile::create_command(&ctx, name).await?,
            ProfileCommands::Show => cli::profile::show_command(&ctx).await?,
        },
        Commands::Act { action } => cli::profile::act_command(&ctx, action.into()).await?,
        Commands::Streak => cli::profile::streak_command(&ctx).await?,
        Commands::Post {
            kind,
            anonymous,
            content,
        } => cli::post::post_command(&ctx, kind.into(), anonymous, content).await?,
        Commands::Feed => cli::post::feed_command(&ctx).await?,
        Commands::React { post, kind } => {
            cli::react::react_command(&ctx, &post, kind.into()).await?
        }
        Commands::Contribute {
            post,
            kind,
            content,
        } => cli::react::contribute_command(&ctx, &post, kind.into(), &content).await?,
        Commands::Circle => cli::profile::circle_command(&ctx).await?,
    }

    Ok(())
}
