pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::cli::config::AppContext;

#[derive(Parser)]
#[command(name = "recipes")]
#[command(about = "Recipes CLI - browse recipes and manage bookmarks from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and profile management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Browse recipes")]
    Recipes {
        #[command(subcommand)]
        cmd: commands::recipes::RecipeCommands,
    },

    #[command(about = "Manage bookmarked recipes (requires login)")]
    Bookmarks {
        #[command(subcommand)]
        cmd: commands::bookmarks::BookmarkCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AppContext::from_env(output_format)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Recipes { cmd } => commands::recipes::handle(cmd, &ctx).await,
        Commands::Bookmarks { cmd } => commands::bookmarks::handle(cmd, &ctx).await,
    }
}
