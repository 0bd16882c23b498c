use clap::Subcommand;
use serde_json::json;

use crate::cli::config::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::session::SessionStatus;
use crate::types::{Credentials, PasswordChange, ProfileUpdate, Registration};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the recipe server")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout and forget stored credentials")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status {
        #[arg(long, help = "Report stored credentials without contacting the server")]
        offline: bool,
    },

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Email address")]
        email: String,
        #[arg(help = "Display name")]
        display_name: String,
        #[arg(long, help = "Username")]
        username: Option<String>,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Update profile fields")]
    Profile {
        #[arg(long, help = "New display name")]
        display_name: Option<String>,
        #[arg(long, help = "New username")]
        username: Option<String>,
        #[arg(long, help = "New bio")]
        bio: Option<String>,
        #[arg(long, help = "New avatar URL")]
        avatar_url: Option<String>,
    },

    #[command(about = "Change password")]
    Password {
        #[arg(long, help = "Current password (will prompt if not provided)")]
        current: Option<String>,
        #[arg(long, help = "New password (will prompt if not provided)")]
        new: Option<String>,
    },

    #[command(about = "Show recipe and bookmark counts")]
    Stats,
}

pub async fn handle(cmd: AuthCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let output_format = &ctx.output;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = value_or_prompt(password, "Password: ").await?;
            let user = ctx.session.login(&Credentials { email, password }).await?;
            output_success(
                output_format,
                &format!("Logged in as {} <{}>", user.display_name, user.email),
                Some(json!({ "user": user })),
            )?;
            resume_hint(ctx)
        }
        AuthCommands::Register { email, display_name, username, password } => {
            let password = value_or_prompt(password, "Password: ").await?;
            let registration = Registration {
                email,
                password,
                display_name,
                username,
            };
            let user = ctx.session.register(&registration).await?;
            output_success(
                output_format,
                &format!("Registered and logged in as {} <{}>", user.display_name, user.email),
                Some(json!({ "user": user })),
            )?;
            resume_hint(ctx)
        }
        AuthCommands::Logout => {
            ctx.session.logout().await;
            output_success(output_format, "Logged out", None)
        }
        AuthCommands::Status { offline } => {
            if offline {
                let has_token = ctx.store_has_token();
                let cached = ctx.session.cached_user();
                return match output_format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&json!({
                            "status": if has_token { "stored" } else { "none" },
                            "user": cached,
                        }))?);
                        Ok(())
                    }
                    OutputFormat::Text => {
                        match (has_token, cached) {
                            (true, Some(user)) => println!("Stored session for {} <{}> (not verified)", user.display_name, user.email),
                            (true, None) => println!("Stored session (not verified)"),
                            (false, _) => println!("No stored session"),
                        }
                        Ok(())
                    }
                };
            }

            let status = ctx.session.resolve_session().await;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "status": status.label(),
                        "user": status.user(),
                    }))?);
                }
                OutputFormat::Text => match &status {
                    SessionStatus::Authenticated(user) => {
                        println!("Authenticated as {} <{}>", user.display_name, user.email)
                    }
                    _ => println!("Not logged in"),
                },
            }
            Ok(())
        }
        AuthCommands::Whoami => {
            let status = ctx.session.resolve_session().await;
            match status.user() {
                Some(user) => output_user(output_format, "user", user),
                None => Err(anyhow::anyhow!("Not logged in")),
            }
        }
        AuthCommands::Profile { display_name, username, bio, avatar_url } => {
            let update = ProfileUpdate {
                display_name,
                username,
                bio,
                avatar_url,
            };
            if update.is_empty() {
                return Err(anyhow::anyhow!("Nothing to update: pass at least one field"));
            }

            super::require_session(ctx, "auth profile").await?;
            let user = ctx.session.update_profile(&update).await?;
            output_user(output_format, "user", &user)
        }
        AuthCommands::Password { current, new } => {
            super::require_session(ctx, "auth password").await?;
            let change = PasswordChange {
                current_password: value_or_prompt(current, "Current password: ").await?,
                new_password: value_or_prompt(new, "New password: ").await?,
            };
            ctx.session.change_password(&change).await?;
            output_success(output_format, "Password changed", None)
        }
        AuthCommands::Stats => {
            super::require_session(ctx, "auth stats").await?;
            let stats = ctx.session.stats().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "stats": stats }))?),
                OutputFormat::Text => {
                    println!("Recipes:   {}", stats.recipes_count);
                    println!("Bookmarks: {}", stats.bookmarks_count);
                }
            }
            Ok(())
        }
    }
}

fn resume_hint(ctx: &AppContext) -> anyhow::Result<()> {
    if let Some(location) = ctx.take_return_to() {
        if matches!(ctx.output, OutputFormat::Text) {
            println!("Continue with: recipes {}", location);
        }
    }
    Ok(())
}
