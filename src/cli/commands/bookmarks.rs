use clap::Subcommand;
use serde_json::json;

use crate::cli::config::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::pagination::{PageQuery, PaginationState};

#[derive(Subcommand)]
pub enum BookmarkCommands {
    #[command(about = "List bookmarked recipes")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: u32,
        #[arg(long, help = "Bookmarks per page")]
        limit: Option<u32>,
    },

    #[command(about = "Bookmark a recipe")]
    Add {
        #[arg(help = "Recipe ID")]
        recipe_id: String,
    },

    #[command(about = "Remove a bookmark")]
    Remove {
        #[arg(help = "Recipe ID")]
        recipe_id: String,
    },
}

impl BookmarkCommands {
    /// Command line that reproduces this invocation, used as the login return target
    fn location(&self) -> String {
        match self {
            BookmarkCommands::List { page, limit } => match limit {
                Some(limit) => format!("bookmarks list --page {} --limit {}", page, limit),
                None => format!("bookmarks list --page {}", page),
            },
            BookmarkCommands::Add { recipe_id } => format!("bookmarks add {}", recipe_id),
            BookmarkCommands::Remove { recipe_id } => format!("bookmarks remove {}", recipe_id),
        }
    }
}

pub async fn handle(cmd: BookmarkCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let output_format = &ctx.output;
    super::require_session(ctx, &cmd.location()).await?;
    let token = ctx.session.access_token()?;

    match cmd {
        BookmarkCommands::List { page, limit } => {
            let mut state = PaginationState::new(ctx.config.clamp_page_size(limit));
            let query = PageQuery {
                page: page.max(1),
                limit: state.page_size(),
            };
            let result = ctx
                .session
                .check_token_expiry(ctx.api.list_bookmarks(&token, &query).await)?;
            state.sync_from(&result.pagination);

            if result.items.is_empty() {
                if state.total_items() > 0 {
                    return Err(anyhow::anyhow!(
                        "Page {} is past the end, there are {} pages",
                        query.page,
                        state.total_pages()
                    ));
                }
                return output_empty_collection(output_format, "items", "No bookmarks yet");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "items": result.items,
                        "pagination": pagination_json(&state),
                    }))?);
                }
                OutputFormat::Text => {
                    println!("{:<10} {:<10} {}", "BOOKMARK", "RECIPE", "TITLE");
                    println!("{}", "-".repeat(60));
                    for bookmark in &result.items {
                        let title = bookmark
                            .recipe
                            .as_ref()
                            .map(|r| r.title.as_str())
                            .unwrap_or("-");
                        println!("{:<10} {:<10} {}", bookmark.id, bookmark.recipe_id, title);
                    }
                    println!("{}", pagination_footer(&state));
                }
            }
            Ok(())
        }
        BookmarkCommands::Add { recipe_id } => {
            let bookmark = ctx
                .session
                .check_token_expiry(ctx.api.add_bookmark(&token, &recipe_id).await)?;
            output_success(
                output_format,
                &format!("Bookmarked recipe {}", recipe_id),
                Some(json!({ "bookmark": bookmark })),
            )
        }
        BookmarkCommands::Remove { recipe_id } => {
            ctx.session
                .check_token_expiry(ctx.api.remove_bookmark(&token, &recipe_id).await)?;
            output_success(output_format, &format!("Removed bookmark for recipe {}", recipe_id), None)
        }
    }
}
