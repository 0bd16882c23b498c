use clap::Subcommand;
use serde_json::json;

use crate::api::{ApiClient, Paginated};
use crate::cli::config::AppContext;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::pagination::{PageQuery, PageUpdate, PaginationState};
use crate::types::Recipe;

#[derive(Subcommand)]
pub enum RecipeCommands {
    #[command(about = "List one page of recipes")]
    List {
        #[arg(long, default_value_t = 1, help = "Page number (clamped to the last page)")]
        page: u32,
        #[arg(long, help = "Recipes per page")]
        limit: Option<u32>,
        #[arg(long, help = "Search term")]
        search: Option<String>,
    },

    #[command(about = "Show a single recipe")]
    Show {
        #[arg(help = "Recipe ID")]
        id: String,
    },

    #[command(about = "Page through recipes interactively (n, p, f, l, g <page>, s <size>, q)")]
    Browse {
        #[arg(long, help = "Recipes per page")]
        limit: Option<u32>,
        #[arg(long, help = "Search term")]
        search: Option<String>,
    },
}

pub async fn handle(cmd: RecipeCommands, ctx: &AppContext) -> anyhow::Result<()> {
    let output_format = &ctx.output;

    match cmd {
        RecipeCommands::List { page, limit, search } => {
            let mut state = PaginationState::new(ctx.config.clamp_page_size(limit));
            let recipes = fetch_clamped(&ctx.api, &mut state, page, search.as_deref()).await?;

            if recipes.is_empty() && state.total_items() == 0 {
                return output_empty_collection(output_format, "items", "No recipes found");
            }
            output_recipe_page(output_format, &recipes, &state)
        }
        RecipeCommands::Show { id } => {
            let recipe = ctx.api.get_recipe(&id).await?;
            output_recipe(output_format, &recipe)
        }
        RecipeCommands::Browse { limit, search } => {
            let mut state = PaginationState::new(ctx.config.clamp_page_size(limit));
            let mut recipes = fetch_page(&ctx.api, &mut state, search.as_deref()).await?;
            output_recipe_page(output_format, &recipes, &state)?;

            loop {
                let Some(line) = prompt_line("browse> ").await? else {
                    break;
                };
                let update = match parse_browse_command(&line, &ctx.config) {
                    BrowseCommand::Quit => break,
                    BrowseCommand::Invalid(reason) => {
                        eprintln!("{}", reason);
                        continue;
                    }
                    BrowseCommand::Update(update) => update,
                };

                let before = state.query();
                state.apply([update]);
                if state.query() == before {
                    eprintln!("Already there");
                    continue;
                }

                match fetch_page(&ctx.api, &mut state, search.as_deref()).await {
                    Ok(page) => {
                        recipes = page;
                        output_recipe_page(output_format, &recipes, &state)?;
                    }
                    Err(e) => output_error(output_format, &e)?,
                }
            }
            Ok(())
        }
    }
}

/// Fetch the page `state` points at and adopt the server's pagination block
pub async fn fetch_page(
    api: &ApiClient,
    state: &mut PaginationState,
    search: Option<&str>,
) -> Result<Vec<Recipe>, ApiError> {
    let Paginated { items, pagination } = api.list_recipes(&state.query(), search).await?;
    state.sync_from(&pagination);
    Ok(items)
}

/// Fetch `page`, falling back to the last page when it lies past the end
pub async fn fetch_clamped(
    api: &ApiClient,
    state: &mut PaginationState,
    page: u32,
    search: Option<&str>,
) -> Result<Vec<Recipe>, ApiError> {
    let query = PageQuery {
        page: page.max(1),
        limit: state.page_size(),
    };
    let Paginated { items, pagination } = api.list_recipes(&query, search).await?;
    state.sync_from(&pagination);

    if query.page > state.total_pages() && state.total_pages() > 0 {
        tracing::debug!(
            "Page {} is past the end ({} pages), showing the last page",
            query.page,
            state.total_pages()
        );
        state.go_to_last_page();
        return fetch_page(api, state, search).await;
    }
    Ok(items)
}

#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Update(PageUpdate),
    Quit,
    Invalid(String),
}

/// Page sizes typed at the prompt obey the same bounds as `--limit`
fn parse_browse_command(line: &str, config: &ClientConfig) -> BrowseCommand {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg = parts.next().map(str::parse::<u32>);

    match (command, arg) {
        ("n" | "next", None) => BrowseCommand::Update(PageUpdate::Next),
        ("p" | "prev", None) => BrowseCommand::Update(PageUpdate::Previous),
        ("f" | "first", None) => BrowseCommand::Update(PageUpdate::First),
        ("l" | "last", None) => BrowseCommand::Update(PageUpdate::Last),
        ("g" | "goto", Some(Ok(page))) => BrowseCommand::Update(PageUpdate::GoToPage(page)),
        ("s" | "size", Some(Ok(size))) => {
            BrowseCommand::Update(PageUpdate::SetPageSize(config.clamp_page_size(Some(size))))
        }
        ("q" | "quit", None) => BrowseCommand::Quit,
        ("g" | "goto" | "s" | "size", _) => BrowseCommand::Invalid(format!("'{}' needs a number", command)),
        _ => BrowseCommand::Invalid("Commands: n, p, f, l, g <page>, s <size>, q".to_string()),
    }
}

fn output_recipe(output_format: &OutputFormat, recipe: &Recipe) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "recipe": recipe }))?);
        }
        OutputFormat::Text => {
            println!("{} (#{})", recipe.title, recipe.id);
            if let Some(description) = &recipe.description {
                println!("{}", description);
            }
            if let Some(total) = recipe.total_time() {
                println!("Time: {} min", total);
            }
            if let Some(servings) = recipe.servings {
                println!("Serves: {}", servings);
            }
            if !recipe.ingredients.is_empty() {
                println!("\nIngredients:");
                for ingredient in &recipe.ingredients {
                    println!("  - {}", ingredient);
                }
            }
            if !recipe.instructions.is_empty() {
                println!("\nInstructions:");
                for (i, step) in recipe.instructions.iter().enumerate() {
                    println!("  {}. {}", i + 1, step);
                }
            }
        }
    }
    Ok(())
}
