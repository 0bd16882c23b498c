use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ApiError;
use crate::pagination::PaginationState;
use crate::types::{Recipe, User};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an API error in the appropriate format
pub fn output_error(output_format: &OutputFormat, error: &ApiError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error.to_json())?);
        }
        OutputFormat::Text => match error.status_code() {
            Some(status) => eprintln!("Error ({}): {}", status, error.message()),
            None => eprintln!("Error: {}", error),
        },
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output user details in the appropriate format
pub fn output_user(output_format: &OutputFormat, label: &str, user: &User) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ label: user }))?);
        }
        OutputFormat::Text => {
            println!("{}: {} <{}>", capitalize(label), user.display_name, user.email);
            println!("ID: {}", user.id);
            if let Some(username) = &user.username {
                println!("Username: {}", username);
            }
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                println!("Bio: {}", bio);
            }
        }
    }
    Ok(())
}

/// Pagination block shared by every list command
pub fn pagination_json(state: &PaginationState) -> Value {
    json!({
        "page": state.current_page(),
        "limit": state.page_size(),
        "total": state.total_items(),
        "totalPages": state.total_pages(),
        "hasNext": state.has_next_page(),
        "hasPrev": state.has_previous_page(),
        "start": state.start_index(),
        "end": state.end_index(),
    })
}

/// "Showing 11-20 of 95 (page 2 of 10)"
pub fn pagination_footer(state: &PaginationState) -> String {
    if state.total_items() == 0 {
        return "No results".to_string();
    }

    let mut footer = format!(
        "Showing {}-{} of {} (page {} of {})",
        state.start_index(),
        state.end_index(),
        state.total_items(),
        state.current_page(),
        state.total_pages()
    );
    if state.has_next_page() {
        footer.push_str(" - more available");
    }
    footer
}

/// Print one page of recipes
pub fn output_recipe_page(
    output_format: &OutputFormat,
    recipes: &[Recipe],
    state: &PaginationState,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "items": recipes,
                "pagination": pagination_json(state),
            }))?);
        }
        OutputFormat::Text => {
            println!("{:<10} {:<40} {:<10} {}", "ID", "TITLE", "TIME", "DIFFICULTY");
            println!("{}", "-".repeat(72));
            for recipe in recipes {
                let time = recipe
                    .total_time()
                    .map(|m| format!("{} min", m))
                    .unwrap_or_else(|| "-".to_string());
                let difficulty = recipe
                    .difficulty
                    .map(|d| format!("{:?}", d).to_lowercase())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<10} {:<40} {:<10} {}", recipe.id, truncate(&recipe.title, 40), time, difficulty);
            }
            println!("{}", pagination_footer(state));
        }
    }
    Ok(())
}

/// Read one line from stdin after printing `prompt` to stderr.
///
/// Returns `None` at end of input.
pub async fn prompt_line(prompt: &str) -> anyhow::Result<Option<String>> {
    eprint!("{}", prompt);
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|read| (read > 0).then_some(line))
    })
    .await??;
    Ok(line.map(|l| l.trim_end_matches(['\r', '\n']).to_string()))
}

/// Use the given value or prompt for it
pub async fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => {
            let value = prompt_line(prompt).await?.unwrap_or_default();
            if value.is_empty() {
                return Err(anyhow::anyhow!("No value provided for '{}'", prompt.trim_end_matches([':', ' '])));
            }
            Ok(value)
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
