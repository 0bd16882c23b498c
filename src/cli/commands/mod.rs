pub mod auth;
pub mod bookmarks;
pub mod recipes;

use crate::cli::config::AppContext;
use crate::session::Gate;
use crate::types::User;

/// Run a protected command: resolve the session, then gate on it.
///
/// An unauthenticated caller gets an error pointing at `auth login`, and
/// `location` is remembered so login can offer to resume it.
pub async fn require_session(ctx: &AppContext, location: &str) -> anyhow::Result<User> {
    ctx.session.resolve_session().await;

    match ctx.session.gate(location) {
        Gate::Render(user) => Ok(user),
        Gate::Loading => Err(anyhow::anyhow!("Session is still being resolved, try again")),
        Gate::Redirect(redirect) => {
            ctx.remember_return_to(&redirect.return_to);
            tracing::debug!("Redirecting '{}' to {}", redirect.return_to, redirect.login_path);
            Err(anyhow::anyhow!(
                "Login required: run `recipes auth login <email>` first, then `recipes {}`",
                redirect.return_to
            ))
        }
    }
}
