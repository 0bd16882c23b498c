pub mod client;
pub mod envelope;

pub use client::ApiClient;
pub use envelope::{decode_envelope, Envelope, Paginated, PaginationMeta};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{AuthPayload, Credentials, PasswordChange, ProfileUpdate, Registration, User, UserStats};

/// Auth endpoints the session layer depends on.
///
/// `ApiClient` is the production implementation; anything else that speaks
/// the same contract can drive a `SessionGuard`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST /auth/login
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError>;

    /// POST /auth/register
    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError>;

    /// POST /auth/logout
    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;

    /// POST /auth/refresh
    async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, ApiError>;

    /// GET /auth/profile
    async fn profile(&self, access_token: &str) -> Result<User, ApiError>;

    /// PUT /auth/profile
    async fn update_profile(&self, access_token: &str, update: &ProfileUpdate) -> Result<User, ApiError>;

    /// POST /auth/change-password
    async fn change_password(&self, access_token: &str, change: &PasswordChange) -> Result<(), ApiError>;

    /// GET /auth/stats
    async fn stats(&self, access_token: &str) -> Result<UserStats, ApiError>;
}
