//! HTTP client for the recipe API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::api::envelope::{decode_envelope, truncate_body, Envelope, Paginated};
use crate::api::AuthApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::types::{
    AuthPayload, Bookmark, Credentials, PasswordChange, ProfileUpdate, Recipe, Registration, User,
    UserStats,
};

/// HTTP client for the recipe API.
///
/// One `reqwest::Client` is built at construction and reused, so connection
/// pooling spans every call made through this value.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_api_url: String,
    http: reqwest::Client,
    log_requests: bool,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        // Validate early so a bad RECIPES_API_URL fails at startup
        Url::parse(&config.api.base_url)
            .map_err(|e| ApiError::InvalidResponse(format!("invalid base URL '{}': {}", config.api.base_url, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("recipe-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                ApiError::Network(e.to_string())
            })?;

        Ok(Self {
            base_api_url: config.api.base_url.trim_end_matches('/').to_string(),
            http,
            log_requests: config.api.enable_request_logging,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_api_url, path)).map_err(|e| {
            tracing::error!("Invalid URL constructed for '{}': {}", path, e);
            ApiError::InvalidResponse(format!("invalid URL for '{}'", path))
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let url = self.get_url(path)?;
        if self.log_requests {
            tracing::debug!("{} {}", method, url);
        }

        let mut builder = self
            .http
            .request(method, url)
            .header("accept", "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let resp = builder.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            ApiError::Network(e.to_string())
        })?;

        decode_envelope(status.as_u16(), &body).inspect_err(|e| {
            if e.status_code().is_none() || status.is_server_error() {
                tracing::error!("Request failed with status {}: {}", status, truncate_body(&body));
            } else {
                tracing::debug!("Request rejected with status {}: {}", status, e);
            }
        })
    }

    async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send::<T>(builder).await?.into_data()
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }

    /// Fetches one page of recipes, optionally filtered by a search term.
    pub async fn list_recipes(
        &self,
        page: &PageQuery,
        search: Option<&str>,
    ) -> Result<Paginated<Recipe>, ApiError> {
        let mut builder = self.request(Method::GET, "/recipes", None)?.query(page);
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            builder = builder.query(&[("search", search)]);
        }
        self.send_data(builder).await
    }

    /// Fetches a single recipe by id.
    pub async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        let builder = self.request(Method::GET, &format!("/recipes/{}", id), None)?;
        self.send_data(builder).await
    }

    /// Fetches one page of the caller's bookmarks.
    pub async fn list_bookmarks(&self, token: &str, page: &PageQuery) -> Result<Paginated<Bookmark>, ApiError> {
        let builder = self.request(Method::GET, "/bookmarks", Some(token))?.query(page);
        self.send_data(builder).await
    }

    pub async fn add_bookmark(&self, token: &str, recipe_id: &str) -> Result<Bookmark, ApiError> {
        let builder = self.request(Method::POST, &format!("/bookmarks/{}", recipe_id), Some(token))?;
        self.send_data(builder).await
    }

    pub async fn remove_bookmark(&self, token: &str, recipe_id: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/bookmarks/{}", recipe_id), Some(token))?;
        self.send_empty(builder).await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        let builder = self.request(Method::POST, "/auth/login", None)?.json(credentials);
        self.send_data(builder).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError> {
        let builder = self.request(Method::POST, "/auth/register", None)?.json(registration);
        self.send_data(builder).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/auth/logout", Some(access_token))?;
        self.send_empty(builder).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthPayload, ApiError> {
        let builder = self
            .request(Method::POST, "/auth/refresh", None)?
            .json(&json!({ "refreshToken": refresh_token }));
        self.send_data(builder).await
    }

    async fn profile(&self, access_token: &str) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, "/auth/profile", Some(access_token))?;
        self.send_data(builder).await
    }

    async fn update_profile(&self, access_token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        let builder = self
            .request(Method::PUT, "/auth/profile", Some(access_token))?
            .json(update);
        self.send_data(builder).await
    }

    async fn change_password(&self, access_token: &str, change: &PasswordChange) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/auth/change-password", Some(access_token))?
            .json(change);
        self.send_empty(builder).await
    }

    async fn stats(&self, access_token: &str) -> Result<UserStats, ApiError> {
        let builder = self.request(Method::GET, "/auth/stats", Some(access_token))?;
        self.send_data(builder).await
    }
}
