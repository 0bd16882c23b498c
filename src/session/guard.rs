use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockWriteGuard};

use tokio::sync::OnceCell;

use crate::api::AuthApi;
use crate::config::{ClientConfig, StorageKeys};
use crate::error::ApiError;
use crate::session::storage::CredentialStore;
use crate::session::token;
use crate::types::{AuthPayload, Credentials, PasswordChange, ProfileUpdate, Registration, User, UserStats};

/// Authentication lifecycle of one guard instance.
///
/// `Authenticated` carries the user, so a user can never be present while
/// the session is unauthenticated.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Pending,
    Authenticated(User),
    Unauthenticated,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Authenticated(_) => "authenticated",
            SessionStatus::Unauthenticated => "unauthenticated",
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Where an unauthenticated caller is sent, and where to go back afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub login_path: String,
    pub return_to: String,
}

/// Outcome of gating a protected view
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Loading,
    Redirect(LoginRedirect),
    Render(User),
}

/// Owns the session: stored credentials, current user, protected-view gating.
pub struct SessionGuard {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn CredentialStore>,
    keys: StorageKeys,
    login_path: String,
    status: RwLock<SessionStatus>,
    resolved: OnceCell<()>,
    return_to: Mutex<Option<String>>,
    torn_down: AtomicBool,
}

impl SessionGuard {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn CredentialStore>, config: &ClientConfig) -> Self {
        Self {
            api,
            store,
            keys: config.storage.keys.clone(),
            login_path: config.storage.login_path.clone(),
            status: RwLock::new(SessionStatus::Pending),
            resolved: OnceCell::new(),
            return_to: Mutex::new(None),
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self.status.read() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.status().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status(), SessionStatus::Authenticated(_))
    }

    /// User blob written by the last successful login or profile fetch
    pub fn cached_user(&self) -> Option<User> {
        let raw = self.store.get(&self.keys.user).ok()??;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached user: {}", e);
                None
            }
        }
    }

    /// Validate stored credentials against the server, once per guard.
    ///
    /// Concurrent callers share the in-flight resolution; callers arriving
    /// after it settled get the current status without a network call.
    pub async fn resolve_session(&self) -> SessionStatus {
        self.resolved.get_or_init(|| self.run_resolution()).await;
        self.status()
    }

    async fn run_resolution(&self) {
        let stored = match self.store.get(&self.keys.access_token) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read stored credentials: {}", e);
                None
            }
        };

        let Some(mut access_token) = stored else {
            tracing::debug!("No stored access token, session is unauthenticated");
            self.settle(SessionStatus::Unauthenticated);
            return;
        };

        if token::is_expired(&access_token) {
            match self.refresh_tokens().await {
                Some(fresh) => access_token = fresh,
                None => {
                    self.settle_expired();
                    return;
                }
            }
        }

        if let Some(cached) = self.cached_user() {
            tracing::debug!("Validating stored session for {}", cached.email);
        }

        let result = self.api.profile(&access_token).await;
        if self.is_torn_down() {
            tracing::debug!("Session guard torn down, dropping profile response");
            return;
        }

        match result {
            Ok(user) => {
                let mut status = self.lock_status();
                if self.is_torn_down() || *status != SessionStatus::Pending {
                    tracing::debug!("Session already decided, dropping profile for {}", user.email);
                    return;
                }
                if let Err(e) = self.write_user(&user) {
                    tracing::warn!("Could not cache user profile: {}", e);
                }
                tracing::debug!("Session resolved for {}", user.email);
                *status = SessionStatus::Authenticated(user);
            }
            Err(e) => {
                tracing::debug!("Stored session rejected: {}", e);
                self.settle_expired();
            }
        }
    }

    /// Exchange the stored refresh token; `None` when there is none or it was refused
    async fn refresh_tokens(&self) -> Option<String> {
        let refresh_token = self.store.get(&self.keys.refresh_token).ok().flatten()?;

        tracing::debug!("Access token expired, refreshing");
        match self.api.refresh(&refresh_token).await {
            Ok(payload) => {
                let status = self.lock_status();
                if self.is_torn_down() || *status != SessionStatus::Pending {
                    tracing::debug!("Session already decided, dropping refreshed tokens");
                    return None;
                }
                if let Err(e) = self.write_tokens(&payload) {
                    tracing::warn!("Could not store refreshed tokens: {}", e);
                }
                Some(payload.tokens.access_token)
            }
            Err(e) => {
                tracing::debug!("Token refresh refused: {}", e);
                None
            }
        }
    }

    /// Authenticate with email and password
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let payload = self.api.login(credentials).await?;
        self.establish(payload).await
    }

    /// Create an account and start a session for it
    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let payload = self.api.register(registration).await?;
        self.establish(payload).await
    }

    async fn establish(&self, payload: AuthPayload) -> Result<User, ApiError> {
        let user = match payload.user.clone() {
            Some(user) => user,
            None => self.api.profile(&payload.tokens.access_token).await?,
        };

        if self.is_torn_down() {
            tracing::debug!("Session guard torn down, not storing session for {}", user.email);
            return Ok(user);
        }

        {
            let mut status = self.lock_status();
            if let Err(e) = self.write_tokens(&payload).and_then(|_| self.write_user(&user)) {
                self.clear_storage();
                return Err(e);
            }
            *status = SessionStatus::Authenticated(user.clone());
        }

        tracing::debug!("Session established for {}", user.email);
        let _ = self.resolved.set(());
        Ok(user)
    }

    /// End the session. Local state is cleared even if the server call fails.
    pub async fn logout(&self) {
        let access_token = self.store.get(&self.keys.access_token).ok().flatten();

        if !self.is_torn_down() {
            self.end_session();
            let _ = self.resolved.set(());
        }

        if let Some(access_token) = access_token {
            if let Err(e) = self.api.logout(&access_token).await {
                tracing::warn!("Logout request failed, local session cleared anyway: {}", e);
            }
        }
    }

    /// Decide what a protected view shows for `location`
    pub fn gate(&self, location: &str) -> Gate {
        match self.status() {
            SessionStatus::Pending => Gate::Loading,
            SessionStatus::Authenticated(user) => Gate::Render(user),
            SessionStatus::Unauthenticated => {
                if let Ok(mut slot) = self.return_to.lock() {
                    *slot = Some(location.to_string());
                }
                Gate::Redirect(LoginRedirect {
                    login_path: self.login_path.clone(),
                    return_to: location.to_string(),
                })
            }
        }
    }

    /// Location recorded by the last redirect, cleared once taken
    pub fn take_return_to(&self) -> Option<String> {
        self.return_to.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Access token of the authenticated session
    pub fn access_token(&self) -> Result<String, ApiError> {
        if !self.is_authenticated() {
            return Err(ApiError::NotAuthenticated);
        }
        self.store
            .get(&self.keys.access_token)?
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Treat a 401 from an authenticated call as token expiry
    pub fn check_token_expiry<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            if e.is_unauthorized() && !self.is_torn_down() {
                tracing::debug!("Access token rejected, ending session: {}", e);
                self.end_session();
            }
        }
        result
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let access_token = self.access_token()?;
        let user = self.check_token_expiry(self.api.update_profile(&access_token, update).await)?;

        if !self.is_torn_down() {
            let mut status = self.lock_status();
            if matches!(*status, SessionStatus::Authenticated(_)) {
                self.write_user(&user)?;
                *status = SessionStatus::Authenticated(user.clone());
            }
        }
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let access_token = self.access_token()?;
        self.check_token_expiry(self.api.change_password(&access_token, change).await)
    }

    pub async fn stats(&self) -> Result<UserStats, ApiError> {
        let access_token = self.access_token()?;
        self.check_token_expiry(self.api.stats(&access_token).await)
    }

    /// Stop applying network results to this guard
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Storage writes that go with a status change happen while this is held
    fn lock_status(&self) -> RwLockWriteGuard<'_, SessionStatus> {
        match self.status.write() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn end_session(&self) {
        let mut current = self.lock_status();
        self.clear_storage();
        *current = SessionStatus::Unauthenticated;
    }

    /// Apply a resolution result unless login/logout already decided the state
    fn settle(&self, status: SessionStatus) {
        if self.is_torn_down() {
            return;
        }
        let mut current = self.lock_status();
        if *current == SessionStatus::Pending {
            *current = status;
        }
    }

    fn settle_expired(&self) {
        if self.is_torn_down() {
            return;
        }
        let mut current = self.lock_status();
        if *current == SessionStatus::Pending {
            self.clear_storage();
            *current = SessionStatus::Unauthenticated;
        }
    }

    fn write_tokens(&self, payload: &AuthPayload) -> Result<(), ApiError> {
        self.store.set(&self.keys.access_token, &payload.tokens.access_token)?;
        self.store.set(&self.keys.refresh_token, &payload.tokens.refresh_token)
    }

    fn write_user(&self, user: &User) -> Result<(), ApiError> {
        let blob = serde_json::to_string(user)?;
        self.store.set(&self.keys.user, &blob)
    }

    fn clear_storage(&self) {
        for key in [&self.keys.access_token, &self.keys.refresh_token, &self.keys.user] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Could not remove stored '{}': {}", key, e);
            }
        }
    }
}
