//! In-process `AuthApi` double for session tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::types::{
    AuthPayload, AuthTokens, Credentials, PasswordChange, ProfileUpdate, Registration, User, UserStats,
};

pub fn sample_user() -> User {
    User {
        id: "u-1".to_string(),
        email: "julia@example.com".to_string(),
        display_name: "Julia".to_string(),
        username: Some("julia".to_string()),
        bio: None,
        avatar_url: None,
        created_at: None,
    }
}

/// Answers from scripted users; anything unscripted is a 401
#[derive(Default)]
pub struct ScriptedAuthApi {
    login_user: Mutex<Option<User>>,
    profile_user: Mutex<Option<User>>,
    refresh_tokens: Mutex<Option<AuthTokens>>,
    failing_logout: AtomicBool,
    hold_profile: AtomicBool,
    hold_refresh: AtomicBool,
    held_call_started: Notify,
    held_call_release: Notify,
    pub login_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl ScriptedAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Login and register succeed for this user, later profile calls return it too
    pub fn with_login(self, user: User) -> Self {
        *self.login_user.lock().unwrap() = Some(user);
        self
    }

    pub fn with_profile(self, user: User) -> Self {
        *self.profile_user.lock().unwrap() = Some(user);
        self
    }

    pub fn with_refresh(self, access_token: &str, refresh_token: &str) -> Self {
        *self.refresh_tokens.lock().unwrap() = Some(AuthTokens {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        });
        self
    }

    pub fn with_failing_logout(self) -> Self {
        self.failing_logout.store(true, Ordering::SeqCst);
        self
    }

    /// Profile calls block until `release_held_call`
    pub fn with_held_profile(self) -> Self {
        self.hold_profile.store(true, Ordering::SeqCst);
        self
    }

    /// Park `refresh` until `release_held_call`
    pub fn with_held_refresh(self) -> Self {
        self.hold_refresh.store(true, Ordering::SeqCst);
        self
    }

    pub async fn wait_for_held_call(&self) {
        self.held_call_started.notified().await;
    }

    pub fn release_held_call(&self) {
        self.held_call_release.notify_one();
    }

    async fn hold_if(&self, flag: &AtomicBool) {
        if flag.load(Ordering::SeqCst) {
            self.held_call_started.notify_one();
            self.held_call_release.notified().await;
        }
    }

    fn unauthorized<T>() -> Result<T, ApiError> {
        Err(ApiError::Unauthorized("Invalid or expired token".to_string()))
    }

    fn current_user(&self) -> Option<User> {
        let profile = self.profile_user.lock().unwrap().clone();
        profile.or_else(|| self.login_user.lock().unwrap().clone())
    }

    fn issue(&self) -> Result<AuthPayload, ApiError> {
        match self.login_user.lock().unwrap().clone() {
            Some(user) => Ok(AuthPayload {
                user: Some(user),
                tokens: AuthTokens {
                    access_token: "access-1".to_string(),
                    refresh_token: "refresh-1".to_string(),
                },
            }),
            None => Self::unauthorized(),
        }
    }
}

#[async_trait]
impl AuthApi for ScriptedAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.issue()
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthPayload, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.issue()
    }

    async fn logout(&self, _access_token: &str) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_logout.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<AuthPayload, ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.hold_if(&self.hold_refresh).await;
        match self.refresh_tokens.lock().unwrap().clone() {
            Some(tokens) => Ok(AuthPayload { user: None, tokens }),
            None => Self::unauthorized(),
        }
    }

    async fn profile(&self, _access_token: &str) -> Result<User, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.hold_if(&self.hold_profile).await;
        match self.current_user() {
            Some(user) => Ok(user),
            None => Self::unauthorized(),
        }
    }

    async fn update_profile(&self, _access_token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        let Some(mut user) = self.current_user() else {
            return Self::unauthorized();
        };
        if let Some(name) = &update.display_name {
            user.display_name = name.clone();
        }
        if let Some(username) = &update.username {
            user.username = Some(username.clone());
        }
        if let Some(bio) = &update.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar) = &update.avatar_url {
            user.avatar_url = Some(avatar.clone());
        }
        *self.profile_user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn change_password(&self, _access_token: &str, _change: &PasswordChange) -> Result<(), ApiError> {
        match self.current_user() {
            Some(_) => Ok(()),
            None => Self::unauthorized(),
        }
    }

    async fn stats(&self, _access_token: &str) -> Result<UserStats, ApiError> {
        Self::unauthorized()
    }
}
