/// Shared types used across the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated identity as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub email: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Token pair issued on login, register and refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// `data` block of login/register/refresh responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// Partial profile update, only set fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.username.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub recipes_count: u64,
    #[serde(default)]
    pub bookmarks_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Minutes
    #[serde(default)]
    pub prep_time: Option<u32>,
    /// Minutes
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "opt_id_from_any")]
    pub author_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn total_time(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0).saturating_add(cook.unwrap_or(0))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(deserialize_with = "id_from_any")]
    pub recipe_id: String,
    #[serde(default)]
    pub recipe: Option<Recipe>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Server ids arrive as integers or strings depending on the table
#[derive(Deserialize)]
#[serde(untagged)]
enum AnyId {
    Text(String),
    Number(i64),
}

impl From<AnyId> for String {
    fn from(id: AnyId) -> Self {
        match id {
            AnyId::Text(s) => s,
            AnyId::Number(n) => n.to_string(),
        }
    }
}

fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    AnyId::deserialize(deserializer).map(String::from)
}

fn opt_id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<AnyId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_accepts_numeric_id_and_name_alias() {
        let user: User = serde_json::from_value(json!({
            "id": 42,
            "email": "cook@example.com",
            "name": "Julia"
        }))
        .unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.display_name, "Julia");
        assert!(user.username.is_none());
    }

    #[test]
    fn test_auth_payload_flattens_tokens() {
        let payload: AuthPayload = serde_json::from_value(json!({
            "user": {"id": "u1", "email": "a@b.c", "displayName": "A"},
            "accessToken": "at",
            "refreshToken": "rt"
        }))
        .unwrap();
        assert_eq!(payload.tokens.access_token, "at");
        assert_eq!(payload.user.unwrap().id, "u1");
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Bakes bread".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"bio": "Bakes bread"}));
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_recipe_total_time() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 7,
            "title": "Shakshuka",
            "prepTime": 10,
            "cookTime": 25,
            "difficulty": "easy",
            "authorId": 3
        }))
        .unwrap();
        assert_eq!(recipe.total_time(), Some(35));
        assert_eq!(recipe.author_id.as_deref(), Some("3"));
        assert_eq!(recipe.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_recipe_total_time_saturates() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 8,
            "title": "Sourdough starter",
            "prepTime": u32::MAX,
            "cookTime": 60
        }))
        .unwrap();
        assert_eq!(recipe.total_time(), Some(u32::MAX));
    }
}
