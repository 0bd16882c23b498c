#![allow(dead_code)]

use std::sync::Arc;

use recipe_client::session::{MemoryStore, SessionGuard};
use recipe_client::{ApiClient, ClientConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct TestApi {
    pub server: MockServer,
    pub config: ClientConfig,
    pub client: Arc<ApiClient>,
}

impl TestApi {
    pub async fn start() -> anyhow::Result<Self> {
        let server = MockServer::start().await;
        // Mount under /api to make sure the base path survives URL building
        let config = ClientConfig::with_base_url(format!("{}/api", server.uri()));
        let client = Arc::new(ApiClient::new(&config)?);
        Ok(Self { server, config, client })
    }

    /// Guard over this server with the given store
    pub fn guard(&self, store: Arc<MemoryStore>) -> SessionGuard {
        SessionGuard::new(self.client.clone(), store, &self.config)
    }
}

pub fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn fail(error: &str) -> Value {
    json!({ "success": false, "error": error })
}

pub fn user_json() -> Value {
    json!({
        "id": 7,
        "email": "julia@example.com",
        "displayName": "Julia",
        "username": "julia"
    })
}

pub fn auth_json(access: &str, refresh: &str) -> Value {
    json!({
        "user": user_json(),
        "accessToken": access,
        "refreshToken": refresh
    })
}

pub fn recipe_json(id: u32) -> Value {
    json!({
        "id": id,
        "title": format!("Recipe {}", id),
        "ingredients": ["salt"],
        "instructions": ["cook"],
        "prepTime": 5,
        "cookTime": 10,
        "difficulty": "medium"
    })
}

/// `data` block of a recipe list response
pub fn recipe_page(page: u32, limit: u32, total: u64) -> Value {
    let total_pages = total.div_ceil(u64::from(limit)) as u32;
    let first = (page - 1) * limit + 1;
    let last = (page * limit).min(total as u32);
    let items: Vec<Value> = if first > last {
        Vec::new()
    } else {
        (first..=last).map(recipe_json).collect()
    };

    json!({
        "items": items,
        "pagination": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": total_pages,
            "hasNext": page < total_pages,
            "hasPrev": page > 1
        }
    })
}
