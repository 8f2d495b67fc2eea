//! Fixtures shared by the unit and handler tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::config::AppConfig;
use crate::models::{AuthorView, Comment};
use crate::routes::auth::Claims;
use crate::state::AppState;
use crate::storage::MemStorage;

pub const TEST_SECRET: &str = "test-secret";

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minute.into())
}

/// A comment on article 1 by user 1, posted `minute` minutes into the thread.
pub fn comment(id: i64, parent_id: Option<i64>, minute: u32) -> Comment {
    Comment {
        id,
        article_id: 1,
        author_id: 1,
        parent_id,
        content: format!("comment {id}"),
        created_at: at(minute),
    }
}

pub fn author(id: i64, username: &str) -> AuthorView {
    AuthorView {
        id,
        username: username.to_string(),
        display_name: None,
        bio: None,
        avatar_url: None,
        created_at: at(0),
    }
}

/// Users 1 (alice) and 2 (bob), articles 1 and 2, no comments.
pub async fn seeded_storage() -> Arc<MemStorage> {
    let storage = MemStorage::new();
    storage.add_user(1, "alice").await;
    storage.add_user(2, "bob").await;
    storage.add_article(1).await;
    storage.add_article(2).await;
    Arc::new(storage)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "mysql://unused".to_string(),
        secret_key: TEST_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        max_connections: 1,
    }
}

pub fn test_state(storage: Arc<MemStorage>) -> AppState {
    AppState::new(storage, test_config())
}

pub fn token_for(user_id: i64) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}
