//! Persistence for comments and the author records they reference.
//!
//! Handlers never talk to a database directly; they receive an
//! `Arc<dyn Storage>` through the application state.

#[cfg(test)]
pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Comment, NewComment, User};

#[cfg(test)]
pub use memory::MemStorage;
pub use mysql::MySqlStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn article_exists(&self, article_id: i64) -> Result<bool>;

    /// All comments of an article, oldest first (ties broken by id).
    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>>;

    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>>;

    /// Ids of the direct replies to `parent_id`.
    async fn child_comment_ids(&self, parent_id: i64) -> Result<Vec<i64>>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;

    /// Removes a single row. Returns whether it existed.
    async fn remove_comment(&self, comment_id: i64) -> Result<bool>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Batched user lookup. Unknown ids are skipped.
    async fn find_users(&self, user_ids: &[i64]) -> Result<Vec<User>>;
}
