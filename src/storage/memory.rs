use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::comments::tree::sort_chronologically;
use crate::error::Result;
use crate::models::{Comment, NewComment, User};
use crate::storage::Storage;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    articles: HashSet<i64>,
    comments: BTreeMap<i64, Comment>,
    next_comment_id: i64,
}

/// In-process store used by the test suites.
#[derive(Debug, Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: i64, username: &str) -> User {
        let user = User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            display_name: Some(username.to_string()),
            bio: None,
            avatar_url: None,
            created_at: Utc::now(),
        };
        self.tables.write().await.users.insert(id, user.clone());
        user
    }

    pub async fn add_article(&self, id: i64) {
        self.tables.write().await.articles.insert(id);
    }

    /// Stores a comment row verbatim, bypassing every check `insert_comment`
    /// callers normally go through.
    pub async fn put_comment(&self, comment: Comment) {
        let mut tables = self.tables.write().await;
        tables.next_comment_id = tables.next_comment_id.max(comment.id);
        tables.comments.insert(comment.id, comment);
    }

    pub async fn comment_ids(&self) -> Vec<i64> {
        self.tables.read().await.comments.keys().copied().collect()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn article_exists(&self, article_id: i64) -> Result<bool> {
        Ok(self.tables.read().await.articles.contains(&article_id))
    }

    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .tables
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        sort_chronologically(&mut comments);
        Ok(comments)
    }

    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&comment_id).cloned())
    }

    async fn child_comment_ids(&self, parent_id: i64) -> Result<Vec<i64>> {
        let mut children: Vec<Comment> = self
            .tables
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        sort_chronologically(&mut children);
        Ok(children.into_iter().map(|c| c.id).collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        tables.next_comment_id += 1;
        let comment = Comment {
            id: tables.next_comment_id,
            article_id: comment.article_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at: comment.created_at,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn remove_comment(&self, comment_id: i64) -> Result<bool> {
        Ok(self
            .tables
            .write()
            .await
            .comments
            .remove(&comment_id)
            .is_some())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_users(&self, user_ids: &[i64]) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}
