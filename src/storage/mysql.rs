use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::error::Result;
use crate::models::{Comment, NewComment, User};
use crate::storage::Storage;

const COMMENT_COLUMNS: &str = "id, article_id, author_id, parent_id, content, created_at";
const USER_COLUMNS: &str = "id, username, email, display_name, bio, avatar_url, created_at";

#[derive(Debug, Clone)]
pub struct MySqlStorage {
    pool: MySqlPool,
}

impl MySqlStorage {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for MySqlStorage {
    async fn article_exists(&self, article_id: i64) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT id FROM articles WHERE id = ?")
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    async fn comments_for_article(&self, article_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE article_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find_comment(&self, comment_id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn child_comment_ids(&self, parent_id: i64) -> Result<Vec<i64>> {
        let rows = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM comments WHERE parent_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let result = sqlx::query(
            "INSERT INTO comments (article_id, author_id, parent_id, content, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(comment.article_id)
        .bind(comment.author_id)
        .bind(comment.parent_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(result.last_insert_id() as i64)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn remove_comment(&self, comment_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_users(&self, user_ids: &[i64]) -> Result<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder =
            QueryBuilder::<MySql>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ("));
        {
            let mut separated = query_builder.separated(", ");
            for user_id in user_ids {
                separated.push_bind(user_id);
            }
        }
        query_builder.push(")");

        let users = query_builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
