use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::AuthorView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment as it appears inside a materialized thread.
///
/// `replies` is `None` for leaves and is left out of the JSON payload
/// entirely, so clients can tell a leaf apart from an empty reply list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<CommentWithAuthor>>,
}

impl CommentWithAuthor {
    pub fn new(comment: Comment, author: AuthorView, replies: Vec<CommentWithAuthor>) -> Self {
        Self {
            id: comment.id,
            article_id: comment.article_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at: comment.created_at,
            author,
            replies: if replies.is_empty() {
                None
            } else {
                Some(replies)
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub article_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub content: String,
    pub parent_id: Option<i64>,
}
