use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{AuthorView, Comment};
use crate::storage::Storage;

/// Author projections keyed by user id, resolved ahead of thread assembly.
#[derive(Debug, Default, Clone)]
pub struct AuthorDirectory {
    authors: HashMap<i64, AuthorView>,
}

impl AuthorDirectory {
    pub fn author_of(&self, comment: &Comment) -> Result<AuthorView> {
        self.authors
            .get(&comment.author_id)
            .cloned()
            .ok_or(AppError::MissingAuthor {
                comment_id: comment.id,
                author_id: comment.author_id,
            })
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }
}

impl FromIterator<AuthorView> for AuthorDirectory {
    fn from_iter<I: IntoIterator<Item = AuthorView>>(iter: I) -> Self {
        Self {
            authors: iter.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

pub async fn project_author(storage: &dyn Storage, user_id: i64) -> Result<AuthorView> {
    storage
        .find_user(user_id)
        .await?
        .map(AuthorView::from)
        .ok_or(AppError::NotFound("Author"))
}

/// Looks up every distinct author of `comments` in a single storage call.
///
/// A comment whose author cannot be found is treated as corrupted data and
/// fails the whole lookup.
pub async fn resolve_authors(storage: &dyn Storage, comments: &[Comment]) -> Result<AuthorDirectory> {
    let mut author_ids: Vec<i64> = comments.iter().map(|c| c.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let directory: AuthorDirectory = storage
        .find_users(&author_ids)
        .await?
        .into_iter()
        .map(AuthorView::from)
        .collect();

    if let Some(comment) = comments
        .iter()
        .find(|c| !directory.authors.contains_key(&c.author_id))
    {
        return Err(AppError::MissingAuthor {
            comment_id: comment.id,
            author_id: comment.author_id,
        });
    }

    tracing::debug!(author_count = directory.len(), "authors resolved");
    Ok(directory)
}
