//! Comment threads: reading an article's reply forest, posting comments and
//! removing a comment together with every reply beneath it.

pub mod authors;
pub mod tree;

use std::collections::HashSet;

use chrono::Utc;

use crate::error::{AppError, Integrity, Result};
use crate::models::{Comment, CommentWithAuthor, CreateComment, NewComment};
use crate::storage::Storage;

pub use authors::{project_author, resolve_authors};
pub use tree::{build_tree, sort_chronologically};

#[tracing::instrument(skip(storage))]
pub async fn list_thread(storage: &dyn Storage, article_id: i64) -> Result<Vec<CommentWithAuthor>> {
    ensure_article(storage, article_id).await?;

    let mut comments = storage.comments_for_article(article_id).await?;
    sort_chronologically(&mut comments);
    let comment_count = comments.len();
    let authors = resolve_authors(storage, &comments).await?;
    let thread = build_tree(comments, &authors)?;

    tracing::debug!(comment_count, root_count = thread.len(), "thread assembled");
    Ok(thread)
}

/// Looks up a comment, hiding it when it belongs to a different article than
/// `article_filter`.
pub async fn find_comment(
    storage: &dyn Storage,
    comment_id: i64,
    article_filter: Option<i64>,
) -> Result<Option<Comment>> {
    let Some(comment) = storage.find_comment(comment_id).await? else {
        return Ok(None);
    };

    if let Some(expected_article_id) = article_filter {
        if comment.article_id != expected_article_id {
            return Ok(None);
        }
    }

    Ok(Some(comment))
}

#[tracing::instrument(skip(storage, input), fields(parent_id = ?input.parent_id))]
pub async fn create_comment(
    storage: &dyn Storage,
    author_id: i64,
    article_id: i64,
    input: CreateComment,
) -> Result<Comment> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Comment content is required".to_string()));
    }

    ensure_article(storage, article_id).await?;

    if let Some(parent_id) = input.parent_id {
        let parent = storage
            .find_comment(parent_id)
            .await?
            .ok_or(AppError::NotFound("Parent comment"))?;

        if parent.article_id != article_id {
            return Err(Integrity::ParentArticleMismatch {
                parent_id,
                article_id,
            }
            .into());
        }
    }

    let comment = storage
        .insert_comment(NewComment {
            article_id,
            author_id,
            parent_id: input.parent_id,
            content: content.to_string(),
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(comment_id = comment.id, "comment created");
    Ok(comment)
}

/// Deletes a comment and all of its replies, deepest replies first.
///
/// Returns `false` when the comment does not exist. Rows are removed one by
/// one without a surrounding transaction; a failure part-way leaves the
/// replies removed so far deleted.
#[tracing::instrument(skip(storage))]
pub async fn delete_comment(storage: &dyn Storage, comment_id: i64) -> Result<bool> {
    if storage.find_comment(comment_id).await?.is_none() {
        return Ok(false);
    }

    let doomed = collect_subtree(storage, comment_id).await?;
    for id in &doomed {
        storage.remove_comment(*id).await?;
    }

    tracing::info!(removed = doomed.len(), "comment deleted");
    Ok(true)
}

/// Ids of `root` and every reply below it, each reply listed before the
/// comment it answers.
async fn collect_subtree(storage: &dyn Storage, root: i64) -> Result<Vec<i64>> {
    let mut seen = HashSet::from([root]);
    let mut order = Vec::new();
    let mut stack = vec![(root, storage.child_comment_ids(root).await?.into_iter())];

    while let Some((id, children)) = stack.last_mut() {
        match children.next() {
            Some(child) => {
                if !seen.insert(child) {
                    return Err(Integrity::CommentCycle(child).into());
                }
                let grandchildren = storage.child_comment_ids(child).await?.into_iter();
                stack.push((child, grandchildren));
            }
            None => {
                order.push(*id);
                stack.pop();
            }
        }
    }

    Ok(order)
}

async fn ensure_article(storage: &dyn Storage, article_id: i64) -> Result<()> {
    if storage.article_exists(article_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Article"))
    }
}
