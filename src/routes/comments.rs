use axum::{
    Router,
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
};

use crate::comments;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentWithAuthor, CreateComment};
use crate::routes::auth::extract_current_user;
use crate::state::AppState;

pub fn comments_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{article_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/{article_id}/comments/{comment_id}", delete(delete_comment))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<CommentWithAuthor>>> {
    let thread = comments::list_thread(state.storage.as_ref(), article_id).await?;
    Ok(Json(thread))
}

async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(article_id): Path<i64>,
    Json(input): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    let current_user = extract_current_user(&state, &headers).await?;

    let comment =
        comments::create_comment(state.storage.as_ref(), current_user.id, article_id, input)
            .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((article_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>> {
    let current_user = extract_current_user(&state, &headers).await?;
    let storage = state.storage.as_ref();

    let comment = comments::find_comment(storage, comment_id, Some(article_id))
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    if comment.author_id != current_user.id {
        return Err(AppError::Forbidden("Not authorized to delete this comment"));
    }

    if !comments::delete_comment(storage, comment.id).await? {
        return Err(AppError::NotFound("Comment"));
    }

    Ok(Json(serde_json::json!({
        "message": "Comment deleted successfully"
    })))
}
