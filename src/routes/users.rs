use axum::{
    Router,
    extract::{Json, Path, State},
    routing::get,
};

use crate::comments::project_author;
use crate::error::Result;
use crate::models::AuthorView;
use crate::state::AppState;

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/{user_id}/author", get(get_author))
}

/// The same author card that comment payloads embed.
async fn get_author(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<AuthorView>> {
    let author = project_author(state.storage.as_ref(), user_id).await?;
    Ok(Json(author))
}
