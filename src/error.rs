use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Structural problems in the comment graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Integrity {
    #[error("parent comment {parent_id} does not belong to article {article_id}")]
    ParentArticleMismatch { parent_id: i64, article_id: i64 },

    #[error("comment {0} is part of a reply cycle")]
    CommentCycle(i64),

    #[error("comment {0} appears more than once in the thread")]
    DuplicateComment(i64),

    #[error("reply {comment_id} answers comment {parent_id}, which is not part of the thread")]
    OrphanedReply { comment_id: i64, parent_id: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    IntegrityViolation(#[from] Integrity),

    #[error("author {author_id} of comment {comment_id} does not exist")]
    MissingAuthor { comment_id: i64, author_id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IntegrityViolation(Integrity::ParentArticleMismatch { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::IntegrityViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingAuthor { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            tracing::error!(err = ?self, "internal server error");
            match self {
                Self::Database(_) => "Internal server error, see logs for details".to_string(),
                other => other.to_string(),
            }
        } else {
            tracing::info!("returning error to client: {}", self);
            self.to_string()
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
