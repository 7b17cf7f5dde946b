use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Server-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WebError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Template(_) => 3,
            Self::Io(_) => 10,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "page render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Market Explorer</h1><p>The page could not be rendered.</p>"),
        )
            .into_response()
    }
}
