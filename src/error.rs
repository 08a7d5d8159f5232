use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::metadata::MetadataError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("movie {0} is not in the catalog")]
    NotFound(i64),

    #[error("no page at {0}")]
    NoRoute(String),

    #[error("\"{0}\" is already in the catalog")]
    Duplicate(String),

    #[error("movie lookup failed: {0}")]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NoRoute(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::Metadata(_) => StatusCode::BAD_GATEWAY,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = crate::templates::error_page(status, &self.to_string());
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
