use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use config::ConfigError;
use docstore::AppError;
use http::StatusCode;
use tokio::task::JoinError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Storage error: {0}")]
    Store(#[from] AppError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Join error: {0}")]
    JoinError(#[from] JoinError),

    #[error("Seed data rejected: {0}")]
    Seed(String),

    #[error("{0}")]
    Internal(String),
}

impl CatalogError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CatalogError::NotFound(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound(_)       => StatusCode::NOT_FOUND,
            CatalogError::UploadRejected(_) => StatusCode::BAD_REQUEST,
            CatalogError::Multipart(e)      => e.status(),
            _                               => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Marker left on error responses so the error-page middleware can render them as HTML.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorPage { message });
        response
    }
}
