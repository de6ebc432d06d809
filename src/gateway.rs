use crate::model::{Author, AuthorUpdate, NewAuthor};
use async_trait::async_trait;
use thiserror::Error;

/// Classified failure from the backend. Every variant carries the one
/// human-readable message the interface is allowed to show.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    ValidationFailed { message: String, status: u16 },
    #[error("{message}")]
    ServerError {
        message: String,
        status: Option<u16>,
    },
    #[error("{message}")]
    Unreachable { message: String },
}

impl GatewayError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::ValidationFailed { message, .. }
            | Self::ServerError { message, .. }
            | Self::Unreachable { message } => message,
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::ValidationFailed { status, .. } => Some(*status),
            Self::ServerError { status, .. } => *status,
            Self::Unreachable { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait AuthorGateway: Send + Sync + 'static {
    async fn find_all_authors(&self) -> Result<Vec<Author>, GatewayError>;

    async fn find_author(&self, id: i64) -> Result<Author, GatewayError>;

    async fn create_author(&self, draft: &NewAuthor) -> Result<Author, GatewayError>;

    async fn update_author(
        &self,
        id: i64,
        update: &AuthorUpdate,
    ) -> Result<Author, GatewayError>;

    async fn delete_author(&self, id: i64) -> Result<(), GatewayError>;
}
