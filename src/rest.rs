//! reqwest-backed implementation of [`AuthorGateway`].
//!
//! All backend failure shapes are normalized here: the body is probed for
//! the known error envelopes in priority order, and the HTTP status decides
//! the error kind. Nothing at this layer retries.

use crate::gateway::{AuthorGateway, GatewayError};
use crate::model::{Author, AuthorUpdate, NewAuthor};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

const LIST_FALLBACK: &str = "No se pudieron obtener los autores";
const GET_FALLBACK: &str = "Error al obtener el autor";
const CREATE_FALLBACK: &str = "No se pudo crear el autor";
const UPDATE_FALLBACK: &str = "No se pudo actualizar el autor";
const DELETE_FALLBACK: &str = "No se pudo eliminar el autor";

const NOT_FOUND_MESSAGE: &str = "Autor no encontrado";

#[derive(Debug, Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<(StatusCode, String), GatewayError> {
        let response = request.send().await.map_err(|err| {
            error!("request failed before a response arrived: {err}");
            GatewayError::Unreachable {
                message: format!("{fallback}: {err}"),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            error!("failed to read response body: {err}");
            GatewayError::ServerError {
                message: generic_message(fallback, status),
                status: Some(status.as_u16()),
            }
        })?;

        Ok((status, body))
    }
}

#[async_trait]
impl AuthorGateway for RestGateway {
    async fn find_all_authors(&self) -> Result<Vec<Author>, GatewayError> {
        let url = self.url("/api/authors");
        debug!(%url, "fetching author list");

        let (status, body) = self.send(self.http.get(&url), LIST_FALLBACK).await?;
        if !status.is_success() {
            return Err(failure(status, &body, LIST_FALLBACK));
        }

        decode(&body, LIST_FALLBACK)
    }

    async fn find_author(&self, id: i64) -> Result<Author, GatewayError> {
        let url = self.url(&format!("/api/authors/{id}"));
        debug!(%url, "fetching author");

        let (status, body) = self.send(self.http.get(&url), GET_FALLBACK).await?;
        if !status.is_success() {
            return Err(failure(status, &body, GET_FALLBACK));
        }

        decode(&body, GET_FALLBACK)
    }

    async fn create_author(&self, draft: &NewAuthor) -> Result<Author, GatewayError> {
        let url = self.url("/api/authors");
        debug!(%url, name = %draft.name(), "creating author");

        let request = self.http.post(&url).json(draft);
        let (status, body) = self.send(request, CREATE_FALLBACK).await?;
        if !status.is_success() {
            return Err(failure(status, &body, CREATE_FALLBACK));
        }

        decode(&body, CREATE_FALLBACK)
    }

    async fn update_author(
        &self,
        id: i64,
        update: &AuthorUpdate,
    ) -> Result<Author, GatewayError> {
        let url = self.url(&format!("/api/authors/{id}"));
        debug!(%url, "updating author");

        let request = self.http.put(&url).json(update);
        let (status, body) = self.send(request, UPDATE_FALLBACK).await?;
        if !status.is_success() {
            return Err(failure(status, &body, UPDATE_FALLBACK));
        }

        decode(&body, UPDATE_FALLBACK)
    }

    async fn delete_author(&self, id: i64) -> Result<(), GatewayError> {
        let url = self.url(&format!("/api/authors/{id}"));
        debug!(%url, "deleting author");

        let (status, body) = self.send(self.http.delete(&url), DELETE_FALLBACK).await?;
        if !status.is_success() {
            return Err(failure(status, &body, DELETE_FALLBACK));
        }

        Ok(())
    }
}

/// Known backend error envelopes, tried in priority order: the structured
/// API error, then a top-level `message`, then a top-level `error`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Nested { apierror: ApiErrorBody },
    Message { message: String },
    Plain { error: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ErrorEnvelope {
    fn into_message(self) -> String {
        match self {
            Self::Nested { apierror } => apierror.message,
            Self::Message { message } => message,
            Self::Plain { error } => error,
        }
    }
}

fn generic_message(fallback: &str, status: StatusCode) -> String {
    format!("{fallback} (Error {})", status.as_u16())
}

/// Classify a non-2xx response. 404 always maps to `NotFound`; other 4xx
/// with a recognizable body are validation failures; everything else,
/// including bodies that are not structured data, is a server failure.
fn failure(status: StatusCode, body: &str, fallback: &str) -> GatewayError {
    let extracted = serde_json::from_str::<ErrorEnvelope>(body)
        .map(ErrorEnvelope::into_message)
        .ok();

    if status == StatusCode::NOT_FOUND {
        return GatewayError::NotFound {
            message: extracted.unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
        };
    }

    match extracted {
        Some(message) if status.is_client_error() => GatewayError::ValidationFailed {
            message,
            status: status.as_u16(),
        },
        Some(message) => GatewayError::ServerError {
            message,
            status: Some(status.as_u16()),
        },
        None => GatewayError::ServerError {
            message: generic_message(fallback, status),
            status: Some(status.as_u16()),
        },
    }
}

fn decode<T: DeserializeOwned>(body: &str, fallback: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|err| {
        error!("failed to decode backend response: {err}");
        GatewayError::ServerError {
            message: fallback.to_string(),
            status: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_prefers_nested_api_error() {
        let err = failure(
            StatusCode::PRECONDITION_FAILED,
            r#"{"apierror": {"message": "M"}, "error": "E"}"#,
            DELETE_FALLBACK,
        );
        assert_eq!(err.message(), "M");
    }

    #[test]
    fn extraction_falls_back_to_top_level_message() {
        let err = failure(
            StatusCode::PRECONDITION_FAILED,
            r#"{"message": "tiene libros asociados"}"#,
            DELETE_FALLBACK,
        );
        assert_eq!(err.message(), "tiene libros asociados");
    }

    #[test]
    fn extraction_falls_back_to_top_level_error() {
        let err = failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "db locked"}"#,
            DELETE_FALLBACK,
        );
        assert_eq!(err.message(), "db locked");
    }

    #[test]
    fn unparseable_body_yields_generic_message_with_status() {
        let err = failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>boom</html>",
            DELETE_FALLBACK,
        );
        assert_eq!(err.message(), "No se pudo eliminar el autor (Error 500)");
    }

    #[test]
    fn unrecognized_json_yields_generic_message_with_status() {
        let err = failure(StatusCode::BAD_GATEWAY, r#"{"detail": 42}"#, UPDATE_FALLBACK);
        assert_eq!(err.message(), "No se pudo actualizar el autor (Error 502)");
    }

    #[test]
    fn not_found_classification_wins_over_generic_paths() {
        let err = failure(StatusCode::NOT_FOUND, "not json", DELETE_FALLBACK);
        assert!(err.is_not_found());
        assert_eq!(err.message(), "Autor no encontrado");

        let err = failure(
            StatusCode::NOT_FOUND,
            r#"{"error": "Autor no encontrado"}"#,
            GET_FALLBACK,
        );
        assert!(err.is_not_found());
        assert_eq!(err.message(), "Autor no encontrado");
    }

    #[test]
    fn client_errors_with_recognized_body_are_validation_failures() {
        let err = failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"apierror": {"message": "birthDate must be in the past"}}"#,
            CREATE_FALLBACK,
        );
        assert!(matches!(
            err,
            GatewayError::ValidationFailed { status: 422, .. }
        ));
        assert_eq!(err.message(), "birthDate must be in the past");
    }

    #[test]
    fn server_errors_keep_their_status() {
        let err = failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "db locked"}"#,
            DELETE_FALLBACK,
        );
        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, GatewayError::ServerError { .. }));
    }
}
