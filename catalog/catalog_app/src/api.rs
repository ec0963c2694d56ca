//! Mapping between catalog actions and the Catalog API's HTTP endpoints.

use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::trace;
use urlencoding::encode;

use crate::book::NewBook;
use crate::effects::http::{HttpOperation, HttpResult};
use crate::forms::SearchQuery;

/// Used when an error response carries no JSON body at all.
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRequest {
    ListBooks,
    GetStats,
    AddBook(NewBook),
    AddBookByIsbn { isbn: String },
    DeleteBook { isbn: String },
    BorrowBook { isbn: String },
    ReturnBook { isbn: String },
    SearchBooks(SearchQuery),
}

impl CatalogRequest {
    /// The ISBN is a single path segment, so it is percent-encoded.
    pub fn into_operation(self) -> HttpOperation {
        match self {
            CatalogRequest::ListBooks => HttpOperation::get("/books"),
            CatalogRequest::GetStats => HttpOperation::get("/stats"),
            CatalogRequest::AddBook(new_book) => HttpOperation::post(
                "/books",
                json!({
                    "title": new_book.title,
                    "author": new_book.author,
                    "isbn": new_book.isbn,
                    "publication_year": new_book.publication_year,
                }),
            ),
            CatalogRequest::AddBookByIsbn {
                isbn,
            } => HttpOperation::post("/books/isbn", json!({ "isbn": isbn })),
            CatalogRequest::DeleteBook {
                isbn,
            } => HttpOperation::delete(format!("/books/{}", encode(&isbn))),
            CatalogRequest::BorrowBook {
                isbn,
            } => HttpOperation::patch(format!("/books/{}/borrow", encode(&isbn))),
            CatalogRequest::ReturnBook {
                isbn,
            } => HttpOperation::patch(format!("/books/{}/return", encode(&isbn))),
            CatalogRequest::SearchBooks(query) => HttpOperation::get("/books/search").with_query(query.into_pairs()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    /// A non-2xx response, `detail` is already human-readable.
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("invalid response from server, cause: {0}")]
    Decode(String),
}

/// Decode a successful response body, or turn the failure into an [`ApiError`].
pub fn decode<T: DeserializeOwned>(result: HttpResult) -> Result<T, ApiError> {
    let body = success_body(result)?;
    serde_json::from_str::<T>(&body).map_err(|cause| ApiError::Decode(cause.to_string()))
}

/// Like [`decode`], but an empty or `null` body is a valid "nothing found".
pub fn decode_optional<T: DeserializeOwned>(result: HttpResult) -> Result<Option<T>, ApiError> {
    let body = success_body(result)?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<T>>(&body).map_err(|cause| ApiError::Decode(cause.to_string()))
}

fn success_body(result: HttpResult) -> Result<String, ApiError> {
    match result {
        HttpResult::Err {
            error,
        } => Err(ApiError::Transport(error.to_string())),
        HttpResult::Ok {
            response,
        } if response.is_success() => Ok(response.body),
        HttpResult::Ok {
            response,
        } => {
            trace!("error response. status: {}, body: {:?}", response.status, response.body);
            Err(ApiError::Status {
                status: response.status,
                detail: error_detail(response.status, &response.body),
            })
        }
    }
}

/// Extract the `detail` of an error body.
///
/// * body is not JSON -> [`UNKNOWN_ERROR_DETAIL`]
/// * `detail` missing, null or empty -> `HTTP <status>`
/// * `detail` is not a string, e.g. a list of validation errors -> its JSON text
pub fn error_detail(status: u16, body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return UNKNOWN_ERROR_DETAIL.to_string();
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Null) | None => format!("HTTP {}", status),
        Some(serde_json::Value::String(_)) => format!("HTTP {}", status),
        Some(other) => other.to_string(),
    }
}
