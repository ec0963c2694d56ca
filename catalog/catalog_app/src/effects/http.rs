use std::fmt::{Display, Formatter};
use std::future::Future;

use crux_core::capability::Operation;
use crux_core::command::RequestBuilder;
use crux_core::{Command, Request};
use thiserror::Error;

/// A single HTTP exchange with the Catalog API, executed by the shell.
///
/// `path` is relative to the shell's configured base url, e.g. `/books/123/borrow`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct HttpOperation {
    pub method: HttpMethod,
    pub path: String,
    /// Query parameters, in order, only non-empty values are ever added.
    pub query: Vec<(String, String)>,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<serde_json::Value>,
}

impl HttpOperation {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(HttpMethod::Post, path)
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
        }
    }
}

impl Operation for HttpOperation {
    type Output = HttpResult;
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
    Patch,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        };
        f.write_str(method)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub enum HttpResult {
    Ok { response: HttpResponse },
    Err { error: HttpError },
}

impl HttpResult {
    pub fn ok(status: u16, body: impl Into<String>) -> Self {
        HttpResult::Ok {
            response: HttpResponse {
                status,
                body: body.into(),
            },
        }
    }

    pub fn transport_error(message: impl Into<String>) -> Self {
        HttpResult::Err {
            error: HttpError::Transport {
                message: message.into(),
            },
        }
    }
}

/// The raw response, the core decides what the status and body mean.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, Error)]
#[serde(rename_all = "camelCase")]
pub enum HttpError {
    /// The request never produced a response, e.g. connection refused.
    #[error("{message}")]
    Transport { message: String },
}

pub fn request_builder<Effect, Event>(
    operation: HttpOperation,
) -> RequestBuilder<Effect, Event, impl Future<Output = HttpResult>>
where
    Effect: From<Request<HttpOperation>> + Send + 'static,
    Event: Send + 'static,
{
    Command::request_from_shell(operation)
}

pub fn request<Effect, Event, F>(operation: HttpOperation, make_event: F) -> Command<Effect, Event>
where
    Effect: From<Request<HttpOperation>> + Send + 'static,
    Event: Send + 'static,
    F: FnOnce(HttpResult) -> Event + Send + 'static,
{
    request_builder(operation).then_send(make_event)
}
