use catalog_app::effects::http::{HttpMethod, HttpOperation, HttpResult};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, trace, warn};

/// Executes [`HttpOperation`]s against the Catalog API.
///
/// No client-side timeout is applied, ISBN lookups can legitimately take several seconds.
#[derive(Clone)]
pub(crate) struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("catalog_cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Any response, including 4xx/5xx, is `Ok`, only failing to get a response at all is an error.
    pub async fn execute(&self, operation: HttpOperation) -> HttpResult {
        let url = self.url(&operation.path);
        debug!("request. method: {}, url: {}, query: {:?}", operation.method, url, operation.query);

        let mut builder = self
            .client
            .request(method(operation.method), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !operation.query.is_empty() {
            builder = builder.query(&operation.query);
        }
        if let Some(body) = &operation.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("request failed. url: {}, cause: {}", url, e);
                return HttpResult::transport_error(e.to_string());
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                trace!("response. status: {}, body: {}", status, body);
                HttpResult::ok(status, body)
            }
            Err(e) => HttpResult::transport_error(e.to_string()),
        }
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_appended_to_base_url() {
        let client = CatalogClient::new("http://localhost:8000/api".to_string()).unwrap();

        assert_eq!(client.url("/books/123/borrow"), "http://localhost:8000/api/books/123/borrow");
    }
}
