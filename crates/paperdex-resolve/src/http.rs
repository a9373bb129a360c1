use reqwest::StatusCode;
use reqwest::header::ACCEPT;

use crate::error::{ResolveError, Result};

/// Thin HTTP client for the metadata services.
///
/// One request per call: no retries, no backoff, no rate limiting and no
/// response caching. A 404 maps to [`ResolveError::NotFound`] so callers can
/// distinguish "identifier not resolvable" from an unreachable service.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Self {
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .expect("failed to build reqwest client");
        Self { inner }
    }

    pub async fn get(&self, url: &str) -> Result<String> {
        self.get_with_accept(url, None).await
    }

    pub async fn get_with_accept(&self, url: &str, accept: Option<&str>) -> Result<String> {
        let mut request = self.inner.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ResolveError::ServiceUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// User-Agent string for outgoing requests, with an optional contact address.
pub fn user_agent(polite_email: Option<&str>) -> String {
    match polite_email {
        Some(email) => format!("paperdex/0.1 (mailto:{email})"),
        None => "paperdex/0.1".to_string(),
    }
}
