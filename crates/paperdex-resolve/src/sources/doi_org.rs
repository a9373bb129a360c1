use crate::error::Result;
use crate::http::{HttpClient, user_agent};
use crate::identifiers::doi::Doi;

const BASE_URL: &str = "http://dx.doi.org";

/// The DOI resolver endpoint, queried with BibTeX content negotiation.
pub struct DoiOrgSource {
    client: HttpClient,
    base_url: String,
}

impl DoiOrgSource {
    pub fn new(polite_email: Option<&str>) -> Self {
        Self::with_base_url(BASE_URL, polite_email)
    }

    pub fn with_base_url(base_url: &str, polite_email: Option<&str>) -> Self {
        Self {
            client: HttpClient::new(&user_agent(polite_email)),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// One GET to `<base>/<doi>` with `Accept: application/x-bibtex`.
    ///
    /// Returns the raw BibTeX body. A 404 means the identifier is not
    /// resolvable; any other failure is the service being unavailable.
    /// Neither is retried.
    pub async fn fetch_bibtex(&self, doi: &Doi) -> Result<String> {
        let url = format!("{}/{}", self.base_url, doi.value);
        self.client
            .get_with_accept(&url, Some("application/x-bibtex"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    #[tokio::test]
    async fn fetches_bibtex_body() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"@article{Mnih_2015, title={Human-level control}, year={2015}}"#;
        let _m = server
            .mock("GET", "/10.1038/nature14539")
            .match_header("accept", "application/x-bibtex")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let source = DoiOrgSource::with_base_url(&server.url(), None);
        let doi = Doi::parse("10.1038/nature14539").unwrap();
        let raw = source.fetch_bibtex(&doi).await.unwrap();
        assert_eq!(raw, body);
    }

    #[tokio::test]
    async fn unresolvable_doi_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/10.9999/does-not-exist")
            .with_status(404)
            .create_async()
            .await;

        let source = DoiOrgSource::with_base_url(&server.url(), None);
        let doi = Doi::parse("10.9999/does-not-exist").unwrap();
        let err = source.fetch_bibtex(&doi).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[tokio::test]
    async fn server_error_is_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/10.1000/xyz123")
            .with_status(500)
            .create_async()
            .await;

        let source = DoiOrgSource::with_base_url(&server.url(), None);
        let doi = Doi::parse("10.1000/xyz123").unwrap();
        let err = source.fetch_bibtex(&doi).await.unwrap_err();
        assert!(matches!(err, ResolveError::ServiceUnavailable { .. }));
    }
}
