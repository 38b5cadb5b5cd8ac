//! HTTP transport using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::transport::Transport;
use crate::{Result, SearchError};

/// A transport that issues plain HTTP requests via reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a new `HttpTransport` with default settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fearch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Creates an `HttpTransport` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_http_transport_new() {
        assert!(HttpTransport::new().is_ok());
    }

    #[test]
    fn test_http_transport_with_client() {
        let client = Client::builder().user_agent("test-agent").build().unwrap();
        let _transport = HttpTransport::with_client(client);
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = Url::parse(&format!("{}/search?q=rust", server.uri())).unwrap();
        let body = transport.get(&url).await.unwrap();
        assert_eq!(body, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_get_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = transport.get(&url).await.unwrap_err();
        assert!(matches!(err, SearchError::Status(503)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_get_connection_refused_is_http_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpTransport::new().unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = transport.get(&url).await.unwrap_err();
        assert!(matches!(err, SearchError::Http(_)));
    }
}
