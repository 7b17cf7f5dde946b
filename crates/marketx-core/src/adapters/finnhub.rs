use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;

use crate::data_source::{FetchError, ProviderRequest};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const TOKEN_HEADER: &str = "X-Finnhub-Token";

/// Configured handle to the Finnhub REST API. All data access funnels
/// through [`FinnhubClient::get`].
#[derive(Clone)]
pub struct FinnhubClient {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl FinnhubClient {
    /// Client backed by reqwest.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), api_key)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::Header {
                name: String::from(TOKEN_HEADER),
                value: api_key.into(),
            },
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn url_for(&self, request: &ProviderRequest) -> String {
        format!(
            "{}/{}?{}",
            self.base_url,
            request.endpoint.path(),
            request.query_string()
        )
    }

    /// Issues one GET and returns the decoded JSON reply.
    ///
    /// An empty body decodes as `null`. A success status whose body is an
    /// `{"error": ...}` object is reported as an error.
    pub async fn get(&self, request: ProviderRequest) -> Result<Value, FetchError> {
        let endpoint = request.endpoint;
        let http_request = HttpRequest::get(self.url_for(&request))
            .with_header("accept", "application/json")
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(http_request)
            .await
            .map_err(|e| FetchError::unavailable(format!("finnhub transport error: {}", e.message())))?;

        if !response.is_success() {
            return Err(FetchError::from_status(endpoint, response.status));
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::decode(endpoint, e))?;

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(FetchError::unavailable(format!("finnhub {endpoint}: {message}")));
        }

        Ok(value)
    }
}

impl Debug for FinnhubClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubClient")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{Endpoint, FetchErrorKind};
    use crate::http_client::StubHttpClient;

    fn client(stub: Arc<StubHttpClient>) -> FinnhubClient {
        FinnhubClient::with_http_client(stub, "test-key").with_base_url("https://finnhub.test/api/v1/")
    }

    #[tokio::test]
    async fn sends_token_header_and_encoded_query() {
        let stub = Arc::new(StubHttpClient::new().with_json("stock/metric", r#"{"metric":{}}"#));
        let request = ProviderRequest::new(Endpoint::BasicFinancials)
            .param("symbol", "BRK.B")
            .param("metric", "all");

        client(stub.clone()).get(request).await.expect("reply");

        let recorded = stub.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].url,
            "https://finnhub.test/api/v1/stock/metric?symbol=BRK.B&metric=all"
        );
        assert_eq!(
            recorded[0].headers.get("x-finnhub-token").map(String::as_str),
            Some("test-key")
        );
        assert!(!recorded[0].url.contains("test-key"));
    }

    #[tokio::test]
    async fn forbidden_status_is_unauthorized() {
        let stub = Arc::new(StubHttpClient::new().with_status(
            "stock/price-target",
            403,
            r#"{"error":"You don't have access to this resource."}"#,
        ));

        let error = client(stub)
            .get(ProviderRequest::new(Endpoint::PriceTarget).param("symbol", "AAPL"))
            .await
            .expect_err("forbidden");
        assert_eq!(error.kind(), FetchErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn error_object_with_success_status_is_an_error() {
        let stub = Arc::new(
            StubHttpClient::new().with_json("etf/profile", r#"{"error":"Invalid API key."}"#),
        );

        let error = client(stub)
            .get(ProviderRequest::new(Endpoint::EtfProfile).param("symbol", "SPY"))
            .await
            .expect_err("error body");
        assert_eq!(error.kind(), FetchErrorKind::Unavailable);
        assert!(error.message().contains("Invalid API key."));
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let stub = Arc::new(StubHttpClient::new().with_failure("stock/split", "connection reset"));

        let error = client(stub)
            .get(ProviderRequest::new(Endpoint::StockSplits).param("symbol", "AAPL"))
            .await
            .expect_err("transport");
        assert_eq!(error.kind(), FetchErrorKind::Unavailable);
        assert!(error.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let stub = Arc::new(StubHttpClient::new().with_json("stock/earnings", "<html>"));

        let error = client(stub)
            .get(ProviderRequest::new(Endpoint::CompanyEarnings).param("symbol", "AAPL"))
            .await
            .expect_err("decode");
        assert_eq!(error.kind(), FetchErrorKind::Decode);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = FinnhubClient::with_http_client(Arc::new(StubHttpClient::new()), "secret-key");
        assert!(!format!("{client:?}").contains("secret-key"));
    }
}
