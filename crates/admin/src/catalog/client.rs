//! Product API client.
//!
//! Plain JSON-over-HTTP client for the product backend. An optional bearer
//! token from the configuration is attached to every request.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;

use kestrel_core::{Product, ProductId};

use super::api::{
    CatalogApiError, DataEnvelope, ErrorBody, NewProduct, PRODUCT_FETCH_LIMIT, ProductApi,
    ProductPage, ProductUpdate,
};
use crate::config::CatalogApiConfig;

/// Product API client.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl CatalogClient {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| CatalogApiError::Decode(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// URL of a single product. The ID is one opaque path segment.
    fn product_url(&self, id: &ProductId) -> String {
        self.url(&format!("/products/{}", urlencoding::encode(id.as_str())))
    }

    /// Unwrap a `{ data: T }` success body or turn the response into an error.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogApiError> {
        let status = response.status();

        if status.is_success() {
            let envelope: DataEnvelope<T> = response
                .json()
                .await
                .map_err(|e| CatalogApiError::Decode(format!("Failed to parse response: {e}")))?;
            return Ok(envelope.data);
        }

        Err(Self::parse_error(response).await)
    }

    /// Read a `{ message }` error body, if the backend sent one.
    async fn parse_error(response: reqwest::Response) -> CatalogApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message);

        CatalogApiError::Api { status, message }
    }
}

impl ProductApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self, search: &str) -> Result<Vec<Product>, CatalogApiError> {
        let mut query: Vec<(&str, String)> = Vec::with_capacity(2);
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        query.push(("limit", PRODUCT_FETCH_LIMIT.to_string()));

        let response = self
            .inner
            .client
            .get(self.url("/products"))
            .query(&query)
            .send()
            .await?;

        let page: ProductPage = Self::handle_response(response).await?;
        tracing::debug!(count = page.products.len(), "Fetched products");
        Ok(page.products)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_product(&self, input: &NewProduct) -> Result<Product, CatalogApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/products"))
            .json(input)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self, input), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductUpdate,
    ) -> Result<Product, CatalogApiError> {
        let response = self
            .inner
            .client
            .put(self.product_url(id))
            .json(input)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<(), CatalogApiError> {
        let response = self
            .inner
            .client
            .delete(self.product_url(id))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn config(base: &str) -> CatalogApiConfig {
        CatalogApiConfig {
            base_url: base.parse().unwrap(),
            token: Some(SecretString::from("tok_9f8Qz1LmX3")),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CatalogClient::new(&config("http://127.0.0.1:9000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000/api");
        assert_eq!(client.url("/products"), "http://127.0.0.1:9000/api/products");
    }

    #[test]
    fn test_product_url_encodes_reserved_characters() {
        let client = CatalogClient::new(&config("http://127.0.0.1:9000/api")).unwrap();
        assert_eq!(
            client.product_url(&ProductId::new("p-1?cascade=all")),
            "http://127.0.0.1:9000/api/products/p-1%3Fcascade%3Dall"
        );
        assert_eq!(
            client.product_url(&ProductId::new("sku/42#x")),
            "http://127.0.0.1:9000/api/products/sku%2F42%23x"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = CatalogClient::new(&config("http://127.0.0.1:9000")).unwrap();
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("127.0.0.1:9000"));
        assert!(!debug_output.contains("tok_9f8Qz1LmX3"));
    }
}
