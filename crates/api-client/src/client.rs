//! Shared HTTP client
//!
//! Every call is a single attempt with the configured timeout. Failures are
//! returned to the caller, which decides how to degrade.

use crate::config::{ClientConfig, USER_AGENT};
use crate::endpoints::{KakaoAddressSearch, NominatimReverseGeocoder};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, Span};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client for the geocoding services
#[derive(Clone)]
pub struct GeoClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl GeoClient {
    /// Create a client with default configuration
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Reverse geocoder backed by this client
    #[must_use]
    pub fn reverse_geocoder(&self) -> NominatimReverseGeocoder {
        NominatimReverseGeocoder::new(self.clone())
    }

    /// Keyword search backed by this client
    #[must_use]
    pub fn address_search(&self) -> KakaoAddressSearch {
        KakaoAddressSearch::new(self.clone())
    }

    /// GET `url` with query parameters and extra headers, decoding JSON
    #[instrument(skip(self, query, headers), fields(request_id = tracing::field::Empty))]
    pub async fn get_json<T, Q>(&self, url: &str, query: &Q, headers: HeaderMap) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let response = self
            .inner
            .get(url)
            .query(query)
            .headers(headers)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await?;
        let result = self.handle_response(response).await;

        debug!(
            request_id = %request_id,
            elapsed_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "Request finished"
        );
        result
    }

    /// Same as [`get_json`](Self::get_json), also returning the elapsed time
    pub async fn timed_get_json<T, Q>(
        &self,
        url: &str,
        query: &Q,
        headers: HeaderMap,
    ) -> ApiResult<(T, Duration)>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let start = Instant::now();
        let result = self.get_json(url, query, headers).await?;
        Ok((result, start.elapsed()))
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(ApiError::Request)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}
