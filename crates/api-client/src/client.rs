//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{IpLookupApi, NominatimApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// HTTP client shared by the geocoding endpoints
///
/// Every request is a single attempt: a failure goes straight back to the
/// caller, which moves on to its next fallback.
#[derive(Clone, Debug)]
pub struct GeoClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl GeoClient {
    /// Create a new client with default configuration plus environment overrides
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ApiError::config(format!("invalid user_agent: {e}")))?;
        default_headers.insert(USER_AGENT, agent);

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

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access Nominatim reverse geocoding and place search
    #[must_use]
    pub fn nominatim(&self) -> NominatimApi {
        NominatimApi::new(self.clone())
    }

    /// Access IP geolocation
    #[must_use]
    pub fn ip_lookup(&self) -> IpLookupApi {
        IpLookupApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP
    // -------------------------------------------------------------------------

    /// Perform a GET request to an absolute URL with query parameters
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get_json<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let start = Instant::now();
        let result = self
            .inner
            .get(url)
            .query(query)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(ApiError::Timeout(self.config.timeout)),
            Err(e) => return Err(ApiError::Request(e)),
        };

        let outcome = self.handle_response(response).await;
        debug!(
            request_id = %request_id,
            elapsed_ms = start.elapsed().as_millis(),
            ok = outcome.is_ok(),
            "Request finished"
        );
        outcome
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(ApiError::Json)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}
