//! Thin HTTP client for the orders API.
//!
//! Every request goes through the registered [`RequestInterceptor`]s (bearer
//! token, ...) and gets W3C trace context before it is sent. Non-2xx
//! responses are turned into [`ApiError::Status`].

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::interceptors::RequestInterceptor;
use crm_core::observability::TracedRequest;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    timeout: Duration,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            timeout: config.timeout,
            interceptors: Vec::new(),
        }
    }

    /// Register an interceptor. Interceptors run in registration order.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .execute(Method::GET, url, self.request(Method::GET, url))
            .await?;

        response.json::<T>().await.map_err(|source| {
            tracing::error!(url = %url, error = %source, "Failed to decode orders API response");
            ApiError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), ApiError> {
        let request = self.request(Method::POST, url).json(body);
        self.execute(Method::POST, url, request).await.map(drop)
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), ApiError> {
        let request = self.request(Method::PUT, url).json(body);
        self.execute(Method::PUT, url, request).await.map(drop)
    }

    pub async fn delete(&self, url: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, url, self.request(Method::DELETE, url))
            .await
            .map(drop)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.client.request(method, url).timeout(self.timeout);

        self.interceptors
            .iter()
            .fold(request, |request, interceptor| interceptor.intercept(request))
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = TracedRequest::new(request).send().await.map_err(|source| {
            tracing::error!(method = %method, url = %url, error = %source, "Orders API request failed");
            ApiError::Transport {
                method: method.clone(),
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(method = %method, url = %url, status = %status, "Orders API response");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            method = %method,
            url = %url,
            status = %status,
            body = %body,
            "Orders API returned an error status"
        );

        Err(ApiError::Status {
            method,
            url: url.to_string(),
            status,
            body,
        })
    }
}
