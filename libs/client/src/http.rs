//! HTTP client wrapper
//!
//! Every request goes through [`HttpClient`], which resolves paths against
//! the configured base URL, attaches `Authorization: Bearer <token>` when a
//! token is stored, and turns non-success responses into [`ClientError`]s
//! carrying the server's message.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url, multipart};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token_store::TokenStore;

/// Thin wrapper around `reqwest::Client`
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute URL built from path segments, each one percent-encoded
    pub fn segments_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token if one is stored
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let builder = self.inner.request(method, self.url(path));
        Ok(match self.tokens.get()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.execute(builder).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request and return the raw body
    pub async fn send_bytes(&self, builder: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = self.execute(builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::PUT, path)?.json(body))
            .await
    }

    /// PUT with query parameters and no body
    pub async fn put_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::PUT, path)?.query(query))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(self.request(Method::DELETE, path)?).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub async fn post_form<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        form: &B,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path)?.form(form))
            .await
    }

    /// POST a multipart body
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> ClientResult<T> {
        self.send_json(self.request(Method::POST, path)?.multipart(form))
            .await
    }

    async fn execute(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().path().to_string();
        debug!("{} {}", method, url);

        let response = self.inner.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = common::error_message(&body).unwrap_or_default();
        warn!("{} {} failed with {}: {}", method, url, status, message);

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            status => ClientError::Api { status, message },
        })
    }
}
