use super::body::{collect_body, process};
use crate::config::BodyConfig;
use crate::error::BodyError;
use bytes::Bytes;
use hyper::body::{Body, Incoming};
use std::collections::HashMap;

/// HTTP Request wrapper that normalizes its body before handlers see it
pub struct Request<B = Incoming> {
    inner: hyper::Request<B>,
}

impl<B> Request<B> {
    pub fn new(inner: hyper::Request<B>) -> Self {
        Self { inner }
    }

    /// Get the inner hyper request
    pub fn inner(&self) -> &hyper::Request<B> {
        &self.inner
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the query string parameters
    ///
    /// A name repeated in the query string keeps its first value.
    pub fn query_params(&self) -> HashMap<String, String> {
        let pairs: Vec<(String, String)> = self
            .inner
            .uri()
            .query()
            .and_then(|query| serde_urlencoded::from_str(query).ok())
            .unwrap_or_default();

        let mut params = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            params.entry(key).or_insert(value);
        }
        params
    }
}

impl<B> Request<B>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    /// Consume the request, collect its body and normalize it
    ///
    /// The merged [`Context`](super::Context) is attached to the returned
    /// parts' extensions. The body is `None` for an empty JSON or text body.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// pub async fn store(req: Request) -> Result<HttpResponse, BodyError> {
    ///     let (parts, body) = req.normalize(&BodyConfig::from_env()).await?;
    ///     let ctx = Context::from_extensions(&parts.extensions);
    ///     // ...
    /// }
    /// ```
    pub async fn normalize(
        self,
        config: &BodyConfig,
    ) -> Result<(http::request::Parts, Option<Bytes>), BodyError> {
        let query = self.query_params();
        let content_type = self.content_type().unwrap_or_default().to_string();

        let (mut parts, body) = self.inner.into_parts();
        let bytes = collect_body(body, config.max_body_size).await?;

        let normalized = process(&mut parts.extensions, &content_type, Some(bytes), &query).await?;
        Ok((parts, normalized))
    }
}
