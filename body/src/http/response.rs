use crate::error::BodyError;
use bytes::Bytes;
use http_body_util::Full;

/// Minimal JSON error response for body pipeline failures
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Set the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Convert to hyper response
    ///
    /// Falls back to a bare 500 if the status code is out of range.
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|_| {
                let mut response = hyper::Response::new(Full::new(Bytes::new()));
                *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            })
    }
}

impl From<BodyError> for HttpResponse {
    fn from(err: BodyError) -> HttpResponse {
        HttpResponse::json(serde_json::json!({ "error": err.to_string() })).status(err.status_code())
    }
}

impl BodyError {
    /// Turn this error into a client-facing JSON response
    pub fn into_response(self) -> hyper::Response<Full<Bytes>> {
        HttpResponse::from(self).into_hyper()
    }
}
