//! Body normalization for HTTP requests
//!
//! Decodes a request body according to its declared content type and
//! re-encodes it as canonical JSON, merging query parameters and decoded
//! form fields into the request's [`Context`].

use super::context::Context;
use super::form::decode_form;
use super::json::JsonBody;
use super::multipart::{decode_multipart, parse_boundary};
use crate::error::BodyError;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

pub const MIME_APPLICATION_JSON: &str = "application/json";
pub const MIME_APPLICATION_FORM: &str = "application/x-www-form-urlencoded";
pub const MIME_MULTIPART_FORM: &str = "multipart/form-data";
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// Body format selected from a Content-Type header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Form,
    Multipart,
    Text,
    Other,
}

impl ContentKind {
    /// Detect the body format from a Content-Type header
    ///
    /// Matching is by substring so `charset` and `boundary` parameters are
    /// tolerated. JSON wins over form, form over multipart, multipart over
    /// plain text.
    pub fn detect(content_type: &str) -> Self {
        if content_type.contains(MIME_APPLICATION_JSON) {
            Self::Json
        } else if content_type.contains(MIME_APPLICATION_FORM) {
            Self::Form
        } else if content_type.contains(MIME_MULTIPART_FORM) {
            Self::Multipart
        } else if content_type.contains(MIME_TEXT_PLAIN) {
            Self::Text
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Form => write!(f, "form"),
            Self::Multipart => write!(f, "multipart"),
            Self::Text => write!(f, "text"),
            Self::Other => write!(f, "passthrough"),
        }
    }
}

/// A decoded body before it is written out as bytes
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    /// Unrecognized content type; the bytes are not JSON
    Raw(Bytes),
    /// JSON object or array of objects
    Json(JsonBody),
    /// Query parameters merged with form or multipart fields
    Fields(Context),
    /// Plain text, encoded as a JSON string
    Text(String),
}

impl Payload {
    /// Encode the payload as canonical JSON bytes (raw bytes pass through)
    pub(crate) fn into_bytes(self) -> Result<Bytes, BodyError> {
        let encoded = match self {
            Self::Raw(bytes) => return Ok(bytes),
            Self::Json(body) => serde_json::to_vec(&body)?,
            Self::Fields(context) => serde_json::to_vec(&context)?,
            Self::Text(text) => serde_json::to_vec(&text)?,
        };
        Ok(Bytes::from(encoded))
    }
}

impl From<JsonBody> for Payload {
    fn from(body: JsonBody) -> Self {
        Self::Json(body)
    }
}

/// Normalize a request body into canonical JSON bytes
///
/// The query parameters seed a [`Context`] that is attached to `extensions`
/// before decoding starts. Form and multipart fields are merged into it,
/// overwriting query values with the same name, once the whole body has
/// decoded successfully.
///
/// Returns `Ok(None)` for an empty JSON or text body, and the original bytes
/// untouched for an unrecognized content type. On error the extensions hold
/// only the query-seeded context.
///
/// # Example
///
/// ```rust,ignore
/// let mut extensions = http::Extensions::new();
/// let query = HashMap::from([("page".to_string(), "2".to_string())]);
///
/// let bytes = process(
///     &mut extensions,
///     "application/x-www-form-urlencoded",
///     Some(Bytes::from_static(b"name=John")),
///     &query,
/// )
/// .await?;
///
/// assert_eq!(bytes.unwrap(), r#"{"name":"John","page":"2"}"#);
/// assert_eq!(Context::from_extensions(&extensions).get("name"), "John");
/// ```
pub async fn process(
    extensions: &mut http::Extensions,
    content_type: &str,
    body: Option<Bytes>,
    query: &HashMap<String, String>,
) -> Result<Option<Bytes>, BodyError> {
    let context = Context::from_query(query);
    context.clone().attach(extensions);

    let kind = ContentKind::detect(content_type);
    debug!(
        "Normalizing {} body ({} bytes)",
        kind,
        body.as_ref().map_or(0, Bytes::len)
    );

    let payload = match decode(kind, content_type, body, context).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return Ok(None),
        Err(e) => {
            warn!("Failed to normalize {} body: {}", kind, e);
            return Err(e);
        }
    };

    if let Payload::Fields(merged) = &payload {
        merged.clone().attach(extensions);
    }

    payload.into_bytes().map(Some).map_err(|e| {
        warn!("Failed to serialize {} body: {}", kind, e);
        e
    })
}

async fn decode(
    kind: ContentKind,
    content_type: &str,
    body: Option<Bytes>,
    mut context: Context,
) -> Result<Option<Payload>, BodyError> {
    let payload: Payload = match kind {
        ContentKind::Json => match body.filter(|b| !b.is_empty()) {
            Some(body) => JsonBody::parse(&body)?.into(),
            None => return Ok(None),
        },
        ContentKind::Form => {
            let body = body.ok_or(BodyError::EmptyFormBody)?;
            context.merge(decode_form(&body)?);
            Payload::Fields(context)
        }
        ContentKind::Multipart => {
            let body = body.ok_or(BodyError::EmptyMultipartBody)?;
            let boundary = parse_boundary(content_type)?;
            context.merge(decode_multipart(body, &boundary).await?);
            Payload::Fields(context)
        }
        ContentKind::Text => match body.filter(|b| !b.is_empty()) {
            Some(body) => Payload::Text(
                String::from_utf8(body.to_vec())
                    .map_err(|e| BodyError::InvalidText(e.to_string()))?,
            ),
            None => return Ok(None),
        },
        ContentKind::Other => match body {
            Some(body) => Payload::Raw(body),
            None => return Ok(None),
        },
    };
    Ok(Some(payload))
}

/// Collect a full body into memory, failing once it grows past `limit` bytes
pub async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                BodyError::TooLarge { limit }
            } else {
                BodyError::BodyRead(e.to_string())
            }
        })
}
