//! `multipart/form-data` decoding

use super::context::{accumulate, Fields};
use crate::error::BodyError;
use bytes::Bytes;
use futures_util::stream;
use tracing::{debug, warn};

/// Extract the boundary from a multipart content type
///
/// Fails before any part is read when the media type cannot be parsed or
/// carries no `boundary` parameter.
pub fn parse_boundary(content_type: &str) -> Result<String, BodyError> {
    multer::parse_boundary(content_type).map_err(|e| match e {
        multer::Error::NoBoundary => BodyError::MissingBoundary,
        other => BodyError::ContentType(other.to_string()),
    })
}

/// Decode the named text fields of a multipart body
///
/// Parts are read strictly in order. Nameless parts and file parts are
/// skipped; a named part with any `filename`, even an empty one, is a file
/// part and is dropped. A field sent more than once becomes a list
/// in part order.
pub async fn decode_multipart(body: Bytes, boundary: &str) -> Result<Fields, BodyError> {
    let body_stream = stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(body_stream, boundary);

    let mut fields = Fields::new();
    let mut skipped = 0usize;

    // Dropping a field before the next call to next_field drains its body.
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Multipart parsing error: {}", e);
        BodyError::MultipartPart(e.to_string())
    })? {
        let name = match (field.name(), field.file_name()) {
            (Some(name), None) if !name.is_empty() => name.to_string(),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let value = field.text().await.map_err(|e| {
            warn!("Failed to read multipart field '{}': {}", name, e);
            BodyError::MultipartValue(e.to_string())
        })?;

        accumulate(&mut fields, name, value);
    }

    debug!(
        "Multipart decoded: {} fields, {} parts skipped",
        fields.len(),
        skipped
    );

    Ok(fields)
}
