mod body;
mod context;
mod form;
mod json;
mod multipart;
mod request;
mod response;

pub use body::{
    collect_body, process, ContentKind, MIME_APPLICATION_FORM, MIME_APPLICATION_JSON,
    MIME_MULTIPART_FORM, MIME_TEXT_PLAIN,
};
pub use context::{Context, FieldValue, Fields};
pub use form::decode_form;
pub use json::JsonBody;
pub use multipart::{decode_multipart, parse_boundary};
pub use request::Request;
pub use response::HttpResponse;
