pub mod config;
pub mod error;
pub mod http;

pub use config::BodyConfig;
pub use error::{BodyError, ErrorKind};
pub use http::{process, Context, FieldValue, Request};
