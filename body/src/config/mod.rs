//! Configuration for body collection
//!
//! Values come from environment variables with typed defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use kit_body::BodyConfig;
//!
//! let config = BodyConfig::builder().max_body_size(1024 * 1024).build();
//! println!("Body limit: {} bytes", config.max_body_size);
//! ```

mod body;
pub mod env;

pub use body::{BodyConfig, BodyConfigBuilder, DEFAULT_MAX_BODY_SIZE};
pub use env::{env, env_optional};
