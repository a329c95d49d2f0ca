use crate::config::env::env;

/// Default body limit: 10MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Body collection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyConfig {
    /// Maximum request body size in bytes, enforced while reading from the wire
    pub max_body_size: usize,
}

impl BodyConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            max_body_size: env("BODY_MAX_SIZE", DEFAULT_MAX_BODY_SIZE),
        }
    }

    /// Create a builder for customizing config
    pub fn builder() -> BodyConfigBuilder {
        BodyConfigBuilder::default()
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for BodyConfig
#[derive(Default)]
pub struct BodyConfigBuilder {
    max_body_size: Option<usize>,
}

impl BodyConfigBuilder {
    /// Set the maximum request body size in bytes
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    /// Build the BodyConfig
    pub fn build(self) -> BodyConfig {
        BodyConfig {
            max_body_size: self
                .max_body_size
                .unwrap_or_else(|| BodyConfig::from_env().max_body_size),
        }
    }
}
