/// Get an environment variable with a default value
///
/// Falls back to `default` when the variable is unset or fails to parse.
///
/// # Example
/// ```
/// use kit_body::config::env;
///
/// let limit: usize = env("BODY_MAX_SIZE", 1024);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Get an optional environment variable
///
/// # Example
/// ```
/// use kit_body::config::env_optional;
///
/// let limit: Option<usize> = env_optional("BODY_MAX_SIZE");
/// ```
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
