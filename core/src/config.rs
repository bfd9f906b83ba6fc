//! Booth token configuration.
//!
//! Values are provided by the application (see `photobooth-server`), never
//! hardcoded.

use chrono::Duration;
use std::fmt;

/// Booth access token configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret.
    secret: Vec<u8>,

    /// Token lifetime. `None` issues tokens without an `exp` claim; such
    /// tokens stay valid until the booth's version is rotated.
    ///
    /// Default: `None`
    pub ttl: Option<Duration>,
}

impl TokenConfig {
    /// Create a configuration signing with `secret`.
    ///
    /// # Arguments
    ///
    /// * `secret` - Operator-provided HMAC secret
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: None,
        }
    }

    /// Set token lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Signing secret bytes.
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenConfig::new("hunter2").with_ttl(Duration::hours(1));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_default_has_no_ttl() {
        assert!(TokenConfig::new("s").ttl.is_none());
    }
}
