//! # Mirror Configuration
//!
//! Configuration for the remote mirror processor.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                           │
//! │                                                                     │
//! │  1. Environment Variables (highest priority)                        │
//! │     DATATEC_MIRROR_URL=https://backend.example/api/erp              │
//! │                                                                     │
//! │  2. Explicit MirrorConfig::new(endpoint) from the caller            │
//! │                                                                     │
//! │  No URL from either source means mirroring stays off; the store     │
//! │  runs local-only, which is a supported deployment, not an error.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tracing::info;

/// Environment variable naming the mirror endpoint.
pub const MIRROR_URL_ENV: &str = "DATATEC_MIRROR_URL";

/// Configuration for the mirror processor.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Endpoint receiving `{key, value}` POSTs.
    pub endpoint: String,

    /// Capacity of the in-memory event queue. Writes beyond this are
    /// dropped with a warning.
    /// Default: 256
    pub queue_capacity: usize,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl MirrorConfig {
    /// Creates a mirror configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        MirrorConfig {
            endpoint: endpoint.into(),
            queue_capacity: 256,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the event queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds a configuration from `DATATEC_MIRROR_URL`, or `None` when
    /// the variable is unset or empty (mirroring off).
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var(MIRROR_URL_ENV).ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        info!(endpoint = %endpoint, "Mirror endpoint configured from environment");
        Some(MirrorConfig::new(endpoint))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MirrorConfig::new("https://backend.example/api/erp");
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder() {
        let config = MirrorConfig::new("https://backend.example/api/erp")
            .queue_capacity(32)
            .request_timeout(Duration::from_secs(2));
        assert_eq!(config.queue_capacity, 32);
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }
}
