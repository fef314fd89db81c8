//! Server limits

use std::time::Duration;

/// Concurrent request limit
pub const MAX_CONCURRENCY: usize = 256;

/// Request body size limit
pub const MAX_BODY_SIZE: usize = 1024 * 1024; // 1MB

/// CORS preflight cache time
pub const CORS_MAX_AGE: Duration = Duration::from_secs(3600);
