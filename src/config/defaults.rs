//! Default values for kit-breakout configuration.

/// Concurrent explosion units.
pub const DEFAULT_EXPLOSION_WORKERS: usize = 20;

/// Concurrent filter units.
pub const DEFAULT_FILTER_WORKERS: usize = 5;

/// Upper bound accepted for any worker pool.
pub const MAX_WORKERS: usize = 256;

/// Component keys with this prefix are annotations, not parts.
pub const DEFAULT_IGNORED_COMPONENT_PREFIX: &str = ".";
