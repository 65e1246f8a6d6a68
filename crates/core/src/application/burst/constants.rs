// Burst constants (no magic values)
use std::time::Duration;

/// Upper bound on concurrently running sends when none is configured.
/// `None` leaves the burst unbounded.
pub const DEFAULT_MAX_IN_FLIGHT: Option<usize> = None;

/// Default per-send timeout. `None` waits as long as the client runs.
pub const DEFAULT_SEND_TIMEOUT: Option<Duration> = None;

/// Smallest accepted in-flight limit
pub const MIN_IN_FLIGHT: usize = 1;
