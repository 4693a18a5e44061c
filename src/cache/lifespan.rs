//! Lifespan Module
//!
//! Describes how long an entry stays visible after it is set.

use std::time::{Duration, Instant};

// == Lifespan ==
/// How long a cache entry lives after `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifespan {
    /// The entry never expires
    Forever,
    /// The entry expires once the duration has elapsed
    For(Duration),
}

/// Sentinel lifespan for entries that never expire.
pub const NO_EXPIRATION: Lifespan = Lifespan::Forever;

impl Lifespan {
    // == Expiration Instant ==
    /// Absolute expiration instant when set at `now`, or None if it lives forever.
    ///
    /// Saturates to "forever" if the deadline cannot be represented.
    pub fn expires_at(self, now: Instant) -> Option<Instant> {
        match self {
            Lifespan::Forever => None,
            Lifespan::For(ttl) => now.checked_add(ttl),
        }
    }

    /// Returns true if this lifespan is finite.
    pub fn is_finite(self) -> bool {
        matches!(self, Lifespan::For(_))
    }
}

impl From<Duration> for Lifespan {
    fn from(ttl: Duration) -> Self {
        Lifespan::For(ttl)
    }
}

impl From<Option<Duration>> for Lifespan {
    fn from(ttl: Option<Duration>) -> Self {
        ttl.map_or(Lifespan::Forever, Lifespan::For)
    }
}
