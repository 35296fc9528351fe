//! Per-client quota records and the fixed-window admission rule.

use std::time::{Duration, Instant};

use crate::error::{GatewayError, Result};

/// Default number of chat requests a client may make per window.
pub const DEFAULT_LIMIT: u32 = 20;
/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);
/// Longest window accepted; keeps `now + window` far from `Instant` overflow.
pub const MAX_WINDOW: Duration = Duration::from_secs(366 * 24 * 3600);

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request counts toward the window and may proceed.
    Admitted {
        /// Admissions still available in the current window
        remaining: u32,
    },
    /// The window is exhausted for this identity.
    Rejected {
        /// Time until the current window resets
        retry_after: Duration,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// How many admissions an identity gets and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    limit: u32,
    window: Duration,
}

impl QuotaPolicy {
    /// Create a policy, rejecting a zero limit or a window that is zero or
    /// longer than [`MAX_WINDOW`].
    pub fn new(limit: u32, window: Duration) -> Result<Self> {
        if limit == 0 {
            return Err(GatewayError::Config(
                "admission limit must be at least 1".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(GatewayError::Config(
                "admission window must be longer than zero".to_string(),
            ));
        }
        if window > MAX_WINDOW {
            return Err(GatewayError::Config(format!(
                "admission window must not exceed {} seconds",
                MAX_WINDOW.as_secs()
            )));
        }
        Ok(Self { limit, window })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Admission state for one client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientQuota {
    /// The identity this quota belongs to
    pub identity: String,
    /// Admissions recorded in the current window
    pub count: u32,
    /// When the current window ends
    pub window_reset_at: Instant,
}

impl ClientQuota {
    /// Start a fresh window for `identity` with the first admission recorded.
    pub fn open(identity: &str, now: Instant, policy: &QuotaPolicy) -> Self {
        Self {
            identity: identity.to_string(),
            count: 1,
            window_reset_at: now + policy.window(),
        }
    }

    /// Whether the window has ended at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.window_reset_at
    }

    /// Time left until the window resets.
    pub fn duration_until_reset(&self, now: Instant) -> Duration {
        self.window_reset_at.saturating_duration_since(now)
    }

    /// Apply one request to this quota.
    ///
    /// An expired window restarts at `now` rather than at the old boundary, so
    /// windows only tile back-to-back when requests keep arriving. A rejection
    /// leaves the record untouched.
    pub fn admit(&mut self, now: Instant, policy: &QuotaPolicy) -> Admission {
        if self.is_expired(now) {
            self.count = 1;
            self.window_reset_at = now + policy.window();
            return Admission::Admitted {
                remaining: policy.limit() - 1,
            };
        }

        if self.count < policy.limit() {
            self.count += 1;
            return Admission::Admitted {
                remaining: policy.limit() - self.count,
            };
        }

        Admission::Rejected {
            retry_after: self.duration_until_reset(now),
        }
    }
}
