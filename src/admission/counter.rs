//! The request admission counter.

use std::sync::Arc;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::quota::{Admission, ClientQuota, QuotaPolicy};
use super::store::{MemoryQuotaStore, QuotaStore};

/// Caps how many requests each client identity may make per fixed window.
///
/// This struct is thread-safe and can be shared across request handlers.
pub struct AdmissionCounter {
    policy: QuotaPolicy,
    store: Arc<dyn QuotaStore>,
    clock: Arc<dyn Clock>,
}

impl AdmissionCounter {
    /// Create a counter backed by an in-memory table and the system clock.
    pub fn new(policy: QuotaPolicy) -> Self {
        Self::with_parts(policy, Arc::new(MemoryQuotaStore::new()), Arc::new(SystemClock))
    }

    /// Create a counter with an explicit table and time source.
    pub fn with_parts(
        policy: QuotaPolicy,
        store: Arc<dyn QuotaStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            policy,
            store,
            clock,
        }
    }

    /// Check whether `identity` may make another request, recording it if so.
    pub fn check_and_record(&self, identity: &str) -> Admission {
        let now = self.clock.now();

        trace!(identity = %identity, "Checking admission");

        let admission = self.store.check_and_record(identity, &self.policy, now);

        if let Admission::Rejected { retry_after } = admission {
            debug!(
                identity = %identity,
                limit = self.policy.limit(),
                retry_after_secs = retry_after.as_secs(),
                "Admission limit reached"
            );
        }

        admission
    }

    /// Current quota record for `identity`.
    pub fn quota(&self, identity: &str) -> Option<ClientQuota> {
        self.store.get(identity)
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Number of identities seen since startup.
    pub fn tracked_identities(&self) -> usize {
        self.store.len()
    }
}

impl Default for AdmissionCounter {
    fn default() -> Self {
        Self::new(QuotaPolicy::default())
    }
}
