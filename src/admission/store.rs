//! Quota tables.
//!
//! The table is injected into the admission counter instead of living in a
//! global, so each server (and each test) owns its own set of quotas.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Instant;

use super::quota::{Admission, ClientQuota, QuotaPolicy};

/// Storage for per-identity quotas.
///
/// Implementations must run the whole read-check-write of
/// [`QuotaStore::check_and_record`] as one atomic step per identity.
pub trait QuotaStore: Send + Sync {
    /// Record one request for `identity` at `now` and decide its admission.
    fn check_and_record(&self, identity: &str, policy: &QuotaPolicy, now: Instant) -> Admission;

    /// Snapshot of the quota for `identity`, if one exists.
    fn get(&self, identity: &str) -> Option<ClientQuota>;

    /// Number of identities tracked.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every quota.
    fn clear(&self);
}

/// Process-local quota table.
///
/// Quotas live for as long as the process does and are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryQuotaStore {
    quotas: DashMap<String, ClientQuota>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuotaStore for MemoryQuotaStore {
    fn check_and_record(&self, identity: &str, policy: &QuotaPolicy, now: Instant) -> Admission {
        // The entry guard holds the shard lock until the decision is made.
        match self.quotas.entry(identity.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().admit(now, policy),
            Entry::Vacant(entry) => {
                entry.insert(ClientQuota::open(identity, now, policy));
                Admission::Admitted {
                    remaining: policy.limit() - 1,
                }
            }
        }
    }

    fn get(&self, identity: &str) -> Option<ClientQuota> {
        self.quotas.get(identity).map(|quota| quota.value().clone())
    }

    fn len(&self) -> usize {
        self.quotas.len()
    }

    fn clear(&self) {
        self.quotas.clear();
    }
}
