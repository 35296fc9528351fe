//! Per-client request admission.

mod clock;
mod counter;
mod identity;
mod quota;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::AdmissionCounter;
pub use identity::{resolve_identity, FORWARDED_FOR, UNKNOWN_IDENTITY};
pub use quota::{Admission, ClientQuota, QuotaPolicy, DEFAULT_LIMIT, DEFAULT_WINDOW, MAX_WINDOW};
pub use store::{MemoryQuotaStore, QuotaStore};
