//! OTP store trait defining the persistence port of the OTP lifecycle.

use std::collections::HashMap;

use crate::domain::entities::{OrderId, OtpRecord};
use crate::errors::DomainResult;

/// The full record set, keyed by order
pub type OtpRecordMap = HashMap<OrderId, OtpRecord>;

/// Persistence for OTP records with load-all/save-all semantics.
///
/// The manager keeps the authoritative copy in memory and writes the whole
/// set back after every mutation, so implementations only need to store one
/// document. Calls are synchronous: the manager persists while it still holds
/// its record lock.
pub trait OtpStore: Send + Sync {
    /// Load every persisted record. A store that was never written returns an empty map.
    fn load_all(&self) -> DomainResult<OtpRecordMap>;

    /// Replace the persisted set with `records`
    fn save_all(&self, records: &OtpRecordMap) -> DomainResult<()>;
}
