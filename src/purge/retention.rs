use chrono::{DateTime, Utc};

use super::protected::ProtectedSet;
use crate::api::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    TooRecent,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Delete,
    Keep(KeepReason),
}

/// Everything created before `cutoff` is eligible for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    cutoff: DateTime<Utc>,
}

impl RetentionPolicy {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self { cutoff }
    }

    pub fn is_expired(&self, status: &Status) -> bool {
        status.created_at < self.cutoff
    }

    pub fn decide(&self, status: &Status, protected: &ProtectedSet) -> Decision {
        if !self.is_expired(status) {
            Decision::Keep(KeepReason::TooRecent)
        } else if protected.contains(status.id) {
            Decision::Keep(KeepReason::Protected)
        } else {
            Decision::Delete
        }
    }
}
