//! # Log Redaction Policy
//!
//! Process-wide flag controlling whether cell formatters mask values.
//! When redaction is enabled, the per-column debug formatters emit
//! [`REDACTED_TOKEN`] instead of real data, so row contents can be kept
//! out of logs.
//!
//! The debug serializers (`RowView`'s `Display` and CSV output) hold a
//! [`ScopedDisableRedaction`] guard while rendering: a caller explicitly
//! stringifying a row wants the real values. The guard saves the ambient
//! policy on construction and restores it when dropped, on every exit
//! path including panics: stack-discipline save/restore, not a lock.
//!
//! Toggling the policy from multiple threads at once has no data race but
//! also no meaningful ordering; callers that need that must synchronize
//! externally.

use std::sync::atomic::{AtomicBool, Ordering};

/// Token substituted for cell values while redaction is enabled.
pub const REDACTED_TOKEN: &str = "<redacted>";

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(false);

/// Sets the ambient redaction policy, returning the previous value.
pub fn set_redaction(enabled: bool) -> bool {
    REDACTION_ENABLED.swap(enabled, Ordering::AcqRel)
}

pub fn redaction_enabled() -> bool {
    REDACTION_ENABLED.load(Ordering::Acquire)
}

/// Guard that disables redaction for its lifetime and restores the prior
/// policy on drop.
#[derive(Debug)]
pub struct ScopedDisableRedaction {
    previous: bool,
}

impl ScopedDisableRedaction {
    pub fn new() -> Self {
        Self {
            previous: REDACTION_ENABLED.swap(false, Ordering::AcqRel),
        }
    }
}

impl Default for ScopedDisableRedaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopedDisableRedaction {
    fn drop(&mut self) {
        REDACTION_ENABLED.store(self.previous, Ordering::Release);
    }
}
