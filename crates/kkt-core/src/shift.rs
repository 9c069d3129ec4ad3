//! # Shift Tracker
//!
//! Local mirror of the register's shift state.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            open_shift                                                   │
//! │   CLOSED ─────────────► OPEN ──── 24h wall clock ────► EXPIRED          │
//! │     ▲                    │                               │              │
//! │     │   close_shift      │                               │              │
//! │     └────────────────────┴───────────────────────────────┘              │
//! │         (Z-report)                                                      │
//! │                                                                         │
//! │   receipts:   OPEN only                                                 │
//! │   x_report:   OPEN or EXPIRED                                           │
//! │   close:      OPEN or EXPIRED                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The register is the source of truth. The tracker is refreshed from
//! every status query and is only used to refuse obviously invalid
//! operations before a device call is made. Until the first successful
//! query it is unsynced, and a CLOSED reading proves nothing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ShiftStatus;

/// Maximum shift length allowed by fiscal law.
pub const MAX_SHIFT_HOURS: i64 = 24;

/// Shift state as encoded by the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftState {
    Closed,
    Open,
    Expired,
}

impl ShiftState {
    /// Decodes the register's shift state value (0, 1, 2).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ShiftState::Closed),
            1 => Some(ShiftState::Open),
            2 => Some(ShiftState::Expired),
            _ => None,
        }
    }

    pub const fn code(&self) -> i64 {
        match self {
            ShiftState::Closed => 0,
            ShiftState::Open => 1,
            ShiftState::Expired => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShiftTracker {
    status: ShiftStatus,
    synced: bool,
}

impl Default for ShiftTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ShiftTracker {
    pub fn new() -> Self {
        ShiftTracker {
            status: ShiftStatus::closed(0),
            synced: false,
        }
    }

    pub fn status(&self) -> &ShiftStatus {
        &self.status
    }

    /// Replaces the mirror with what the register reported.
    pub fn refresh(&mut self, status: ShiftStatus) {
        self.status = status;
        self.synced = true;
    }

    /// True once the mirror reflects something the register said.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// The register disagreed with the mirror; re-read before trusting it.
    pub fn invalidate(&mut self) {
        self.synced = false;
    }

    /// Open, expired or not.
    pub fn is_open(&self) -> bool {
        self.status.opened
    }

    /// True when the register flagged the shift or it is older than 24h.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if !self.status.opened {
            return false;
        }
        if self.status.expired {
            return true;
        }
        self.status
            .opened_at
            .map(|at| now - at >= Duration::hours(MAX_SHIFT_HOURS))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Guards
    // -------------------------------------------------------------------------

    pub fn check_can_open(&self) -> CoreResult<()> {
        if self.status.opened {
            return Err(CoreError::ShiftAlreadyOpen);
        }
        Ok(())
    }

    /// Fails with `ShiftNotOpen` naming `action` when the shift is closed.
    pub fn require_open(&self, action: &str) -> CoreResult<()> {
        if !self.status.opened {
            return Err(CoreError::ShiftNotOpen {
                action: action.to_string(),
            });
        }
        Ok(())
    }

    /// Receipts need an open shift that is younger than 24 hours.
    pub fn require_receipts_allowed(&self, action: &str, now: DateTime<Utc>) -> CoreResult<()> {
        self.require_open(action)?;
        if self.is_expired(now) {
            return Err(CoreError::ShiftExpired {
                action: action.to_string(),
            });
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    pub fn mark_opened(&mut self, number: u32, at: DateTime<Utc>) {
        self.status = ShiftStatus {
            opened: true,
            number,
            receipt_count: 0,
            expired: false,
            opened_at: Some(at),
        };
        self.synced = true;
    }

    pub fn mark_closed(&mut self) {
        self.status = ShiftStatus::closed(self.status.number);
        self.synced = true;
    }

    pub fn record_receipt(&mut self) {
        self.status.receipt_count += 1;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_tracker_is_closed() {
        let tracker = ShiftTracker::new();
        assert!(!tracker.is_open());
        assert!(matches!(
            tracker.require_open("closing shift"),
            Err(CoreError::ShiftNotOpen { .. })
        ));
        assert!(tracker.check_can_open().is_ok());
    }

    #[test]
    fn test_open_and_close() {
        let mut tracker = ShiftTracker::new();
        tracker.mark_opened(7, at(8));
        assert!(tracker.is_open());
        assert_eq!(tracker.check_can_open(), Err(CoreError::ShiftAlreadyOpen));
        assert!(tracker.require_receipts_allowed("opening receipt", at(9)).is_ok());

        tracker.record_receipt();
        assert_eq!(tracker.status().receipt_count, 1);

        tracker.mark_closed();
        assert!(!tracker.is_open());
        assert_eq!(tracker.status().number, 7);
    }

    #[test]
    fn test_expiry_after_24_hours() {
        let mut tracker = ShiftTracker::new();
        tracker.mark_opened(1, at(8));

        let almost = at(8) + Duration::hours(23) + Duration::minutes(59);
        assert!(!tracker.is_expired(almost));

        let day_later = at(8) + Duration::hours(24);
        assert!(tracker.is_expired(day_later));
        assert!(matches!(
            tracker.require_receipts_allowed("opening receipt", day_later),
            Err(CoreError::ShiftExpired { .. })
        ));
        // An expired shift still counts as open for closing
        assert!(tracker.require_open("closing shift").is_ok());
    }

    #[test]
    fn test_register_flag_wins_without_timestamp() {
        let mut tracker = ShiftTracker::new();
        tracker.refresh(ShiftStatus {
            opened: true,
            number: 3,
            receipt_count: 10,
            expired: true,
            opened_at: None,
        });
        assert!(tracker.is_expired(at(0)));
    }

    #[test]
    fn test_synced_flag() {
        let mut tracker = ShiftTracker::new();
        assert!(!tracker.is_synced());

        tracker.refresh(ShiftStatus::closed(4));
        assert!(tracker.is_synced());

        tracker.invalidate();
        assert!(!tracker.is_synced());
        tracker.mark_opened(5, at(8));
        assert!(tracker.is_synced());
    }

    #[test]
    fn test_shift_state_codes() {
        assert_eq!(ShiftState::from_code(2), Some(ShiftState::Expired));
        assert_eq!(ShiftState::from_code(5), None);
        assert_eq!(ShiftState::Open.code(), 1);
    }
}
