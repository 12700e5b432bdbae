//! # Dashboard Presenter
//!
//! Pure derivation of UI-ready quantities from a raw account-info tuple and
//! the current wall-clock time. Recomputation is idempotent and side-effect
//! free; the result is applied to the UI and never persisted.

use crate::config::timing::SECONDS_PER_DAY;
use crate::services::AccountInfo;
use crate::units::to_display;

/// Display-ready account state, recomputed on every refresh
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub balance_display: f64,
    pub goal_display: f64,
    /// Goal progress, clamped to `[0, 100]`
    pub progress_percent: f64,
    /// Days until the time-lock expires, one decimal; `None` hides the banner
    pub locked_remaining_days: Option<f64>,
    /// Whether withdraw and break controls are usable
    pub controls_enabled: bool,
}

/// Derive the dashboard state for `info` as of `now` (epoch seconds)
pub fn present(info: &AccountInfo, now: u64) -> DashboardState {
    let balance_display = to_display(info.balance);
    let goal_display = to_display(info.goal);

    let progress_percent = if goal_display > 0.0 {
        (balance_display / goal_display * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let remaining = info.unlock_time.saturating_sub(now);
    let locked = info.is_locked && remaining > 0;
    let locked_remaining_days = if locked {
        // One decimal, matching the lock banner
        Some((remaining as f64 / SECONDS_PER_DAY as f64 * 10.0).round() / 10.0)
    } else {
        None
    };

    DashboardState {
        balance_display,
        goal_display,
        progress_percent,
        locked_remaining_days,
        controls_enabled: !locked,
    }
}

impl DashboardState {
    /// Balance line, e.g. `2.5000 APT`
    pub fn balance_text(&self) -> String {
        format!("{:.4} APT", self.balance_display)
    }

    /// Goal progress line, e.g. `Goal: 2.50 of 10.00 APT`
    pub fn goal_text(&self) -> String {
        format!(
            "Goal: {:.2} of {:.2} APT",
            self.balance_display, self.goal_display
        )
    }

    /// Lock banner text, or `None` when the lock has expired or was never set
    pub fn lock_text(&self) -> Option<String> {
        self.locked_remaining_days
            .map(|days| format!("🔒 Locked for {:.1} more days", days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> AccountInfo {
        AccountInfo {
            balance: 250_000_000,
            goal: 1_000_000_000,
            created_at: 1_700_000_000,
            last_deposit: 1_700_000_000,
            is_locked: false,
            unlock_time: 0,
            deposit_count: 1,
        }
    }

    #[test]
    fn test_progress_is_clamped_at_100() {
        let state = present(
            &AccountInfo {
                balance: 250_000_000,
                goal: 100_000_000,
                ..info()
            },
            1_700_000_000,
        );
        assert_eq!(state.progress_percent, 100.0);
    }

    #[test]
    fn test_progress_with_zero_goal_is_zero() {
        let state = present(&AccountInfo { goal: 0, ..info() }, 1_700_000_000);
        assert_eq!(state.progress_percent, 0.0);
    }

    #[test]
    fn test_partial_progress() {
        let state = present(&info(), 1_700_000_000);
        assert_eq!(state.progress_percent, 25.0);
    }

    #[test]
    fn test_active_lock_shows_banner_and_disables_controls() {
        let now = 1_700_000_000u64;
        let state = present(
            &AccountInfo {
                is_locked: true,
                unlock_time: now + SECONDS_PER_DAY * 2,
                ..info()
            },
            now,
        );
        assert_eq!(state.locked_remaining_days, Some(2.0));
        assert!(!state.controls_enabled);
        assert_eq!(state.lock_text().unwrap(), "🔒 Locked for 2.0 more days");
    }

    #[test]
    fn test_expired_lock_enables_controls() {
        let now = 1_700_000_000u64;
        let state = present(
            &AccountInfo {
                is_locked: true,
                unlock_time: now - 1,
                ..info()
            },
            now,
        );
        assert_eq!(state.locked_remaining_days, None);
        assert!(state.controls_enabled);
        assert!(state.lock_text().is_none());
    }

    #[test]
    fn test_remaining_days_round_to_one_decimal() {
        let now = 1_700_000_000u64;
        let state = present(
            &AccountInfo {
                is_locked: true,
                unlock_time: now + SECONDS_PER_DAY / 4,
                ..info()
            },
            now,
        );
        assert_eq!(state.locked_remaining_days, Some(0.3));
    }

    #[test]
    fn test_display_texts() {
        let state = present(&info(), 1_700_000_000);
        assert_eq!(state.balance_text(), "2.5000 APT");
        assert_eq!(state.goal_text(), "Goal: 2.50 of 10.00 APT");
    }
}
