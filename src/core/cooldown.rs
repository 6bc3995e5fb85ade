//! Disk attributes may only be modified once per cooldown window.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Time left before the next modification is accepted; zero outside the window.
pub fn remaining_cooldown(
    last_modified_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown_hours: i64,
) -> Duration {
    let Some(last_modified_at) = last_modified_at else {
        return Duration::zero();
    };
    let window_end = last_modified_at + Duration::hours(cooldown_hours);
    if window_end <= now {
        Duration::zero()
    } else {
        window_end - now
    }
}

/// Countdown shown while the window is open. Each `tick` yields the next second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub remaining_secs: i64,
}

impl Countdown {
    pub fn new(remaining: Duration) -> Self {
        Self {
            remaining_secs: remaining.num_seconds().max(0),
        }
    }

    pub fn tick(self) -> Self {
        Self {
            remaining_secs: (self.remaining_secs - 1).max(0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    /// `HH:MM:SS`
    pub fn display(&self) -> String {
        let hours = self.remaining_secs / 3600;
        let minutes = (self.remaining_secs % 3600) / 60;
        let seconds = self.remaining_secs % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_remaining_cooldown() {
        let remaining = remaining_cooldown(Some(at(10, 0)), at(12, 30), 6);
        assert_eq!(remaining, Duration::minutes(210));
    }

    #[test]
    fn test_window_closes_after_cooldown() {
        assert_eq!(
            remaining_cooldown(Some(at(10, 0)), at(16, 0), 6),
            Duration::zero()
        );
        assert_eq!(
            remaining_cooldown(Some(at(10, 0)), at(17, 0), 6),
            Duration::zero()
        );
        assert_eq!(remaining_cooldown(None, at(17, 0), 6), Duration::zero());
    }

    #[test]
    fn test_countdown_saturates() {
        let countdown = Countdown::new(Duration::seconds(2));
        let next = countdown.tick();
        assert_eq!(next.remaining_secs, 1);
        let done = next.tick().tick();
        assert!(done.is_finished());
        assert_eq!(done.remaining_secs, 0);
    }

    #[test]
    fn test_countdown_display() {
        assert_eq!(Countdown::new(Duration::seconds(3 * 3600 + 61)).display(), "03:01:01");
    }
}
