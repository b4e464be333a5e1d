//! Display sleep policy.
//!
//! Pure logic, no hardware: the polling loop feeds it timestamps and
//! applies the returned action to the panel.

use crate::settings::HudSettings;

/// Decide whether the display should be asleep after `idle_secs` without
/// activity.
pub fn display_should_sleep(idle_secs: u64, sleep_timeout_secs: u64) -> bool {
    sleep_timeout_secs > 0 && idle_secs >= sleep_timeout_secs
}

/// What the caller should do with the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPower {
    Unchanged,
    Sleep,
    Wake,
}

/// Tracks the last activity and whether the panel is asleep.
#[derive(Debug)]
pub struct SleepTracker {
    timeout_secs: u64,
    wake_on_data: bool,
    last_activity_ms: u64,
    asleep: bool,
}

impl SleepTracker {
    pub fn new(settings: &HudSettings, now_ms: u64) -> Self {
        Self {
            timeout_secs: u64::from(settings.sleep_timeout_secs),
            wake_on_data: settings.wake_on_data,
            last_activity_ms: now_ms,
            asleep: false,
        }
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    /// Connection changes and similar events: always wake.
    pub fn activity(&mut self, now_ms: u64) -> DisplayPower {
        self.last_activity_ms = now_ms;
        if self.asleep {
            self.asleep = false;
            DisplayPower::Wake
        } else {
            DisplayPower::Unchanged
        }
    }

    /// New navigation data. Wakes a sleeping panel only with
    /// wake-on-data enabled.
    pub fn navigation_data(&mut self, now_ms: u64) -> DisplayPower {
        if self.asleep && !self.wake_on_data {
            return DisplayPower::Unchanged;
        }
        self.activity(now_ms)
    }

    /// Check the idle timeout.
    pub fn tick(&mut self, now_ms: u64) -> DisplayPower {
        if self.asleep {
            return DisplayPower::Unchanged;
        }
        let idle_secs = now_ms.saturating_sub(self.last_activity_ms) / 1000;
        if display_should_sleep(idle_secs, self.timeout_secs) {
            info!("Display idle for {}s, sleeping", idle_secs);
            self.asleep = true;
            DisplayPower::Sleep
        } else {
            DisplayPower::Unchanged
        }
    }
}
