//! One iteration of the main polling loop.
//!
//! The loop is the only place that draws. It drains the BLE inbox, feeds
//! the heading into the HUD and applies the sleep policy. The embedded
//! binary calls [`poll`] every `POLL_PERIOD_MS`; host tests call it
//! directly with synthetic timestamps.

use crate::ble::inbox::LinkEvent;
use crate::ble::NavInbox;
use crate::power_logic::{DisplayPower, SleepTracker};
use crate::render::DisplayBus;
use crate::sensors::HeadingSource;
use crate::ui::Hud;

/// What a single iteration did, mostly for tests and logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub link: Option<LinkEvent>,
    pub navigation_applied: bool,
    pub rotation_applied: bool,
    pub display_slept: bool,
    pub display_woke: bool,
}

/// Run one loop iteration at `now_ms`.
///
/// `heading` is `None` when the motion sensor failed to come up; the
/// HUD then keeps its fixed orientation.
pub fn poll<B: DisplayBus>(
    hud: &mut Hud<B>,
    inbox: &NavInbox,
    heading: Option<&mut dyn HeadingSource>,
    power: &mut SleepTracker,
    now_ms: u64,
) -> PollOutcome {
    let mut outcome = PollOutcome::default();

    if let Some(link) = inbox.take_link_event() {
        outcome.link = Some(link);
        apply_power(hud, power.activity(now_ms), &mut outcome);
        match link {
            LinkEvent::Connected => hud.on_connect(),
            LinkEvent::Disconnected => hud.on_disconnect(),
        }
    }

    if let Some(event) = inbox.take() {
        apply_power(hud, power.navigation_data(now_ms), &mut outcome);
        hud.update_navigation(event);
        outcome.navigation_applied = true;
    }

    if let Some(source) = heading {
        source.read_data(now_ms);
        if source.has_new_data() {
            hud.set_rotation(source.take_rotation());
            outcome.rotation_applied = true;
        }
    }

    apply_power(hud, power.tick(now_ms), &mut outcome);
    outcome
}

fn apply_power<B: DisplayBus>(hud: &mut Hud<B>, action: DisplayPower, outcome: &mut PollOutcome) {
    match action {
        DisplayPower::Unchanged => {}
        DisplayPower::Sleep => {
            hud.sleep();
            outcome.display_slept = true;
        }
        DisplayPower::Wake => {
            hud.wake();
            outcome.display_woke = true;
        }
    }
}
