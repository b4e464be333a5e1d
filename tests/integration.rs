//! Integration tests for nav-hud host-testable logic.

use embedded_graphics::prelude::RgbColor;
use nav_hud::app::{self, PollOutcome};
use nav_hud::ble::inbox::LinkEvent;
use nav_hud::ble::{decode, Instruction, NavInbox, NavigationEvent};
use nav_hud::error::DecodeError;
use nav_hud::power_logic::SleepTracker;
use nav_hud::render::{Canvas, FrameBufferBus, Geometry, Orientation, Rgb565};
use nav_hud::sensors::{HeadingSource, MotionSensor, OrientationSample, OrientationTracker};
use nav_hud::settings::{HudSettings, SETTINGS_RECORD_LEN};
use nav_hud::ui::{Hud, Theme, UiState};

/// Wrist turning at a constant rate, held too steep for tilt correction.
struct TurningWrist {
    rate_dps: f32,
}

impl MotionSensor for TurningWrist {
    type Error = ();

    fn read_sample(&mut self, now_ms: u64) -> Result<OrientationSample, ()> {
        Ok(OrientationSample {
            accel: [0.0, 1.0, 0.0],
            gyro_z: self.rate_dps,
            timestamp_ms: now_ms,
        })
    }

    fn read_gyro_z(&mut self) -> Result<f32, ()> {
        Ok(0.0)
    }
}

fn panel() -> Vec<Rgb565> {
    let g = Geometry::default();
    vec![Rgb565::BLACK; usize::from(g.width) * usize::from(g.height)]
}

#[test]
fn short_frame_is_rejected_and_nothing_is_published() {
    assert_eq!(
        decode(&[0x01, 0x00, 0x32]),
        Err(DecodeError::TooShort { len: 3 })
    );

    let inbox = NavInbox::new();
    assert!(inbox.on_write(&[0x01, 0x00]).is_err());
    assert!(!inbox.has_new_data());
    assert_eq!(inbox.take(), None);
}

#[test]
fn phone_session_end_to_end() {
    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let settings = HudSettings::default();
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    hud.show_startup();

    let inbox = NavInbox::new();
    let mut power = SleepTracker::new(&settings, 0);

    // Connect: Startup -> Connecting.
    inbox.on_connect();
    let outcome = app::poll(&mut hud, &inbox, None, &mut power, 50);
    assert_eq!(outcome.link, Some(LinkEvent::Connected));
    assert_eq!(*hud.state(), UiState::Connecting);

    // Two writes before the loop runs: only the latest is shown.
    inbox
        .on_write(&[0x01, 0x00, 0x32, 0x01, 0x00, 0x05, 0x00])
        .unwrap();
    inbox
        .on_write(&[0x01, 0x00, 0x50, 0x02, 0x00, 0x12, 0x00])
        .unwrap();
    let outcome = app::poll(&mut hud, &inbox, None, &mut power, 100);
    assert!(outcome.navigation_applied);
    assert_eq!(*hud.state(), UiState::ShowingNavigation);
    assert_eq!(
        hud.last_event(),
        Some(NavigationEvent::new(Instruction::TurnRight, 1200, 80))
    );

    // Disconnect keeps the route on screen.
    inbox.on_disconnect();
    let outcome = app::poll(&mut hud, &inbox, None, &mut power, 150);
    assert_eq!(outcome.link, Some(LinkEvent::Disconnected));
    assert_eq!(*hud.state(), UiState::ShowingNavigation);

    // Invalid event clears the route.
    inbox.publish(NavigationEvent::invalid());
    app::poll(&mut hud, &inbox, None, &mut power, 200);
    assert_eq!(*hud.state(), UiState::NoData);
    assert_eq!(hud.last_event(), None);

    // Reconnect from NoData goes back to waiting.
    inbox.on_connect();
    app::poll(&mut hud, &inbox, None, &mut power, 250);
    assert_eq!(*hud.state(), UiState::Connecting);
}

#[test]
fn pinned_error_survives_reconnect() {
    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let settings = HudSettings::default();
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    hud.show_error("IMU not found");

    let inbox = NavInbox::new();
    let mut power = SleepTracker::new(&settings, 0);
    inbox.on_connect();
    app::poll(&mut hud, &inbox, None, &mut power, 50);
    assert!(matches!(hud.state(), UiState::Error(m) if m.as_str() == "IMU not found"));

    // A theme change redraws the same message.
    hud.toggle_theme();
    assert_eq!(hud.theme(), Theme::Night);
    assert!(matches!(hud.state(), UiState::Error(m) if m.as_str() == "IMU not found"));
}

#[test]
fn turning_wrist_rotates_the_panel() {
    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let settings = HudSettings::default();
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    hud.show_startup();

    let inbox = NavInbox::new();
    let mut power = SleepTracker::new(&settings, 0);
    let mut tracker = OrientationTracker::new(TurningWrist { rate_dps: 90.0 });

    // First sample only sets the time base.
    let outcome = app::poll(
        &mut hud,
        &inbox,
        Some(&mut tracker as &mut dyn HeadingSource),
        &mut power,
        0,
    );
    assert!(outcome.rotation_applied);
    assert_eq!(hud.orientation(), Orientation::Deg0);

    app::poll(
        &mut hud,
        &inbox,
        Some(&mut tracker as &mut dyn HeadingSource),
        &mut power,
        1000,
    );
    assert!((hud.rotation() - 90.0).abs() < 1e-3);
    assert_eq!(hud.orientation(), Orientation::Deg90);
    assert_eq!(hud.canvas().bus().orientation(), Orientation::Deg90);
    assert_eq!(*hud.state(), UiState::Startup);
}

#[test]
fn fixed_orientation_ignores_the_wrist() {
    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let settings = HudSettings {
        auto_rotation: false,
        rotation: 2,
        ..HudSettings::default()
    };
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    assert_eq!(hud.orientation(), Orientation::Deg180);

    hud.set_rotation(90.0);
    assert_eq!(hud.rotation(), 90.0);
    assert_eq!(hud.orientation(), Orientation::Deg180);
    assert_eq!(hud.canvas().bus().orientation(), Orientation::Deg180);
}

#[test]
fn idle_sleep_then_wake_on_navigation() {
    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let settings = HudSettings {
        sleep_timeout_secs: 60,
        ..HudSettings::default()
    };
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    hud.show_startup();

    let inbox = NavInbox::new();
    let mut power = SleepTracker::new(&settings, 0);

    assert_eq!(
        app::poll(&mut hud, &inbox, None, &mut power, 59_000),
        PollOutcome::default()
    );
    let outcome = app::poll(&mut hud, &inbox, None, &mut power, 60_000);
    assert!(outcome.display_slept);
    assert!(hud.canvas().bus().is_asleep());

    inbox
        .on_write(&[0x01, 0x00, 0x00, 0x03, 0x00, 0x00, 0x99])
        .unwrap();
    let outcome = app::poll(&mut hud, &inbox, None, &mut power, 61_000);
    assert!(outcome.display_woke);
    assert!(!hud.canvas().bus().is_asleep());
    assert_eq!(
        hud.last_event(),
        Some(NavigationEvent::new(Instruction::GoStraight, 99, 0))
    );
}

#[test]
fn stored_settings_drive_the_hud() {
    let custom = HudSettings {
        night_mode: true,
        rotation: 1,
        auto_rotation: false,
        ..HudSettings::default()
    };
    let mut record = [0u8; SETTINGS_RECORD_LEN];
    assert_eq!(custom.serialize(&mut record), SETTINGS_RECORD_LEN);
    let settings = HudSettings::from_record(&record).unwrap();
    assert_eq!(settings, custom);

    let mut pixels = panel();
    let bus = FrameBufferBus::new(&mut pixels, 466, 466).unwrap();
    let mut hud = Hud::new(Canvas::new(bus, Geometry::default()), &settings);
    hud.show_startup();

    assert_eq!(hud.theme(), Theme::Night);
    assert_eq!(hud.orientation(), Orientation::Deg90);
    // Night accent on the rim, text in white.
    let bus = hud.canvas().bus();
    assert_eq!(hud.palette().accent, Rgb565::GREEN);
    assert_eq!(bus.pixel(233, 464), Some(Rgb565::GREEN));
    assert!(bus.count(Rgb565::WHITE) > 0);
    assert!(!bus.is_asleep());
}
