//! HUD state machine.
//!
//! ```text
//!            on_connect                 update_navigation(valid)
//! Startup ─────────────> Connecting ────────────────────────> ShowingNavigation
//!    │                       │     update_navigation(invalid)        │
//!    │                       └──────────────> NoData <───────────────┘
//!    └── show_error (from any state) ──> Error ── show_startup ──> Startup
//! ```
//!
//! Every transition redraws the whole screen. Theme changes redraw the
//! current state; rotation never redraws.

use super::{screens, Palette, Theme, UiState, ERROR_MESSAGE_CAPACITY};
use crate::ble::NavigationEvent;
use crate::render::{Canvas, DisplayBus, Orientation};
use crate::settings::HudSettings;

pub struct Hud<B> {
    canvas: Canvas<B>,
    state: UiState,
    theme: Theme,
    palette: Palette,
    last_event: Option<NavigationEvent>,
    rotation: f32,
    orientation: Orientation,
    auto_rotation: bool,
}

impl<B: DisplayBus> Hud<B> {
    /// Take ownership of the canvas and apply the stored preferences.
    /// Nothing is drawn until the first `show_*` call.
    pub fn new(mut canvas: Canvas<B>, settings: &HudSettings) -> Self {
        let theme = settings.theme();
        let orientation = settings.orientation();
        canvas.set_orientation(orientation);

        Self {
            canvas,
            state: UiState::Startup,
            theme,
            palette: theme.palette(),
            last_event: None,
            rotation: f32::from(orientation.quarter_turns()) * 90.0,
            orientation,
            auto_rotation: settings.auto_rotation,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Event currently on screen, if any.
    pub fn last_event(&self) -> Option<NavigationEvent> {
        self.last_event
    }

    /// Last heading passed to [`Hud::set_rotation`] (degrees).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn auto_rotation(&self) -> bool {
        self.auto_rotation
    }

    pub fn canvas(&self) -> &Canvas<B> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<B> {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> Canvas<B> {
        self.canvas
    }

    pub fn show_startup(&mut self) {
        self.state = UiState::Startup;
        screens::startup(&mut self.canvas, &self.palette);
    }

    pub fn show_connecting(&mut self) {
        self.state = UiState::Connecting;
        screens::connecting(&mut self.canvas, &self.palette);
    }

    pub fn show_no_data(&mut self) {
        self.state = UiState::NoData;
        self.last_event = None;
        screens::no_data(&mut self.canvas, &self.palette);
    }

    /// Phone connected. Moves to the waiting screen unless a route is
    /// already showing or an error is pinned.
    pub fn on_connect(&mut self) {
        match self.state {
            UiState::Startup | UiState::NoData => self.show_connecting(),
            UiState::Connecting | UiState::ShowingNavigation | UiState::Error(_) => {}
        }
    }

    /// Phone gone. The last screen stays up; advertising restarts in the
    /// BLE task.
    pub fn on_disconnect(&mut self) {
        debug!("HUD: link lost, keeping current screen");
    }

    pub fn update_navigation(&mut self, event: NavigationEvent) {
        if !event.valid {
            self.show_no_data();
            return;
        }
        self.state = UiState::ShowingNavigation;
        self.last_event = Some(event);
        screens::navigation(&mut self.canvas, &self.palette, &event);
    }

    /// Pin an error message on screen. Longer messages are cut at a
    /// character boundary.
    pub fn show_error(&mut self, message: &str) {
        error!("HUD error: {=str}", message);
        let text = truncate(message);
        screens::error(&mut self.canvas, &self.palette, &text);
        self.state = UiState::Error(text);
        self.last_event = None;
    }

    /// Swap colours and redraw the same state.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = theme.palette();
        self.redraw();
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    /// Redraw whatever the current state shows.
    pub fn redraw(&mut self) {
        match &self.state {
            UiState::Startup => screens::startup(&mut self.canvas, &self.palette),
            UiState::Connecting => screens::connecting(&mut self.canvas, &self.palette),
            UiState::NoData => screens::no_data(&mut self.canvas, &self.palette),
            UiState::Error(message) => screens::error(&mut self.canvas, &self.palette, message),
            UiState::ShowingNavigation => match self.last_event {
                Some(event) => screens::navigation(&mut self.canvas, &self.palette, &event),
                None => screens::no_data(&mut self.canvas, &self.palette),
            },
        }
    }

    /// Feed a heading. Only a change of quarter-turn bucket reaches the
    /// panel, and only with auto-rotation on.
    pub fn set_rotation(&mut self, angle_deg: f32) {
        self.rotation = angle_deg;
        if !self.auto_rotation {
            return;
        }
        let bucket = Orientation::from_angle(angle_deg);
        if bucket != self.orientation {
            self.orientation = bucket;
            self.canvas.set_orientation(bucket);
        }
    }

    pub fn set_auto_rotation(&mut self, enabled: bool) {
        self.auto_rotation = enabled;
    }

    pub fn sleep(&mut self) {
        self.canvas.sleep();
    }

    pub fn wake(&mut self) {
        self.canvas.wake();
    }
}

fn truncate(message: &str) -> heapless::String<ERROR_MESSAGE_CAPACITY> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
