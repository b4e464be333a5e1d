//! Draw recipes, one per HUD state.
//!
//! Every screen starts from [`background`]: a full fill plus a two-pixel
//! accent ring just inside the visible edge. Positions are offsets from
//! the panel centre so they scale with the geometry.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::RgbColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use super::Palette;
use crate::ble::{Instruction, NavigationEvent};
use crate::render::{Canvas, DisplayBus, Rgb565};

/// Text scale used by the recipes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &FONT_6X10,
            TextSize::Medium => &FONT_9X15_BOLD,
            TextSize::Large => &FONT_10X20,
        }
    }
}

const SPEED_BADGE_OFFSET_Y: i32 = -120;
const SPEED_BADGE_OUTER_R: i32 = 35;
const SPEED_BADGE_INNER_R: i32 = 30;

const GLYPH_OFFSET_Y: i32 = 50;
const GLYPH_SIZE: i32 = 20;

const DISTANCE_OFFSET_Y: i32 = 100;

/// `"<m>m"` below a kilometre, otherwise kilometres rounded half-up to
/// one decimal.
pub fn format_distance(meters: u32) -> String<16> {
    let mut out = String::new();
    if meters < 1000 {
        let _ = write!(out, "{}m", meters);
    } else {
        let tenths = (u64::from(meters) + 50) / 100;
        let _ = write!(out, "{}.{}km", tenths / 10, tenths % 10);
    }
    out
}

/// Text centred horizontally on the panel, top edge at `y`.
pub fn centered_text<B: DisplayBus>(
    canvas: &mut Canvas<B>,
    text: &str,
    y: i32,
    size: TextSize,
    color: Rgb565,
) {
    let x = canvas.geometry().center_x;
    text_at(canvas, text, Point::new(x, y), size, color);
}

fn text_at<B: DisplayBus>(
    canvas: &mut Canvas<B>,
    text: &str,
    position: Point,
    size: TextSize,
    color: Rgb565,
) {
    let character_style = MonoTextStyle::new(size.font(), color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let _ = Text::with_text_style(text, position, character_style, text_style).draw(canvas);
}

pub fn background<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette) {
    let g = *canvas.geometry();
    canvas.fill_screen(palette.background);
    canvas.draw_circle(g.center_x, g.center_y, g.radius - 2, palette.accent);
    canvas.draw_circle(g.center_x, g.center_y, g.radius - 3, palette.accent);
}

pub fn startup<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette) {
    let cy = canvas.geometry().center_y;
    background(canvas, palette);
    centered_text(canvas, "NAV-HUD", cy - 40, TextSize::Large, palette.text);
    centered_text(canvas, "HUD Navigation", cy, TextSize::Medium, palette.text);
    centered_text(canvas, "Starting...", cy + 40, TextSize::Small, palette.accent);
}

pub fn connecting<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette) {
    let g = *canvas.geometry();
    background(canvas, palette);
    centered_text(canvas, "HUD Ready", g.center_y - 30, TextSize::Medium, palette.text);
    centered_text(canvas, "Waiting for", g.center_y, TextSize::Small, palette.text);
    centered_text(
        canvas,
        "Phone Connection",
        g.center_y + 20,
        TextSize::Small,
        palette.accent,
    );
    // BLE indicator
    canvas.fill_circle(g.center_x, g.center_y + 60, 8, palette.accent);
}

pub fn no_data<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette) {
    let cy = canvas.geometry().center_y;
    background(canvas, palette);
    centered_text(canvas, "Connected", cy - 30, TextSize::Medium, palette.accent);
    centered_text(canvas, "No Navigation", cy, TextSize::Small, palette.text);
    centered_text(canvas, "Data", cy + 20, TextSize::Small, palette.text);
}

pub fn error<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette, message: &str) {
    let cy = canvas.geometry().center_y;
    background(canvas, palette);
    centered_text(canvas, "ERROR", cy - 30, TextSize::Medium, palette.warning);
    centered_text(canvas, message, cy + 10, TextSize::Small, palette.text);
}

/// Badge (if any), instruction label, distance and turn glyph.
pub fn navigation<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette, event: &NavigationEvent) {
    let cy = canvas.geometry().center_y;
    background(canvas, palette);

    if event.speed_limit_kph > 0 {
        speed_badge(canvas, event.speed_limit_kph);
    }

    centered_text(canvas, event.instruction.label(), cy, TextSize::Small, palette.text);

    let distance = format_distance(event.distance_m);
    centered_text(
        canvas,
        &distance,
        cy + DISTANCE_OFFSET_Y,
        TextSize::Medium,
        palette.text,
    );

    turn_glyph(canvas, palette, event.instruction);
}

/// Road-sign style limit: red ring, white face, black number. Same in
/// both themes.
pub fn speed_badge<B: DisplayBus>(canvas: &mut Canvas<B>, speed_limit_kph: u16) {
    let g = *canvas.geometry();
    let (x, y) = (g.center_x, g.center_y + SPEED_BADGE_OFFSET_Y);

    canvas.fill_circle(x, y, SPEED_BADGE_OUTER_R, Rgb565::RED);
    canvas.fill_circle(x, y, SPEED_BADGE_INNER_R, Rgb565::WHITE);
    canvas.draw_circle(x, y, SPEED_BADGE_INNER_R, Rgb565::RED);

    let mut label: String<8> = String::new();
    let _ = write!(label, "{}", speed_limit_kph);
    text_at(
        canvas,
        &label,
        Point::new(x, y - 8),
        TextSize::Medium,
        Rgb565::BLACK,
    );
}

/// Arrow for the manoeuvre. `Continue` has no glyph.
pub fn turn_glyph<B: DisplayBus>(canvas: &mut Canvas<B>, palette: &Palette, instruction: Instruction) {
    let g = *canvas.geometry();
    let (x, y) = (g.center_x, g.center_y + GLYPH_OFFSET_Y);
    let size = GLYPH_SIZE;
    let color = palette.accent;

    match instruction {
        Instruction::TurnLeft => {
            for i in 0..size {
                canvas.draw_hline(x - size + i, y - i / 2, size - i, color);
                canvas.draw_hline(x - size + i, y + i / 2, size - i, color);
            }
        }
        Instruction::TurnRight => {
            for i in 0..size {
                canvas.draw_hline(x + i, y - i / 2, size - i, color);
                canvas.draw_hline(x + i, y + i / 2, size - i, color);
            }
        }
        Instruction::GoStraight => {
            for i in 0..size {
                canvas.draw_vline(x - i / 2, y - size + i, size - i, color);
                canvas.draw_vline(x + i / 2, y - size + i, size - i, color);
            }
        }
        Instruction::UTurn => {
            canvas.draw_circle(x, y, size / 2, color);
            canvas.fill_rect(x - size / 4, y, size / 2, size / 2, palette.background);
        }
        Instruction::Continue => {}
    }
}
