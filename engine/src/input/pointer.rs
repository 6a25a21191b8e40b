//! Pointer Input Module
//!
//! Tracks the pointer in normalized device coordinates plus button clicks.
//! Decoupled from any windowing system: the host feeds raw pixel positions.

use glam::Vec2;

/// Pointer button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional buttons (button 4, 5, etc.)
    Other(u16),
}

/// State of the three main buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    /// Record a press or release.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Other(_) => {}
        }
    }

    /// True while the button is held.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
            MouseButton::Other(_) => false,
        }
    }

    /// True while any button is held.
    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }
}

/// Convert a pixel position to normalized device coordinates.
///
/// # Arguments
/// * `x`, `y` - Pixel position, origin at the top-left corner
/// * `width`, `height` - Viewport size in pixels
///
/// # Returns
/// `[-1, 1]` on both axes with +Y up, or `None` for a zero-sized viewport.
pub fn pixels_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x / width as f64) * 2.0 - 1.0;
    let ndc_y = -(y / height as f64) * 2.0 + 1.0;
    Some(Vec2::new(ndc_x as f32, ndc_y as f32))
}

/// Pointer position and click tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Current position in normalized device coordinates.
    /// Starts at the viewport center.
    pub ndc: Vec2,

    pub buttons: ButtonState,

    /// Left-button presses not yet consumed by [`take_clicks`](Self::take_clicks).
    pending_clicks: u32,
}

impl PointerState {
    /// Pointer at the viewport center with no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer state at a pixel position.
    pub fn from_pixels(x: f64, y: f64, width: u32, height: u32) -> Self {
        let mut state = Self::default();
        state.set_position_pixels(x, y, width, height);
        state
    }

    /// Set the position in normalized device coordinates.
    pub fn set_ndc(&mut self, ndc: Vec2) {
        self.ndc = ndc;
    }

    /// Update the position from raw pixel coordinates.
    ///
    /// A zero-sized viewport (minimized window) keeps the previous position.
    pub fn set_position_pixels(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if let Some(ndc) = pixels_to_ndc(x, y, width, height) {
            self.ndc = ndc;
        }
    }

    /// Handle a button press/release event. A left press counts as a click.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed && button == MouseButton::Left && !self.buttons.left {
            self.pending_clicks += 1;
        }
        self.buttons.set(button, pressed);
    }

    /// Number of clicks since the last call, resetting the counter.
    pub fn take_clicks(&mut self) -> u32 {
        std::mem::take(&mut self.pending_clicks)
    }

    /// Reset all pointer state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
