//! Input Module
//!
//! Platform-agnostic pointer handling. The host window forwards pixel
//! positions and button events; the controller reads normalized device
//! coordinates and pending clicks once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use particle_field_engine::input::{MouseButton, PointerState};
//!
//! let mut pointer = PointerState::new();
//! pointer.set_position_pixels(400.0, 300.0, 800, 600);
//! pointer.set_button(MouseButton::Left, true);
//! assert_eq!(pointer.take_clicks(), 1);
//! ```

pub mod pointer;

pub use pointer::{ButtonState, MouseButton, PointerState, pixels_to_ndc};
