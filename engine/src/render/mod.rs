//! Render Module
//!
//! Renderer-facing data only. The crate draws nothing itself; a host
//! renderer consumes [`RenderFrame`]s and uploads [`RenderInstance`] buffers.

pub mod snapshot;

pub use snapshot::{BodySnapshot, RenderFrame, RenderInstance, SnapshotKind};
