//! Vector math for event coordinates and draw-list geometry.
//!
//! This module re-exports the [`glam`] types the toolkit uses. Widget bounds
//! stay in integer pixels (see [`crate::geometry`]); cursor positions and
//! emitted draw geometry use `f32` vectors.
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{IVec2, Vec2};
