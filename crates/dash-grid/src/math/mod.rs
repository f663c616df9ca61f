//! Geometry primitives
//!
//! Screen space is measured in f32 pixels relative to the page; grid space
//! is measured in whole cells.

mod grid_rect;
mod screen_rect;
mod vec2;

pub use grid_rect::GridRect;
pub use screen_rect::ScreenRect;
pub use vec2::Vec2;
