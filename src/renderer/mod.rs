//! Rendering
//!
//! The game draws through the [`Renderer`] trait in screen pixels (origin top
//! left, y down). [`FrameBatch`] records each frame as colored triangles plus
//! text items; on wasm the WebGPU pipeline uploads the triangles and a DOM
//! layer shows the text.

pub mod batch;
pub mod frame;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub mod pipeline;

use glam::IVec2;

use crate::assets::Sprite;
use crate::sim::Rect;

pub use batch::{DrawCommand, Frame, FrameBatch, TextItem};
pub use frame::draw_frame;
#[cfg(target_arch = "wasm32")]
pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Drawing surface used by the frame driver
pub trait Renderer {
    /// Fill the whole screen, covering everything drawn so far this frame
    fn clear(&mut self, color: Color);
    /// Draw a sprite with its top-left corner at `pos`
    fn draw_sprite(&mut self, sprite: Sprite, pos: IVec2);
    fn draw_filled_rect(&mut self, rect: Rect, color: Color);
    /// Rectangle border `width` pixels thick, inside the rectangle
    fn draw_outlined_rect(&mut self, rect: Rect, color: Color, width: i32);
    /// Text of font size `size` centered on `center`
    fn draw_text(&mut self, text: &str, size: u32, color: Color, center: IVec2);
    /// Finish the frame
    fn present(&mut self);
}
