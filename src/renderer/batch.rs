//! Recording renderer
//!
//! Turns draw calls into a vertex list (sprites become tinted quads of their
//! footprint) and keeps the calls themselves so the layout can be inspected.

use glam::IVec2;

use super::vertex::Vertex;
use super::{Color, Renderer, shapes};
use crate::assets::{AssetCatalog, Sprite};
use crate::sim::Rect;

/// A draw call as issued
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Sprite { sprite: Sprite, pos: IVec2 },
    FilledRect { rect: Rect, color: Color },
    OutlinedRect { rect: Rect, color: Color, width: i32 },
    Text(TextItem),
}

/// Text to be laid out by the front end
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub size: u32,
    pub color: Color,
    pub center: IVec2,
}

/// One finished frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Color of the last full-screen fill
    pub clear_color: Color,
    /// Triangles painted after that fill, back to front
    pub vertices: Vec<Vertex>,
    /// Text painted after that fill
    pub texts: Vec<TextItem>,
    /// Every call of the frame, including those a later fill covered
    pub commands: Vec<DrawCommand>,
}

/// [`Renderer`] that records frames
#[derive(Debug, Clone)]
pub struct FrameBatch {
    catalog: AssetCatalog,
    current: Frame,
    presented: Frame,
    frames: u64,
}

impl FrameBatch {
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            current: Frame::default(),
            presented: Frame::default(),
            frames: 0,
        }
    }

    /// The last presented frame
    pub fn frame(&self) -> &Frame {
        &self.presented
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for FrameBatch {
    fn clear(&mut self, color: Color) {
        self.current.clear_color = color;
        self.current.vertices.clear();
        self.current.texts.clear();
        self.current.commands.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: Sprite, pos: IVec2) {
        let asset = self.catalog.sprite(sprite);
        let rect = Rect { pos, size: asset.size };
        let vertices = match sprite {
            Sprite::Car(_) => shapes::car(rect, asset.tint),
            _ => shapes::filled_rect(rect, asset.tint),
        };
        self.current.vertices.extend(vertices);
        self.current
            .commands
            .push(DrawCommand::Sprite { sprite, pos });
    }

    fn draw_filled_rect(&mut self, rect: Rect, color: Color) {
        self.current
            .vertices
            .extend(shapes::filled_rect(rect, color));
        self.current
            .commands
            .push(DrawCommand::FilledRect { rect, color });
    }

    fn draw_outlined_rect(&mut self, rect: Rect, color: Color, width: i32) {
        self.current
            .vertices
            .extend(shapes::outlined_rect(rect, color, width));
        self.current
            .commands
            .push(DrawCommand::OutlinedRect { rect, color, width });
    }

    fn draw_text(&mut self, text: &str, size: u32, color: Color, center: IVec2) {
        let item = TextItem {
            text: text.to_owned(),
            size,
            color,
            center,
        };
        self.current.texts.push(item.clone());
        self.current.commands.push(DrawCommand::Text(item));
    }

    fn present(&mut self) {
        self.presented = std::mem::take(&mut self.current);
        self.frames += 1;
    }
}
