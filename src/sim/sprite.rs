//! Sprite-sheet references held by sim entities
//!
//! Entities never own texture data. They hold a stable handle into the
//! embedder's texture arena plus a source sub-rectangle, so the renderer can
//! draw them without any lifetime coupling. A missing sprite is legal: the
//! entity still collides, it just renders nothing.

use serde::{Deserialize, Serialize};

/// Stable index into the embedder's texture arena (one per tileset image)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub usize);

/// Source sub-rectangle within a sprite sheet, in texel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrcRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A texture handle plus the frame to sample from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRef {
    pub texture: TextureId,
    pub src: SrcRect,
}
