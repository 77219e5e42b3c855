//! Render snapshot
//!
//! The sim never draws. Each frame the embedder asks for a flat list of
//! quads (world-space dest rect, sprite-sheet source rect, flip, opacity)
//! and rasterizes them with whatever backend it has. Frame selection is a
//! pure function of movement state and time, so replays render identically.

use serde::{Deserialize, Serialize};

use crate::sim::aabb::Aabb;
use crate::sim::player::MovementState;
use crate::sim::sprite::{SpriteRef, SrcRect, TextureId};
use crate::sim::state::GameState;

/// One textured quad to draw. Quads are emitted back-to-front: layers in
/// file order, then platforms, projectiles, and the player on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub dest: Aabb,
    pub sprite: SpriteRef,
    pub flip_x: bool,
    pub opacity: f32,
}

/// Player sprite-sheet layout: one row per movement state, fixed-size
/// frames, all rows sharing a frame duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSheet {
    pub texture: TextureId,
    /// Frame size in texels
    pub frame_w: u32,
    pub frame_h: u32,
    /// Seconds per animation frame
    pub frame_time: f32,
    /// Frames in each state's row, indexed by [`sheet_row`]
    pub frames_per_row: [u32; 4],
}

impl Default for PlayerSheet {
    fn default() -> Self {
        Self {
            texture: TextureId(0),
            frame_w: 32,
            frame_h: 48,
            frame_time: 0.15,
            frames_per_row: [4, 6, 4, 2],
        }
    }
}

/// Sheet row holding a state's animation
pub fn sheet_row(state: MovementState) -> u32 {
    match state {
        MovementState::Idle => 0,
        MovementState::Moving => 1,
        MovementState::Jumping => 2,
        MovementState::Crouching => 3,
    }
}

/// Select the player's current frame. Looping, and deterministic in
/// `state_time` since the clock restarts on every state change.
pub fn player_frame(sheet: &PlayerSheet, state: MovementState, state_time: f32) -> SrcRect {
    let row = sheet_row(state);
    let count = sheet.frames_per_row[row as usize].max(1);
    let index = (state_time / sheet.frame_time) as u32 % count;
    SrcRect {
        x: index * sheet.frame_w,
        y: row * sheet.frame_h,
        w: sheet.frame_w,
        h: sheet.frame_h,
    }
}

/// Snapshot the whole world as draw quads. Entities without a sprite are
/// skipped; they still exist in the sim, they just draw nothing.
pub fn sprite_quads(state: &GameState, sheet: &PlayerSheet) -> Vec<SpriteQuad> {
    let mut quads = Vec::new();

    for layer in &state.map.layers {
        if !layer.visible {
            continue;
        }
        for (_, _, tile) in layer.iter_tiles() {
            let Some(sprite) = tile.sprite else { continue };
            quads.push(SpriteQuad {
                dest: tile.bounds,
                sprite,
                flip_x: false,
                opacity: layer.opacity,
            });
        }
    }

    for platform in &state.map.disappearing {
        if !platform.is_visible() {
            continue;
        }
        let Some(sprite) = platform.sprite else { continue };
        quads.push(SpriteQuad {
            dest: platform.bounds,
            sprite,
            flip_x: false,
            opacity: 1.0,
        });
    }

    for projectile in &state.map.projectiles {
        let Some(sprite) = projectile.sprite else { continue };
        quads.push(SpriteQuad {
            dest: projectile.render_bounds(),
            sprite,
            flip_x: projectile.vel.x < 0.0,
            opacity: 1.0,
        });
    }

    quads.push(SpriteQuad {
        dest: state.player.rect(),
        sprite: SpriteRef {
            texture: sheet.texture,
            src: player_frame(sheet, state.player.state(), state.player.state_time()),
        },
        flip_x: state.player.facing() < 0,
        opacity: 1.0,
    });

    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{TILE_HEIGHT, TILE_WIDTH};
    use crate::sim::map::{Layer, Map};
    use crate::sim::tile::Tile;
    use crate::tuning::Tuning;

    fn sprite() -> SpriteRef {
        SpriteRef {
            texture: TextureId(0),
            src: SrcRect {
                x: 0,
                y: 0,
                w: 32,
                h: 32,
            },
        }
    }

    #[test]
    fn frame_selection_loops_and_restarts_per_state() {
        let sheet = PlayerSheet::default();
        let f0 = player_frame(&sheet, MovementState::Moving, 0.0);
        let f1 = player_frame(&sheet, MovementState::Moving, 0.16);
        let wrapped = player_frame(&sheet, MovementState::Moving, 0.15 * 6.0);
        assert_ne!(f0, f1);
        assert_eq!(f0, wrapped);
        // Rows differ by state
        assert_ne!(
            player_frame(&sheet, MovementState::Idle, 0.0).y,
            player_frame(&sheet, MovementState::Jumping, 0.0).y
        );
    }

    #[test]
    fn spriteless_tiles_draw_nothing_but_player_always_draws() {
        let mut layer = Layer::new("background", 4, 4, TILE_WIDTH, TILE_HEIGHT);
        layer.set_tile(0, 0, Tile::plain(Aabb::new(0.0, 0.0, 32.0, 32.0), None));
        layer.set_tile(1, 0, Tile::plain(Aabb::new(32.0, 0.0, 32.0, 32.0), Some(sprite())));
        let map = Map::new(4, 4, TILE_WIDTH, TILE_HEIGHT).with_layer(layer);
        let state = GameState::new(map, Tuning::default());

        let quads = sprite_quads(&state, &PlayerSheet::default());
        // One tile quad plus the player
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].dest, Aabb::new(32.0, 0.0, 32.0, 32.0));
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let mut layer = Layer::new("background", 4, 4, TILE_WIDTH, TILE_HEIGHT);
        layer.set_tile(0, 0, Tile::plain(Aabb::new(0.0, 0.0, 32.0, 32.0), Some(sprite())));
        layer.visible = false;
        let map = Map::new(4, 4, TILE_WIDTH, TILE_HEIGHT).with_layer(layer);
        let state = GameState::new(map, Tuning::default());

        let quads = sprite_quads(&state, &PlayerSheet::default());
        assert_eq!(quads.len(), 1); // just the player
    }
}
