//! Map-source parsing
//!
//! Serde model for the JSON map format (a subset of the Tiled export:
//! dimensions, tilesets, dense GID layers). Parsing is the only fallible
//! step of loading; everything downstream degrades instead of failing.

use serde::{Deserialize, Serialize};

use crate::sim::sprite::{SpriteRef, SrcRect, TextureId};

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

/// One tileset: a sprite-sheet image plus the GID range it owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    /// First global tile ID owned by this tileset
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    /// Number of tile IDs owned
    #[serde(rename = "tilecount")]
    pub tile_count: u32,
    /// Tiles per sheet row
    pub columns: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    /// Image path, resolved by the embedder's asset loader
    pub image: String,
}

/// One layer: a dense row-major GID grid. GID 0 is an empty cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLayer {
    pub name: String,
    pub data: Vec<u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

/// Parsed map file, not yet converted into a live world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSource {
    pub width: usize,
    pub height: usize,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
    #[serde(default)]
    pub layers: Vec<SourceLayer>,
    /// Spawn point in world pixels. Maps without one spawn at the origin.
    #[serde(default, rename = "playerstart")]
    pub player_start: Option<(f32, f32)>,
}

impl MapSource {
    /// Parse a map from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<MapSource> {
        let source: MapSource = serde_json::from_str(text)?;
        for layer in &source.layers {
            let expected = source.width * source.height;
            if layer.data.len() != expected {
                log::warn!(
                    "layer '{}': {} gids for a {}x{} map, extra cells ignored",
                    layer.name,
                    layer.data.len(),
                    source.width,
                    source.height
                );
            }
        }
        Ok(source)
    }

    /// Resolve a GID to its sprite-sheet frame. GID 0 and GIDs outside
    /// every tileset's range resolve to `None`.
    pub fn resolve_gid(&self, gid: u32) -> Option<SpriteRef> {
        if gid == 0 {
            return None;
        }
        for (index, set) in self.tilesets.iter().enumerate() {
            if gid < set.first_gid || gid >= set.first_gid + set.tile_count {
                continue;
            }
            if set.columns == 0 {
                return None;
            }
            let local = gid - set.first_gid;
            return Some(SpriteRef {
                texture: TextureId(index),
                src: SrcRect {
                    x: (local % set.columns) * set.tile_width,
                    y: (local / set.columns) * set.tile_height,
                    w: set.tile_width,
                    h: set.tile_height,
                },
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "width": 4,
        "height": 2,
        "tilewidth": 32,
        "tileheight": 32,
        "tilesets": [
            {"firstgid": 1, "tilecount": 8, "columns": 4,
             "tilewidth": 32, "tileheight": 32, "image": "tiles.png"},
            {"firstgid": 9, "tilecount": 2, "columns": 2,
             "tilewidth": 16, "tileheight": 16, "image": "items.png"}
        ],
        "layers": [
            {"name": "background", "data": [0, 1, 2, 0, 5, 6, 0, 9]}
        ],
        "playerstart": [48.0, 16.0]
    }"#;

    #[test]
    fn parses_fixture() {
        let source = MapSource::from_json(FIXTURE).unwrap();
        assert_eq!(source.width, 4);
        assert_eq!(source.height, 2);
        assert_eq!(source.layers.len(), 1);
        assert!(source.layers[0].visible);
        assert_eq!(source.layers[0].opacity, 1.0);
        assert_eq!(source.player_start, Some((48.0, 16.0)));
    }

    #[test]
    fn gid_zero_and_out_of_range_resolve_to_none() {
        let source = MapSource::from_json(FIXTURE).unwrap();
        assert!(source.resolve_gid(0).is_none());
        assert!(source.resolve_gid(11).is_none());
    }

    #[test]
    fn gids_pick_the_owning_tileset() {
        let source = MapSource::from_json(FIXTURE).unwrap();

        // gid 6 is local id 5 in the 4-column first sheet: row 1, col 1
        let s = source.resolve_gid(6).unwrap();
        assert_eq!(s.texture, TextureId(0));
        assert_eq!((s.src.x, s.src.y, s.src.w, s.src.h), (32, 32, 32, 32));

        // gid 9 is local id 0 in the second sheet
        let s = source.resolve_gid(9).unwrap();
        assert_eq!(s.texture, TextureId(1));
        assert_eq!((s.src.x, s.src.y, s.src.w, s.src.h), (0, 0, 16, 16));
    }

    #[test]
    fn malformed_json_is_an_error_not_a_panic() {
        assert!(MapSource::from_json("{\"width\": }").is_err());
        assert!(MapSource::from_json("").is_err());
    }
}
