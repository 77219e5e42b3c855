//! Tile layers, the spatial tile index and map assembly
//!
//! A layer is a dense grid of optional static tiles. World-rect queries
//! convert corners to tile coordinates by integer division and visit only
//! the covered sub-rectangle, so "colliders near the player" is
//! O(tiles-covered) instead of O(total-tiles). Out-of-bounds access never
//! panics: reads return nothing, writes are dropped.

use glam::Vec2;

use super::aabb::{Aabb, overlaps};
use super::projectile::{Projectile, ProjectileKind};
use super::tile::{DisappearingPlatform, Tile, TileKind};
use crate::consts::{
    ARROW_HEIGHT, ARROW_SPEED, ARROW_WIDTH, ARROWS_LAYER, BACKGROUND_LAYER, COINS_LAYER,
    DISAPPEAR_LAYER, TRAPS_LAYER,
};
use crate::map_source::MapSource;

/// A named grid of static tiles with independent visibility/collidability
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    width: usize,
    height: usize,
    tile_w: f32,
    tile_h: f32,
    tiles: Vec<Option<Tile>>,
    pub visible: bool,
    pub collidable: bool,
    pub opacity: f32,
}

impl Layer {
    pub fn new(name: impl Into<String>, width: usize, height: usize, tile_w: f32, tile_h: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tile_w,
            tile_h,
            tiles: vec![None; width * height],
            visible: true,
            collidable: true,
            opacity: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Out-of-bounds writes are dropped
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.tiles[idx] = Some(tile);
        }
    }

    /// Out-of-bounds reads return None
    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        if x < self.width && y < self.height {
            self.tiles[self.index(x, y)].as_ref()
        } else {
            None
        }
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.tiles[idx].as_mut()
        } else {
            None
        }
    }

    pub fn remove_tile(&mut self, x: usize, y: usize) -> Option<Tile> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.tiles[idx].take()
        } else {
            None
        }
    }

    pub fn clear_tiles(&mut self) {
        self.tiles.fill(None);
    }

    /// World rect to the clamped sub-rectangle of tile coordinates it covers.
    /// Rects straddling the grid boundary clamp; fully-outside rects yield
    /// an empty range.
    fn tile_range(&self, rect: &Aabb) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 || rect.is_empty() {
            return None;
        }
        let x0 = (rect.left() / self.tile_w).floor() as i64;
        let y0 = (rect.top() / self.tile_h).floor() as i64;
        let x1 = (rect.right() / self.tile_w).floor() as i64;
        let y1 = (rect.bottom() / self.tile_h).floor() as i64;
        if x1 < 0 || y1 < 0 || x0 >= self.width as i64 || y0 >= self.height as i64 {
            return None;
        }
        Some((
            x0.max(0) as usize,
            y0.max(0) as usize,
            x1.min(self.width as i64 - 1) as usize,
            y1.min(self.height as i64 - 1) as usize,
        ))
    }

    /// Grid coordinates of occupied cells intersecting the rect
    pub fn tiles_in_rect(&self, rect: &Aabb) -> Vec<(usize, usize)> {
        let Some((x0, y0, x1, y1)) = self.tile_range(rect) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                if self.tiles[self.index(x, y)].is_some() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Occupied cells with their grid coordinates, row-major
    pub fn iter_tiles(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        self.tiles.iter().enumerate().filter_map(|(i, t)| {
            t.as_ref().map(|tile| (i % self.width, i / self.width, tile))
        })
    }

    pub fn tile_to_world(&self, x: usize, y: usize) -> Aabb {
        Aabb::new(
            x as f32 * self.tile_w,
            y as f32 * self.tile_h,
            self.tile_w,
            self.tile_h,
        )
    }
}

/// Handle to a static collider returned by the spatial query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticHandle {
    /// A tile in `Map::layers[layer]` at grid cell (x, y)
    Tile { layer: usize, x: usize, y: usize },
    /// Index into `Map::disappearing`
    Platform(usize),
}

/// The world: ordered layers, dynamic entities spun off them, dimensions
#[derive(Debug, Clone, Default)]
pub struct Map {
    pub layers: Vec<Layer>,
    pub projectiles: Vec<Projectile>,
    pub disappearing: Vec<DisappearingPlatform>,
    width: usize,
    height: usize,
    tile_w: f32,
    tile_h: f32,
    player_start: Option<Vec2>,
}

impl Map {
    pub fn new(width: usize, height: usize, tile_w: f32, tile_h: f32) -> Self {
        Self {
            layers: Vec::new(),
            projectiles: Vec::new(),
            disappearing: Vec::new(),
            width,
            height,
            tile_w,
            tile_h,
            player_start: None,
        }
    }

    /// Assemble a map from pre-parsed map-source data, converting the
    /// specially-named layers into dynamic entities. A grid cell is owned by
    /// either the static grid or a dynamic entity, never both.
    pub fn from_source(source: &MapSource) -> Self {
        let mut map = Map::new(
            source.width,
            source.height,
            source.tile_width as f32,
            source.tile_height as f32,
        );
        map.player_start = source.player_start.map(|(x, y)| Vec2::new(x, y));

        for src_layer in &source.layers {
            let mut layer = Layer::new(
                src_layer.name.clone(),
                source.width,
                source.height,
                map.tile_w,
                map.tile_h,
            );
            layer.visible = src_layer.visible;
            layer.opacity = src_layer.opacity;

            for (i, &gid) in src_layer.data.iter().enumerate() {
                if gid == 0 {
                    continue; // empty cell
                }
                let Some(sprite) = source.resolve_gid(gid) else {
                    log::warn!(
                        "layer '{}': gid {} matches no tileset, skipping",
                        src_layer.name,
                        gid
                    );
                    continue;
                };
                let x = i % source.width;
                let y = i / source.width;
                let bounds = layer.tile_to_world(x, y);
                layer.set_tile(x, y, Tile::plain(bounds, Some(sprite)));
            }

            match layer.name() {
                BACKGROUND_LAYER => {
                    layer.collidable = false;
                    map.layers.push(layer);
                }
                COINS_LAYER => {
                    // Coin tiles become projectiles; the layer's static grid
                    // is dropped entirely
                    let mut count = 0;
                    for (_, _, tile) in layer.iter_tiles() {
                        map.projectiles.push(Projectile::new(
                            ProjectileKind::Coin,
                            tile.bounds,
                            tile.sprite,
                        ));
                        count += 1;
                    }
                    log::info!("layer '{}': spawned {} coins", layer.name(), count);
                }
                TRAPS_LAYER => {
                    // Same cells, lethal kind with a reduced hitbox
                    for slot in layer.tiles.iter_mut().flatten() {
                        slot.kind = TileKind::Trap;
                    }
                    map.layers.push(layer);
                }
                DISAPPEAR_LAYER => {
                    // Platforms leave the static grid and live in their own
                    // list so the phase machine can gate collidability
                    let mut platforms = Vec::new();
                    for (_, _, tile) in layer.iter_tiles() {
                        platforms.push(DisappearingPlatform::new(tile.bounds, tile.sprite));
                    }
                    log::info!(
                        "layer '{}': {} disappearing platforms",
                        layer.name(),
                        platforms.len()
                    );
                    map.disappearing.extend(platforms);
                    layer.clear_tiles();
                    map.layers.push(layer);
                }
                ARROWS_LAYER => {
                    let arrows = map.spawn_arrows(&layer);
                    log::info!("layer '{}': spawned {} arrows", layer.name(), arrows);
                    layer.clear_tiles();
                    layer.collidable = false;
                    map.layers.push(layer);
                }
                _ => {
                    // Plain layers (including the slow layer) stay static
                    map.layers.push(layer);
                }
            }
        }

        map
    }

    /// Convert arrow-layer tiles into respawning arrow projectiles.
    /// Direction comes from the spawn cell: left half of the map fires
    /// right, right half fires left, with a vertical bias for the top and
    /// bottom rows.
    fn spawn_arrows(&mut self, layer: &Layer) -> usize {
        let mut count = 0;
        for (x, y, tile) in layer.iter_tiles() {
            let cell = tile.bounds;
            let bounds = Aabb::new(
                cell.left() + (cell.size.x - ARROW_WIDTH) / 2.0,
                cell.top() + (cell.size.y - ARROW_HEIGHT) / 2.0,
                ARROW_WIDTH,
                ARROW_HEIGHT,
            );

            let vx = if x < self.width / 2 {
                ARROW_SPEED
            } else {
                -ARROW_SPEED
            };
            let vy = if y < self.height / 4 {
                ARROW_SPEED * 0.5
            } else if y > self.height * 3 / 4 {
                -ARROW_SPEED * 0.5
            } else {
                0.0
            };

            self.projectiles.push(
                Projectile::new(ProjectileKind::Arrow, bounds, tile.sprite)
                    .with_velocity(Vec2::new(vx, vy)),
            );
            count += 1;
        }
        count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_w, self.tile_h)
    }

    pub fn player_start(&self) -> Option<Vec2> {
        self.player_start
    }

    /// The playfield rect in world pixels
    pub fn world_bounds(&self) -> Aabb {
        Aabb::new(
            0.0,
            0.0,
            self.width as f32 * self.tile_w,
            self.height as f32 * self.tile_h,
        )
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    /// All static colliders near a rect: grid tiles from collidable layers
    /// via the spatial index, plus the (few) disappearing platforms scanned
    /// linearly with a collidability filter.
    pub fn statics_in_rect(&self, rect: &Aabb) -> Vec<StaticHandle> {
        let mut out = Vec::new();
        for (li, layer) in self.layers.iter().enumerate() {
            if !layer.collidable {
                continue;
            }
            for (x, y) in layer.tiles_in_rect(rect) {
                out.push(StaticHandle::Tile { layer: li, x, y });
            }
        }
        for (pi, platform) in self.disappearing.iter().enumerate() {
            if !platform.can_collide() {
                continue;
            }
            if overlaps(&platform.collision_bounds(), rect) {
                out.push(StaticHandle::Platform(pi));
            }
        }
        out
    }

    /// Collision bounds for a handle. None when the slot has emptied since
    /// the query, so stale handles are skippable rather than fatal.
    pub fn static_bounds(&self, handle: StaticHandle) -> Option<Aabb> {
        match handle {
            StaticHandle::Tile { layer, x, y } => self
                .layers
                .get(layer)
                .and_then(|l| l.tile(x, y))
                .map(|t| t.collision_bounds()),
            StaticHandle::Platform(i) => self.disappearing.get(i).map(|p| p.collision_bounds()),
        }
    }

    pub fn tile_kind(&self, handle: StaticHandle) -> Option<TileKind> {
        match handle {
            StaticHandle::Tile { layer, x, y } => {
                self.layers.get(layer).and_then(|l| l.tile(x, y)).map(|t| t.kind)
            }
            StaticHandle::Platform(_) => None,
        }
    }

    /// Does the rect touch any tile of the named layer? Used for the slow
    /// status effect. Non-collidable layers apply no effect.
    pub fn rect_on_layer(&self, rect: &Aabb, name: &str) -> bool {
        self.layer(name)
            .is_some_and(|layer| layer.collidable && !layer.tiles_in_rect(rect).is_empty())
    }

    /// Trap-layer test with a real hitbox check: the grid query is coarse,
    /// the reduced trap boxes decide.
    pub fn rect_on_trap(&self, rect: &Aabb) -> bool {
        let Some(layer) = self.layer(TRAPS_LAYER) else {
            return false;
        };
        layer.tiles_in_rect(rect).iter().any(|&(x, y)| {
            layer
                .tile(x, y)
                .is_some_and(|t| t.kind == TileKind::Trap && overlaps(rect, &t.collision_bounds()))
        })
    }

    pub fn update_projectiles(&mut self, dt: f32) {
        let world = self.world_bounds();
        for projectile in &mut self.projectiles {
            projectile.update(dt, &world);
        }
    }

    pub fn update_disappearing(&mut self, dt: f32) {
        for platform in &mut self.disappearing {
            platform.update(dt);
        }
    }

    /// Prune sweep. Must run strictly after all collision dispatch for the
    /// tick so no handle is invalidated mid-resolution.
    pub fn remove_dead_projectiles(&mut self) {
        self.projectiles.retain(|p| !p.should_be_removed());
    }
}

/// Convenience used by tests and embedders needing a minimal solid world
impl Map {
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }
}
