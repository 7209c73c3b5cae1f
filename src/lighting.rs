//! light field – multi‑source flood fill, rebuilt from scratch every tick
//!
//! Seeds: emitting foreground blocks at their emission, cells open in both
//! layers at full strength, plus an optional glow source. Light leaves an
//! origin cell undimmed, then loses 3 entering a block, 1 entering a walled
//! cell and nothing entering open sky.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::components::{Glow, GridPosition};
use crate::constants::{MAX_LIGHT, SHADE_DECAY, SKY_LIGHT, SOLID_DECAY};
use crate::grid::BlockGrid;

/// Dynamic point light, e.g. the player's glow stat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowSource {
    pub x: i32,
    pub y: i32,
    pub glow: f32,
}

impl GlowSource {
    /// `min(10, floor(glow))`, `None` when it would not light anything
    fn level(&self) -> Option<u8> {
        if self.glow >= 1.0 {
            Some(self.glow.min(MAX_LIGHT as f32) as u8)
        } else {
            None
        }
    }
}

/* ===========================================================
   LightField resource
   =========================================================== */
#[derive(Resource, Clone, Debug, Default)]
pub struct LightField {
    width: usize,
    height: usize,
    levels: Vec<u8>,
    queue: VecDeque<usize>,
}

impl PartialEq for LightField {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.levels == other.levels
    }
}

impl Eq for LightField {}

/// 4‑neighbourhood: +x, -x, +y, -y
const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl LightField {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            levels: vec![0; width * height],
            queue: VecDeque::new(),
        }
    }

    /// computed levels, row‑major
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    /// Light at a cell: 0 out of range, full strength when open in both
    /// layers, otherwise the last computed value.
    pub fn light_at(&self, grid: &BlockGrid, x: i32, y: i32) -> u8 {
        if !grid.in_bounds(x, y) {
            return 0;
        }
        let i = grid.idx(x as usize, y as usize);
        if grid.open_at(i) {
            return SKY_LIGHT;
        }
        self.levels.get(i).copied().unwrap_or(0)
    }

    /// Rebuilds the whole field from `grid`.
    pub fn recompute(&mut self, grid: &BlockGrid, glow: Option<GlowSource>) {
        let (w, h) = (grid.width(), grid.height());
        self.width = w;
        self.height = h;
        self.levels.clear();
        self.levels.resize(w * h, 0);
        self.queue.clear();

        /* ---------- seed ---------- */
        for x in 0..w {
            for y in 0..h {
                let i = grid.idx(x, y);
                let seed = seed_level(grid, i);
                if seed > 0 {
                    self.levels[i] = seed;
                    self.queue.push_back(i);
                }
            }
        }

        if let Some(source) = glow {
            if let Some(g) = source.level() {
                if grid.in_bounds(source.x, source.y) {
                    let i = grid.idx(source.x as usize, source.y as usize);
                    if g > self.levels[i] {
                        self.levels[i] = g;
                        self.queue.push_back(i);
                    }
                }
            }
        }

        /* ---------- propagate ---------- */
        while let Some(u) = self.queue.pop_front() {
            let lx = self.levels[u];
            let origin = is_origin(grid, u, lx);
            let (ux, uy) = ((u % w) as i32, (u / w) as i32);

            for (dx, dy) in DIRS {
                let (nx, ny) = (ux + dx, uy + dy);
                if !grid.in_bounds(nx, ny) {
                    continue;
                }
                let v = grid.idx(nx as usize, ny as usize);
                let decay = if origin {
                    0
                } else if grid.fg_at(v).is_some() {
                    SOLID_DECAY
                } else if grid.open_at(v) {
                    0
                } else {
                    SHADE_DECAY
                };
                let candidate = lx.saturating_sub(decay);
                if candidate > self.levels[v] {
                    self.levels[v] = candidate;
                    self.queue.push_back(v);
                }
            }
        }
    }
}

/// value a cell would hold with no neighbours
#[inline]
fn seed_level(grid: &BlockGrid, i: usize) -> u8 {
    match grid.fg_at(i) {
        Some(kind) => kind.light_emission(),
        None if grid.open_at(i) => SKY_LIGHT,
        None => 0,
    }
}

/// the cell still holds exactly its own source value (not relayed light)
#[inline]
fn is_origin(grid: &BlockGrid, i: usize, lx: u8) -> bool {
    match grid.fg_at(i) {
        Some(kind) => kind.light_emission() == lx,
        None => grid.open_at(i) && lx == SKY_LIGHT,
    }
}

/* ===========================================================
   system
   =========================================================== */
/// PreUpdate: every reader in Update sees this tick's light
pub fn recompute_light_system(
    grid: Res<BlockGrid>,
    mut light: ResMut<LightField>,
    glow_q: Query<(&GridPosition, &Glow)>,
) {
    let glow = glow_q.get_single().ok().map(|(pos, glow)| GlowSource {
        x: pos.x,
        y: pos.y,
        glow: glow.0,
    });
    light.recompute(&grid, glow);
}
