//! cave pass: wandering tunnels, ravines & their decorations
//!
//! Only the foreground is carved; the background keeps the pre‑carve wall.
//! The last row (bedrock) is never cleared.

use bevy::log::debug;

use crate::config::{CaveConfig, TerrainConfig};
use crate::error::Result;
use crate::grid::BlockGrid;
use crate::rng::TileRng;

/// What a cave pass left behind, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaveStats {
    pub tunnels: u32,
    pub ravines: u32,
    pub ceiling_decorations: u32,
    pub floor_decorations: u32,
}

/* ===========================================================
   tunnels
   =========================================================== */
/// Carves `cfg.tunnels` horizontal tunnels, three rows tall, jogging ±1.
fn carve_tunnels<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    cfg: &CaveConfig,
    rng: &mut R,
    stats: &mut CaveStats,
) -> Result<()> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let count = cfg.tunnels.roll(rng);

    for _ in 0..count {
        let length = cfg.tunnel_length.roll(rng);
        let start_x = rng.next_int(w - length);
        let mut cy = rng.next_int(h - 3) + 1;

        for x in start_x..start_x + length {
            /* 3‑row slice, never the bedrock row */
            grid.set_foreground(x, cy, None)?;
            if cy > 0 {
                grid.set_foreground(x, cy - 1, None)?;
            }
            if cy + 1 < h - 1 {
                grid.set_foreground(x, cy + 1, None)?;
            }

            if rng.chance(cfg.ceiling_chance) && decorate_ceiling(grid, cfg, x, cy)? {
                stats.ceiling_decorations += 1;
            }
            if rng.chance(cfg.floor_chance) && decorate_floor(grid, cfg, x, cy, rng)? {
                stats.floor_decorations += 1;
            }

            /* organic curvature */
            match rng.next_int(cfg.jog_odds) {
                0 if cy > 1 => cy -= 1,
                1 if cy < h - 2 => cy += 1,
                _ => {}
            }
        }
        stats.tunnels += 1;
    }
    Ok(())
}

/// hang `ceiling_decoration` under the first solid cell above the slice
fn decorate_ceiling(grid: &mut BlockGrid, cfg: &CaveConfig, x: i32, cy: i32) -> Result<bool> {
    let mut scan = cy - 2;
    while scan >= 0 && grid.foreground(x, scan)?.is_none() {
        scan -= 1;
    }
    if scan < 0 {
        return Ok(false);
    }
    let Some(ceiling) = grid.foreground(x, scan)? else {
        return Ok(false);
    };
    if !cfg.ceiling_hosts.contains(&ceiling) || grid.foreground(x, scan + 1)?.is_some() {
        return Ok(false);
    }
    grid.set_foreground(x, scan + 1, Some(cfg.ceiling_decoration))?;
    Ok(true)
}

/// grow a floor decoration on an eligible cell two rows below the centre
fn decorate_floor<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    cfg: &CaveConfig,
    x: i32,
    cy: i32,
    rng: &mut R,
) -> Result<bool> {
    let floor_y = cy + 2;
    if floor_y >= grid.height() as i32 {
        return Ok(false);
    }
    let on_host = grid
        .foreground(x, floor_y)?
        .is_some_and(|k| cfg.floor_hosts.contains(&k));
    if !on_host || grid.foreground(x, floor_y - 1)?.is_some() {
        return Ok(false);
    }
    let pick = rng.next_int(cfg.floor_decorations.len() as i32) as usize;
    grid.set_foreground(x, floor_y - 1, Some(cfg.floor_decorations[pick]))?;
    Ok(true)
}

/* ===========================================================
   ravines
   =========================================================== */
/// Carves `cfg.ravines` downward shafts starting inside `[sky_limit, hot_limit)`.
fn carve_ravines<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    cfg: &CaveConfig,
    bands: &TerrainConfig,
    rng: &mut R,
    stats: &mut CaveStats,
) -> Result<()> {
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    let count = cfg.ravines.roll(rng);

    for _ in 0..count {
        let mut rx = rng.next_int(w);
        let depth = cfg.ravine_depth.roll(rng);
        let mut half = cfg.ravine_half_width.roll(rng);
        let start_y = rng.next_int(bands.hot_limit - bands.sky_limit) + bands.sky_limit;

        for y in start_y..start_y + depth {
            if y >= h - 1 {
                break; // bedrock
            }
            for x in (rx - half).max(0)..=(rx + half).min(w - 1) {
                grid.set_foreground(x, y, None)?;
            }

            let nx = rx + rng.next_int(3) - 1;
            if nx > 0 && nx < w - 1 {
                rx = nx;
            }
            half = (half + rng.next_int(3) - 1).clamp(cfg.ravine_drift.min, cfg.ravine_drift.max);
        }
        stats.ravines += 1;
    }
    Ok(())
}

/// Validated entry point: tunnels first, then ravines.
pub fn carve_caves<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    cfg: &CaveConfig,
    bands: &TerrainConfig,
    rng: &mut R,
) -> Result<CaveStats> {
    cfg.validate(grid.width(), grid.height())?;
    bands.validate(grid.height())?;

    let mut stats = CaveStats::default();
    carve_tunnels(grid, cfg, rng, &mut stats)?;
    carve_ravines(grid, cfg, bands, rng, &mut stats)?;
    debug!("caves: {stats:?}");
    Ok(stats)
}
