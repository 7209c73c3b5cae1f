//! terrain pass: random‑walk hill profile + layered bands
//!
//! Row‑0 is the top of the world. The hill profile is the snow line for each
//! column; the cold band measures depth from it, every band below is absolute.

use bevy::log::debug;

use crate::block::BlockKind;
use crate::config::TerrainConfig;
use crate::error::{invalid, Result};
use crate::grid::BlockGrid;
use crate::rng::TileRng;

/* ===========================================================
   hill profile
   =========================================================== */
/// Bounded random walk: column 0 starts at `max_h`, every next column moves
/// ±1 with 10% chance each way and is clamped to `[min_h, max_h]`.
pub fn height_profile<R: TileRng + ?Sized>(
    width: usize,
    min_h: i32,
    max_h: i32,
    rng: &mut R,
) -> Result<Vec<i32>> {
    if min_h > max_h {
        return Err(invalid(format!("hill range [{min_h}, {max_h}] is empty")));
    }

    let mut heights = Vec::with_capacity(width);
    let mut h = max_h;
    for x in 0..width {
        if x > 0 {
            let step = match rng.next_int(10) {
                0 => 1,
                1 => -1,
                _ => 0,
            };
            h = (h + step).clamp(min_h, max_h);
        }
        heights.push(h);
    }
    Ok(heights)
}

/* ===========================================================
   band fill
   =========================================================== */
/// `to` with linearly increasing probability across a `width`‑row window
#[inline]
fn fade<R: TileRng + ?Sized>(
    from: BlockKind,
    to: BlockKind,
    into: i32,
    width: i32,
    rng: &mut R,
) -> BlockKind {
    let percent = into * 100 / width;
    if rng.chance(percent) {
        to
    } else {
        from
    }
}

/// cold band: snow → permafrost → frost stone by depth under the snow line
fn cold_kind<R: TileRng + ?Sized>(depth: i32, cfg: &TerrainConfig, rng: &mut R) -> BlockKind {
    let snow_end = cfg.snow_depth + cfg.snow_fade;
    let frost_end = cfg.permafrost_depth + cfg.permafrost_fade;

    if depth < cfg.snow_depth {
        BlockKind::Snow
    } else if depth < snow_end {
        fade(
            BlockKind::Snow,
            BlockKind::Permafrost,
            depth - cfg.snow_depth,
            cfg.snow_fade,
            rng,
        )
    } else if depth < cfg.permafrost_depth {
        BlockKind::Permafrost
    } else if depth < frost_end {
        fade(
            BlockKind::Permafrost,
            BlockKind::IceStone,
            depth - cfg.permafrost_depth,
            cfg.permafrost_fade,
            rng,
        )
    } else {
        BlockKind::IceStone
    }
}

/// single‑row seam: either neighbour with equal odds
#[inline]
fn seam<R: TileRng + ?Sized>(above: BlockKind, below: BlockKind, rng: &mut R) -> BlockKind {
    if rng.next_int(2) == 0 {
        above
    } else {
        below
    }
}

fn band_kind<R: TileRng + ?Sized>(
    y: i32,
    hill: i32,
    last_row: i32,
    cfg: &TerrainConfig,
    rng: &mut R,
) -> Option<BlockKind> {
    if y < cfg.sky_limit {
        (y >= hill).then_some(BlockKind::Snow)
    } else if y < cfg.cold_limit {
        Some(cold_kind(y - hill, cfg, rng))
    } else if y == cfg.cold_limit {
        Some(seam(BlockKind::IceStone, BlockKind::Stone, rng))
    } else if y < cfg.rock_limit {
        Some(BlockKind::Stone)
    } else if y == cfg.rock_limit {
        Some(seam(BlockKind::Stone, BlockKind::Basalt, rng))
    } else if y < cfg.hot_limit {
        Some(BlockKind::Basalt)
    } else if y == last_row {
        Some(BlockKind::Bedrock)
    } else {
        None
    }
}

/* ===========================================================
   pass entry point
   =========================================================== */
/// Fills the foreground from the bands, then copies it into the background.
/// Returns the hill profile for later surface passes.
pub fn generate_terrain<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    cfg: &TerrainConfig,
    rng: &mut R,
) -> Result<Vec<i32>> {
    cfg.validate(grid.height())?;

    let hills = height_profile(grid.width(), cfg.min_hill, cfg.max_hill, rng)?;
    let last_row = grid.height() as i32 - 1;

    for y in 0..grid.height() as i32 {
        for (x, &hill) in hills.iter().enumerate() {
            let kind = band_kind(y, hill, last_row, cfg, rng);
            grid.set_foreground(x as i32, y, kind)?;
        }
    }
    grid.copy_foreground_to_background();

    debug!(
        "terrain: {}x{} filled, hills {}..={}",
        grid.width(),
        grid.height(),
        hills.iter().min().copied().unwrap_or_default(),
        hills.iter().max().copied().unwrap_or_default(),
    );
    Ok(hills)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Layer;
    use crate::rng::{scripted::ScriptedRng, world_rng};

    #[test]
    fn profile_stays_in_bounds() {
        let mut rng = world_rng(Some(11));
        let hills = height_profile(1_000, 5, 14, &mut rng).unwrap();
        assert_eq!(hills.len(), 1_000);
        assert_eq!(hills[0], 14);
        assert!(hills.iter().all(|h| (5..=14).contains(h)));
        assert!(hills.windows(2).all(|w| (w[0] - w[1]).abs() <= 1));
    }

    #[test]
    fn profile_clamps_a_one_sided_walk() {
        // draw 0 always steps +1: pinned at max
        let hills = height_profile(50, 2, 9, &mut ScriptedRng::repeat(0)).unwrap();
        assert!(hills.iter().all(|&h| h == 9));
        // draw 1 always steps -1: walks down to min and stays
        let hills = height_profile(50, 2, 9, &mut ScriptedRng::repeat(1)).unwrap();
        assert_eq!(&hills[..8], &[9, 8, 7, 6, 5, 4, 3, 2]);
        assert!(hills[8..].iter().all(|&h| h == 2));
    }

    #[test]
    fn inverted_profile_range_fails() {
        let mut rng = world_rng(Some(1));
        assert!(height_profile(10, 8, 3, &mut rng).is_err());
    }

    #[test]
    fn invalid_config_writes_nothing() {
        let mut grid = BlockGrid::new(20, 149);
        let cfg = TerrainConfig {
            cold_limit: 5,
            ..TerrainConfig::default()
        };
        assert!(generate_terrain(&mut grid, &cfg, &mut world_rng(Some(3))).is_err());
        assert_eq!(grid, BlockGrid::new(20, 149));
    }

    #[test]
    fn bands_and_background_copy() {
        let cfg = TerrainConfig::default();
        let mut grid = BlockGrid::new(40, 149);
        let hills = generate_terrain(&mut grid, &cfg, &mut world_rng(Some(5))).unwrap();

        for (x, &hill) in hills.iter().enumerate() {
            let x = x as i32;
            assert_eq!(grid.foreground(x, hill - 1).unwrap(), None);
            assert_eq!(grid.foreground(x, hill).unwrap(), Some(BlockKind::Snow));
            assert_eq!(grid.foreground(x, cfg.cold_limit + 1).unwrap(), Some(BlockKind::Stone));
            assert_eq!(grid.foreground(x, cfg.rock_limit + 1).unwrap(), Some(BlockKind::Basalt));
            assert_eq!(grid.foreground(x, 148).unwrap(), Some(BlockKind::Bedrock));
            assert!(matches!(
                grid.foreground(x, cfg.cold_limit).unwrap(),
                Some(BlockKind::IceStone | BlockKind::Stone)
            ));
            assert!(matches!(
                grid.foreground(x, cfg.rock_limit).unwrap(),
                Some(BlockKind::Stone | BlockKind::Basalt)
            ));
            // deep in the cold band everything has turned to frost stone
            assert_eq!(
                grid.foreground(x, hill + cfg.permafrost_depth + cfg.permafrost_fade).unwrap(),
                Some(BlockKind::IceStone)
            );
        }
        assert_eq!(
            grid.export_layer(Layer::Foreground),
            grid.export_layer(Layer::Background)
        );
    }

    #[test]
    fn fade_window_is_linear() {
        let cfg = TerrainConfig::default();
        // first row of the window never fades, a draw of 99 never fades
        assert_eq!(
            cold_kind(cfg.snow_depth, &cfg, &mut ScriptedRng::repeat(0)),
            BlockKind::Snow
        );
        assert_eq!(
            cold_kind(cfg.snow_depth + 3, &cfg, &mut ScriptedRng::repeat(99)),
            BlockKind::Snow
        );
        // 75% at the last row of a 4‑row window
        assert_eq!(
            cold_kind(cfg.snow_depth + 3, &cfg, &mut ScriptedRng::repeat(74)),
            BlockKind::Permafrost
        );
        assert_eq!(
            cold_kind(cfg.snow_depth + cfg.snow_fade, &cfg, &mut ScriptedRng::repeat(0)),
            BlockKind::Permafrost
        );
    }
}
