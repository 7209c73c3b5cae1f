//! one‑shot world creation: terrain → caves → starter clearing → trees →
//! veins → starter roots, or a bulk import of previously exported layers
use bevy::log::info;
use bevy::prelude::*;

use crate::block::{BlockKind, VariantTable};
use crate::caves::carve_caves;
use crate::clusters::{grow_clusters, ClusterSpec};
use crate::config::{Span, TerrainConfig, TreeConfig, WorldConfig};
use crate::error::{Result, WorldError};
use crate::grid::{BlockGrid, Layer, LayerIds};
use crate::rng::TileRng;
use crate::terrain::generate_terrain;

/// Recommended player spawn cell (always empty, with an empty cell above).
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
}

/* ===========================================================
   standard vein table
   =========================================================== */
/// Vein passes in priority order: later passes may overwrite earlier ones.
pub fn standard_veins(t: &TerrainConfig) -> Vec<ClusterSpec> {
    use BlockKind::*;
    let (sky, cold, rock, hot) = (t.sky_limit, t.cold_limit, t.rock_limit, t.hot_limit);
    let s = Span::new;

    vec![
        /* snow layer */
        ClusterSpec::new(Ice, sky, cold, s(8, 21), s(10, 24))
            .with_core(IceCrystal)
            .allow_air(),
        ClusterSpec::new(FrostironOre, sky + 26, cold, s(30, 40), s(2, 6)),
        ClusterSpec::new(CryoriteOre, sky + 6, sky + 20, s(20, 25), s(1, 4)),
        ClusterSpec::new(Quartz, sky + 6, cold, s(8, 12), s(1, 2))
            .hosted_in([Permafrost, IceStone]),
        /* stone layer */
        ClusterSpec::new(StoneVine, cold, rock, s(30, 50), s(1, 4)),
        ClusterSpec::new(Root, cold, rock, s(26, 36), s(12, 24))
            .with_core(Resin)
            .allow_air(),
        ClusterSpec::new(CoalOre, cold, rock, s(40, 60), s(4, 12)),
        ClusterSpec::new(BronzeOre, cold, rock, s(30, 40), s(2, 6)),
        ClusterSpec::new(SteelOre, cold, rock, s(20, 25), s(1, 4)),
        ClusterSpec::new(FossilGlass, cold, rock, s(8, 12), s(1, 2)),
        /* lava layer */
        ClusterSpec::new(GlowstoneVein, rock, hot, s(26, 36), s(12, 24)),
        ClusterSpec::new(BrimshardOre, rock, rock + 26, s(30, 40), s(2, 6)),
        ClusterSpec::new(EmbersteelOre, rock + 26, hot, s(20, 25), s(1, 4)),
        ClusterSpec::new(Gemstone, rock, hot, s(8, 12), s(1, 2)),
    ]
}

/* ===========================================================
   surface & starter passes
   =========================================================== */
/// Frostpine trees on intact snow surfaces. Returns how many were planted.
fn plant_trees<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    hills: &[i32],
    cfg: &TreeConfig,
    rng: &mut R,
) -> Result<u32> {
    let w = grid.width() as i32;
    let canopy_rows = cfg.canopy.len() as i32;
    let mut planted = 0;
    let mut x = 2;

    while x < w - 2 {
        if !rng.chance(cfg.chance) {
            x += 1;
            continue;
        }

        /* surface may have been carved: look upward for snow */
        let mut base = hills[x as usize];
        while base > 0 && grid.foreground(x, base)? != Some(BlockKind::Snow) {
            base -= 1;
        }
        if base <= 0 || grid.foreground(x, base)? != Some(BlockKind::Snow) {
            x += 1;
            continue;
        }

        /* trunk + canopy must fit above the surface */
        let tallest = cfg.trunk.max.min(base - canopy_rows);
        if tallest < cfg.trunk.min {
            x += 1;
            continue;
        }
        let trunk = rng.range_inclusive(cfg.trunk.min, tallest);
        for i in 1..=trunk {
            grid.set_foreground(x, base - i, Some(BlockKind::IceWood))?;
        }

        let top = base - trunk;
        for (i, &row_width) in cfg.canopy.iter().enumerate() {
            let ly = top - (i as i32 + 1);
            if ly < 0 {
                break;
            }
            let r = row_width / 2;
            for lx in (x - r).max(0)..=(x + r).min(w - 1) {
                if grid.foreground(lx, ly)?.is_none() {
                    grid.set_foreground(lx, ly, Some(BlockKind::IceLeaves))?;
                }
            }
        }

        planted += 1;
        x += cfg.spacing + 1;
    }
    Ok(planted)
}

/// clearing bounds: `(sx, sy, ex, ey)`, core is `[sx,ex)×[sy,ey)`
fn starter_rect(config: &WorldConfig) -> (i32, i32, i32, i32) {
    let (cx, cy) = config.starter_center();
    let s = &config.starter;
    let sx = cx - s.width / 2;
    let sy = cy - s.height / 2;
    (sx, sy, sx + s.width, sy + s.height)
}

/// rectangle cleared outright, one‑cell rim eroded at random
fn carve_starter<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    config: &WorldConfig,
    rng: &mut R,
) -> Result<()> {
    let (sx, sy, ex, ey) = starter_rect(config);
    for x in sx - 1..=ex {
        for y in sy - 1..=ey {
            if !grid.in_bounds(x, y) {
                continue;
            }
            let core = (sx..ex).contains(&x) && (sy..ey).contains(&y);
            if core || rng.chance(config.starter.erosion_chance) {
                grid.set_foreground(x, y, None)?;
            }
        }
    }
    Ok(())
}

/// ironroot blob under the clearing, a root tip, two glowcaps and the spawn cell
fn plant_starter_roots<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    config: &WorldConfig,
    rng: &mut R,
) -> Result<SpawnPoint> {
    let (cx, _) = config.starter_center();
    let (_, _, _, floor) = starter_rect(config);

    for dx in -1..=1 {
        for dy in 0..config.starter.root_depth {
            if rng.chance(config.starter.root_chance) {
                grid.set_foreground(cx + dx, floor + dy, Some(BlockKind::Root))?;
            }
        }
    }
    grid.set_foreground(cx, floor - 1, Some(BlockKind::Root))?;
    grid.set_foreground(cx, floor - 2, Some(BlockKind::YellowMushroom))?;
    grid.set_foreground(cx + 2, floor - 1, Some(BlockKind::YellowMushroom))?;

    let spawn = SpawnPoint { x: cx + 1, y: floor - 1 };
    grid.set_foreground(spawn.x, spawn.y, None)?;
    grid.set_foreground(spawn.x, spawn.y - 1, None)?;
    Ok(spawn)
}

/* ===========================================================
   entry points
   =========================================================== */
fn check_dimensions(grid: &BlockGrid, config: &WorldConfig) -> Result<()> {
    if grid.width() != config.width || grid.height() != config.height {
        return Err(WorldError::DimensionMismatch {
            expected: (config.width, config.height),
            found: (grid.width(), grid.height()),
        });
    }
    Ok(())
}

/// Builds a brand‑new world into `grid` and returns the spawn cell.
///
/// The whole config is validated first and the world is built off to the
/// side, so on error `grid` is left exactly as it was.
pub fn generate<R: TileRng + ?Sized>(
    grid: &mut BlockGrid,
    rng: &mut R,
    config: &WorldConfig,
) -> Result<SpawnPoint> {
    let variants = VariantTable::standard();
    check_dimensions(grid, config)?;
    config.validate(&variants)?;

    let mut work = BlockGrid::new(config.width, config.height);

    let hills = generate_terrain(&mut work, &config.terrain, rng)?;
    info!("world gen: terrain {}x{}", config.width, config.height);

    let caves = carve_caves(&mut work, &config.caves, &config.terrain, rng)?;
    info!(
        "world gen: {} tunnels, {} ravines, {} stalactites, {} glowcaps",
        caves.tunnels, caves.ravines, caves.ceiling_decorations, caves.floor_decorations
    );

    carve_starter(&mut work, config, rng)?;
    let trees = plant_trees(&mut work, &hills, &config.trees, rng)?;
    info!("world gen: {trees} trees");

    let mut clusters = 0;
    for vein in config.veins() {
        clusters += grow_clusters(&mut work, &vein, &variants, rng)?.clusters.len();
    }
    info!("world gen: {clusters} clusters");

    let spawn = plant_starter_roots(&mut work, config, rng)?;
    info!("world gen: spawn at ({}, {})", spawn.x, spawn.y);

    *grid = work;
    Ok(spawn)
}

/// Loads a saved world: both layers decode or neither is applied.
pub fn import_world(grid: &mut BlockGrid, foreground: &LayerIds, background: &LayerIds) -> Result<()> {
    let mut work = BlockGrid::new(grid.width(), grid.height());
    work.import_layer(Layer::Foreground, foreground)?;
    work.import_layer(Layer::Background, background)?;
    *grid = work;
    info!("world import: {}x{}", grid.width(), grid.height());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{scripted::ScriptedRng, world_rng};

    #[test]
    fn standard_veins_validate_against_default_bands() {
        let variants = VariantTable::standard();
        for vein in standard_veins(&TerrainConfig::default()) {
            vein.validate(149, 149, &variants).unwrap();
        }
    }

    #[test]
    fn starter_clearing_core_is_open() {
        let config = WorldConfig::default();
        let mut grid = BlockGrid::new(config.width, config.height);
        for y in 0..config.height as i32 {
            for x in 0..config.width as i32 {
                grid.set_foreground(x, y, Some(BlockKind::Stone)).unwrap();
            }
        }
        // draw 99: no rim erosion
        carve_starter(&mut grid, &config, &mut ScriptedRng::repeat(99)).unwrap();
        let (sx, sy, ex, ey) = starter_rect(&config);
        for x in sx - 1..=ex {
            for y in sy - 1..=ey {
                let core = (sx..ex).contains(&x) && (sy..ey).contains(&y);
                assert_eq!(grid.foreground(x, y).unwrap().is_none(), core);
            }
        }
    }

    #[test]
    fn starter_roots_and_spawn() {
        let config = WorldConfig::default();
        let mut grid = BlockGrid::new(config.width, config.height);
        // draw 0: every root roll hits
        let spawn = plant_starter_roots(&mut grid, &config, &mut ScriptedRng::repeat(0)).unwrap();
        let (cx, _) = config.starter_center();
        let (_, _, _, floor) = starter_rect(&config);

        assert_eq!(spawn, SpawnPoint { x: cx + 1, y: floor - 1 });
        assert_eq!(grid.foreground(spawn.x, spawn.y).unwrap(), None);
        assert_eq!(grid.foreground(spawn.x, spawn.y - 1).unwrap(), None);
        assert_eq!(grid.foreground(spawn.x, floor).unwrap(), Some(BlockKind::Root));
        assert_eq!(grid.foreground(cx, floor - 1).unwrap(), Some(BlockKind::Root));
        assert_eq!(grid.foreground(cx, floor - 2).unwrap(), Some(BlockKind::YellowMushroom));
        assert_eq!(grid.foreground(cx + 2, floor - 1).unwrap(), Some(BlockKind::YellowMushroom));
    }

    #[test]
    fn trees_grow_on_flat_snow() {
        let mut grid = BlockGrid::new(20, 30);
        let hills = vec![14; 20];
        for x in 0..20 {
            grid.set_foreground(x, 14, Some(BlockKind::Snow)).unwrap();
        }
        let cfg = TreeConfig::default();
        // draw 0: every column rolls a tree with the shortest trunk
        let planted = plant_trees(&mut grid, &hills, &cfg, &mut ScriptedRng::repeat(0)).unwrap();

        // x = 2, 8, 14 (spacing 5 + 1)
        assert_eq!(planted, 3);
        for x in [2, 8, 14] {
            for y in 10..14 {
                assert_eq!(grid.foreground(x, y).unwrap(), Some(BlockKind::IceWood));
            }
            assert_eq!(grid.foreground(x, 9).unwrap(), Some(BlockKind::IceLeaves));
            assert_eq!(grid.foreground(x - 2, 8).unwrap(), Some(BlockKind::IceLeaves));
            assert_eq!(grid.foreground(x, 5).unwrap(), Some(BlockKind::IceLeaves));
            assert_eq!(grid.foreground(x, 4).unwrap(), None);
        }
    }

    #[test]
    fn generation_is_reproducible() {
        let config = WorldConfig::default();
        let mut a = BlockGrid::new(config.width, config.height);
        let mut b = BlockGrid::new(config.width, config.height);
        let sa = generate(&mut a, &mut world_rng(Some(99)), &config).unwrap();
        let sb = generate(&mut b, &mut world_rng(Some(99)), &config).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a, b);
    }

    #[test]
    fn failed_generation_leaves_grid_untouched() {
        let mut config = WorldConfig::default();
        config.caves.tunnel_length = Span::new(10, 5);
        let mut grid = BlockGrid::new(config.width, config.height);
        grid.set_foreground(3, 3, Some(BlockKind::Torch)).unwrap();
        let before = grid.clone();

        assert!(matches!(
            generate(&mut grid, &mut world_rng(Some(1)), &config),
            Err(WorldError::InvalidConfiguration(_))
        ));
        assert_eq!(grid, before);

        let mut small = BlockGrid::new(10, 10);
        assert!(matches!(
            generate(&mut small, &mut world_rng(Some(1)), &WorldConfig::default()),
            Err(WorldError::DimensionMismatch {
                expected: (149, 149),
                found: (10, 10),
            })
        ));
    }

    #[test]
    fn import_is_all_or_nothing() {
        let config = WorldConfig::default();
        let mut source = BlockGrid::new(config.width, config.height);
        generate(&mut source, &mut world_rng(Some(5)), &config).unwrap();
        let fg = source.export_layer(Layer::Foreground);
        let bg = source.export_layer(Layer::Background);

        let mut target = BlockGrid::new(config.width, config.height);
        let mut broken = bg.clone();
        broken[0][0] = u16::MAX;
        assert!(import_world(&mut target, &fg, &broken).is_err());
        assert_eq!(target, BlockGrid::new(config.width, config.height));

        import_world(&mut target, &fg, &bg).unwrap();
        assert_eq!(target, source);
    }
}
