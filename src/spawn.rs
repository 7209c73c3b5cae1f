//! creature placement predicate
//!
//! Positions are world pixels, top‑left of the hitbox, `TILE_SIZE` pixels per
//! cell. Nothing here mutates the world.

use crate::block::BlockKind;
use crate::constants::TILE_SIZE;
use crate::grid::BlockGrid;
use crate::lighting::LightField;

/// Where a creature may appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnRule {
    /// hitbox in pixels
    pub hitbox_w: i32,
    pub hitbox_h: i32,
    /// the cell under the hitbox's horizontal centre must be one of these
    pub surfaces: &'static [BlockKind],
    /// inclusive light band at that surface cell
    pub min_light: u8,
    pub max_light: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Creature {
    PolarBear,
    Bat,
    BlackBear,
}

impl Creature {
    pub const ALL: [Creature; 3] = [Creature::PolarBear, Creature::Bat, Creature::BlackBear];

    pub const fn spawn_rule(self) -> SpawnRule {
        match self {
            /* 160x128 sheet, cropped */
            Creature::PolarBear => SpawnRule {
                hitbox_w: 84,
                hitbox_h: 42,
                surfaces: &[BlockKind::Snow, BlockKind::Permafrost],
                min_light: 4,
                max_light: 10,
            },
            Creature::Bat => SpawnRule {
                hitbox_w: 64,
                hitbox_h: 64,
                surfaces: &[BlockKind::Stone, BlockKind::Basalt],
                min_light: 0,
                max_light: 5,
            },
            Creature::BlackBear => SpawnRule {
                hitbox_w: 84,
                hitbox_h: 42,
                surfaces: &[BlockKind::Basalt],
                min_light: 0,
                max_light: 5,
            },
        }
    }
}

/* ===========================================================
   validator
   =========================================================== */
pub struct SpawnValidator<'a> {
    grid: &'a BlockGrid,
    light: &'a LightField,
}

impl<'a> SpawnValidator<'a> {
    pub fn new(grid: &'a BlockGrid, light: &'a LightField) -> Self {
        Self { grid, light }
    }

    pub fn can_spawn(&self, creature: Creature, px: i32, py: i32) -> bool {
        self.can_place(&creature.spawn_rule(), px, py)
    }

    /// Hitbox inside the world, standing on an allowed surface inside the
    /// light band, and overlapping no foreground block.
    pub fn can_place(&self, rule: &SpawnRule, px: i32, py: i32) -> bool {
        let world_w = self.grid.width() as i32 * TILE_SIZE;
        let world_h = self.grid.height() as i32 * TILE_SIZE;
        if px < 0 || py < 0 || px + rule.hitbox_w > world_w || py + rule.hitbox_h > world_h {
            return false;
        }

        /* surface under the feet */
        let foot_x = (px + rule.hitbox_w / 2) / TILE_SIZE;
        let foot_y = (py + rule.hitbox_h) / TILE_SIZE;
        let Ok(Some(below)) = self.grid.foreground(foot_x, foot_y) else {
            return false;
        };
        if !rule.surfaces.contains(&below) {
            return false;
        }

        let light = self.light.light_at(self.grid, foot_x, foot_y);
        if light < rule.min_light || light > rule.max_light {
            return false;
        }

        /* every covered cell must be empty */
        let (sx, ex) = (px / TILE_SIZE, (px + rule.hitbox_w - 1) / TILE_SIZE);
        let (sy, ey) = (py / TILE_SIZE, (py + rule.hitbox_h - 1) / TILE_SIZE);
        (sx..=ex).all(|x| (sy..=ey).all(|y| matches!(self.grid.foreground(x, y), Ok(None))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i32 = TILE_SIZE;

    /// 8x6: rows 0..=3 air, row 4 `surface`, row 5 stone; `roofed` walls the air
    fn arena(surface: BlockKind, roofed: bool) -> (BlockGrid, LightField) {
        let mut grid = BlockGrid::new(8, 6);
        for x in 0..8 {
            grid.set_foreground(x, 4, Some(surface)).unwrap();
            grid.set_foreground(x, 5, Some(BlockKind::Stone)).unwrap();
            if roofed {
                for y in 0..4 {
                    grid.set_background(x, y, Some(BlockKind::Stone)).unwrap();
                }
            }
        }
        let mut light = LightField::default();
        light.recompute(&grid, None);
        (grid, light)
    }

    #[test]
    fn polar_bear_on_lit_snow() {
        let (grid, light) = arena(BlockKind::Snow, false);
        let v = SpawnValidator::new(&grid, &light);
        // feet land exactly on row 4
        assert!(v.can_spawn(Creature::PolarBear, T, 4 * T - 42));
        // wrong surface for the others
        assert!(!v.can_spawn(Creature::BlackBear, T, 4 * T - 42));
        assert!(!v.can_spawn(Creature::Bat, T, 4 * T - 64));
    }

    #[test]
    fn footprint_must_be_clear() {
        let (mut grid, _) = arena(BlockKind::Snow, false);
        grid.set_foreground(3, 3, Some(BlockKind::Ice)).unwrap();
        let mut light = LightField::default();
        light.recompute(&grid, None);
        let v = SpawnValidator::new(&grid, &light);

        // hitbox spans columns 1..=3, rows 2..=3
        assert!(!v.can_spawn(Creature::PolarBear, T, 4 * T - 42));
        // shifted left it clears the block
        assert!(v.can_spawn(Creature::PolarBear, 0, 4 * T - 42));
    }

    #[test]
    fn light_band_is_enforced_even_when_clear() {
        // roofed snow is dark: polar bears need at least 4
        let (grid, light) = arena(BlockKind::Snow, true);
        let v = SpawnValidator::new(&grid, &light);
        assert_eq!(light.light_at(&grid, 2, 4), 0);
        assert!(!v.can_spawn(Creature::PolarBear, T, 4 * T - 42));

        // bats want the dark: fine under a roof, rejected under open sky
        let (grid, light) = arena(BlockKind::Stone, true);
        assert!(SpawnValidator::new(&grid, &light).can_spawn(Creature::Bat, T, 4 * T - 64));
        let (grid, light) = arena(BlockKind::Stone, false);
        assert!(!SpawnValidator::new(&grid, &light).can_spawn(Creature::Bat, T, 4 * T - 64));
    }

    #[test]
    fn hitbox_outside_the_world_is_rejected() {
        let (grid, light) = arena(BlockKind::Snow, false);
        let v = SpawnValidator::new(&grid, &light);
        assert!(!v.can_spawn(Creature::PolarBear, -1, 4 * T - 42));
        assert!(!v.can_spawn(Creature::PolarBear, 8 * T - 83, 4 * T - 42));
        assert!(!v.can_spawn(Creature::PolarBear, T, -5));
        // feet would be below the last row
        assert!(!v.can_spawn(Creature::PolarBear, T, 6 * T - 42));
    }
}
