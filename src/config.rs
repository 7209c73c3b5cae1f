//! world configuration – defaults from `constants`, overridable from TOML
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::block::{BlockKind, VariantTable};
use crate::clusters::ClusterSpec;
use crate::constants::*;
use crate::error::{invalid, Result};
use crate::rng::TileRng;
use crate::world_gen::standard_veins;

/* ===========================================================
   helpers
   =========================================================== */
/// Inclusive integer range rolled with a single draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn from_pair(pair: (i32, i32)) -> Self {
        Self::new(pair.0, pair.1)
    }

    #[inline]
    pub fn roll<R: TileRng + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.range_inclusive(self.min, self.max)
    }

    /// `floor <= min <= max`
    pub fn check(&self, what: &str, floor: i32) -> Result<()> {
        if self.min < floor {
            return Err(invalid(format!("{what}: min {} below {floor}", self.min)));
        }
        if self.max < self.min {
            return Err(invalid(format!("{what}: max {} < min {}", self.max, self.min)));
        }
        Ok(())
    }
}

fn check_percent(what: &str, value: i32) -> Result<()> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{what}: {value}% is not a percentage")))
    }
}

/* ===========================================================
   terrain
   =========================================================== */
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// rows above this may only hold hills
    pub sky_limit: i32,
    /// first row of the stone band (a randomized seam)
    pub cold_limit: i32,
    /// first row of the basalt band (a randomized seam)
    pub rock_limit: i32,
    /// basalt stops here; rows below (except bedrock) stay empty
    pub hot_limit: i32,
    pub min_hill: i32,
    pub max_hill: i32,
    pub snow_depth: i32,
    pub snow_fade: i32,
    pub permafrost_depth: i32,
    pub permafrost_fade: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            sky_limit: SKY_LIMIT,
            cold_limit: COLD_LIMIT,
            rock_limit: ROCK_LIMIT,
            hot_limit: HOT_LIMIT,
            min_hill: HILL_BUFFER,
            max_hill: SKY_LIMIT - 1,
            snow_depth: SNOW_DEPTH,
            snow_fade: SNOW_FADE,
            permafrost_depth: PERMAFROST_DEPTH,
            permafrost_fade: PERMAFROST_FADE,
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self, height: usize) -> Result<()> {
        let last_row = height as i32 - 1;
        if self.min_hill < 0 || self.min_hill > self.max_hill {
            return Err(invalid(format!(
                "hill range [{}, {}] is empty",
                self.min_hill, self.max_hill
            )));
        }
        if self.max_hill >= self.sky_limit {
            return Err(invalid("hills must stay above the sky limit"));
        }
        let bands = [self.sky_limit, self.cold_limit, self.rock_limit, self.hot_limit];
        if bands.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(format!("band limits {bands:?} are not strictly increasing")));
        }
        if self.hot_limit > last_row {
            return Err(invalid(format!(
                "hot limit {} overlaps the bedrock row {last_row}",
                self.hot_limit
            )));
        }
        if self.snow_depth < 0 || self.snow_fade < 1 || self.permafrost_fade < 1 {
            return Err(invalid("strata depths must be >= 0 and fades >= 1"));
        }
        if self.snow_depth + self.snow_fade > self.permafrost_depth {
            return Err(invalid("snow fade runs past the permafrost depth"));
        }
        Ok(())
    }
}

/* ===========================================================
   caves
   =========================================================== */
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    pub tunnels: Span,
    pub tunnel_length: Span,
    /// 1 in N chance per step to jog up, same to jog down
    pub jog_odds: i32,
    pub ceiling_chance: i32,
    pub floor_chance: i32,
    /// the first solid cell above a tunnel must be one of these
    pub ceiling_hosts: Vec<BlockKind>,
    /// the cell two rows under a tunnel centre must be one of these
    pub floor_hosts: Vec<BlockKind>,
    pub ceiling_decoration: BlockKind,
    /// one is picked uniformly per placement
    pub floor_decorations: Vec<BlockKind>,
    pub ravines: Span,
    pub ravine_depth: Span,
    pub ravine_half_width: Span,
    /// clamp applied to the half‑width while descending
    pub ravine_drift: Span,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            tunnels: Span::from_pair(TUNNEL_COUNT),
            tunnel_length: Span::from_pair(TUNNEL_LENGTH),
            jog_odds: TUNNEL_JOG_ODDS,
            ceiling_chance: STALACTITE_CHANCE,
            floor_chance: MUSHROOM_CHANCE,
            ceiling_hosts: vec![BlockKind::Stone, BlockKind::Basalt],
            floor_hosts: vec![BlockKind::Stone],
            ceiling_decoration: BlockKind::Stalactite,
            floor_decorations: vec![BlockKind::GreenMushroom, BlockKind::YellowMushroom],
            ravines: Span::from_pair(RAVINE_COUNT),
            ravine_depth: Span::from_pair(RAVINE_DEPTH),
            ravine_half_width: Span::from_pair(RAVINE_HALF_WIDTH),
            ravine_drift: Span::from_pair(RAVINE_DRIFT_HALF_WIDTH),
        }
    }
}

impl CaveConfig {
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if height < 4 {
            return Err(invalid("tunnels need a grid at least 4 rows tall"));
        }
        self.tunnels.check("tunnel count", 0)?;
        self.tunnel_length.check("tunnel length", 1)?;
        if self.tunnel_length.max >= width as i32 {
            return Err(invalid(format!(
                "tunnel length {} does not fit a {width}-wide grid",
                self.tunnel_length.max
            )));
        }
        if self.jog_odds < 1 {
            return Err(invalid("jog odds must be >= 1"));
        }
        check_percent("ceiling chance", self.ceiling_chance)?;
        check_percent("floor chance", self.floor_chance)?;
        if self.floor_decorations.is_empty() {
            return Err(invalid("at least one floor decoration is required"));
        }
        self.ravines.check("ravine count", 0)?;
        self.ravine_depth.check("ravine depth", 1)?;
        self.ravine_half_width.check("ravine half width", 0)?;
        self.ravine_drift.check("ravine drift", 0)?;
        Ok(())
    }
}

/* ===========================================================
   starter clearing & trees
   =========================================================== */
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarterConfig {
    pub width: i32,
    pub height: i32,
    pub erosion_chance: i32,
    pub root_depth: i32,
    pub root_chance: i32,
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            width: STARTER_WIDTH,
            height: STARTER_HEIGHT,
            erosion_chance: STARTER_EROSION,
            root_depth: STARTER_ROOT_DEPTH,
            root_chance: STARTER_ROOT_CHANCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub chance: i32,
    pub trunk: Span,
    pub spacing: i32,
    /// canopy row widths, bottom row first
    pub canopy: Vec<i32>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            chance: TREE_CHANCE,
            trunk: Span::from_pair(TREE_TRUNK),
            spacing: TREE_SPACING,
            canopy: TREE_CANOPY.to_vec(),
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> Result<()> {
        check_percent("tree chance", self.chance)?;
        self.trunk.check("tree trunk", 1)?;
        if self.spacing < 0 {
            return Err(invalid("tree spacing must be >= 0"));
        }
        Ok(())
    }
}

/* ===========================================================
   world
   =========================================================== */
/// Everything `generate` needs. Missing TOML keys fall back to the defaults.
#[derive(Resource, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// `None` = fresh entropy every run
    pub seed: Option<u64>,
    /// glow stat of the player light source
    pub player_glow: f32,
    pub terrain: TerrainConfig,
    pub caves: CaveConfig,
    pub starter: StarterConfig,
    pub trees: TreeConfig,
    /// `None` = the standard vein table for `terrain`
    pub veins: Option<Vec<ClusterSpec>>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            seed: None,
            player_glow: PLAYER_GLOW,
            terrain: TerrainConfig::default(),
            caves: CaveConfig::default(),
            starter: StarterConfig::default(),
            trees: TreeConfig::default(),
            veins: None,
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// vein passes in priority order
    pub fn veins(&self) -> Vec<ClusterSpec> {
        self.veins
            .clone()
            .unwrap_or_else(|| standard_veins(&self.terrain))
    }

    /// centre of the starter clearing
    pub fn starter_center(&self) -> (i32, i32) {
        (
            self.width as i32 / 2,
            (self.terrain.cold_limit + self.terrain.rock_limit) / 2,
        )
    }

    /// fails before anything is written if the world could not be built
    pub fn validate(&self, variants: &VariantTable) -> Result<()> {
        if self.width < 8 || self.height < 8 {
            return Err(invalid(format!(
                "grid {}x{} is too small",
                self.width, self.height
            )));
        }
        if !self.player_glow.is_finite() || self.player_glow < 0.0 {
            return Err(invalid("player glow must be a finite, non-negative number"));
        }
        self.terrain.validate(self.height)?;
        self.caves.validate(self.width, self.height)?;
        self.trees.validate()?;
        self.validate_starter()?;
        for vein in self.veins() {
            vein.validate(self.width, self.height, variants)?;
        }
        Ok(())
    }

    fn validate_starter(&self) -> Result<()> {
        let s = &self.starter;
        if s.width < 1 || s.height < 1 || s.root_depth < 0 {
            return Err(invalid("starter clearing must be at least 1x1"));
        }
        check_percent("starter erosion", s.erosion_chance)?;
        check_percent("starter roots", s.root_chance)?;

        let (cx, cy) = self.starter_center();
        let sx = cx - s.width / 2;
        let sy = cy - s.height / 2;
        let floor = sy + s.height;
        // the clearing's spawn column and the glowcap beside it
        let right = (sx + s.width).max(cx + 2);
        let bottom = floor + s.root_depth.max(1);
        let inside = sx - 1 >= 0
            && sy - 1 >= 0
            && floor - 2 >= 0
            && right < self.width as i32
            && bottom < self.height as i32 - 1;
        if !inside {
            return Err(invalid("starter clearing does not fit inside the grid"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorldError;

    #[test]
    fn defaults_are_valid() {
        WorldConfig::default()
            .validate(&VariantTable::standard())
            .unwrap();
    }

    #[test]
    fn inverted_hills_are_rejected() {
        let mut config = WorldConfig::default();
        config.terrain.min_hill = 12;
        config.terrain.max_hill = 6;
        assert!(matches!(
            config.validate(&VariantTable::standard()),
            Err(WorldError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn inverted_bands_are_rejected() {
        let mut config = WorldConfig::default();
        config.terrain.rock_limit = config.terrain.cold_limit;
        assert!(config.validate(&VariantTable::standard()).is_err());
    }

    #[test]
    fn inverted_size_range_is_rejected() {
        let mut config = WorldConfig::default();
        let mut veins = config.veins();
        veins[0].size = Span::new(9, 3);
        config.veins = Some(veins);
        assert!(config.validate(&VariantTable::standard()).is_err());
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            seed = 42
            player_glow = 6.5

            [terrain]
            min_hill = 3

            [caves]
            tunnels = { min = 0, max = 0 }
            floor_decorations = ["yellow_mushroom"]
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.terrain.min_hill, 3);
        assert_eq!(config.terrain.sky_limit, SKY_LIMIT);
        assert_eq!(config.caves.tunnels, Span::new(0, 0));
        assert_eq!(config.caves.floor_decorations, vec![BlockKind::YellowMushroom]);
        assert_eq!(config.width, WORLD_WIDTH);
        config.validate(&VariantTable::standard()).unwrap();
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            WorldConfig::from_toml_str("width = \"wide\""),
            Err(WorldError::ConfigParse(_))
        ));
    }
}
