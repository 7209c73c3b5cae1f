//! frostbound – layered 2D block world: generation, persistence boundary,
//! light field and creature placement, hosted as a Bevy plugin
//!
//! Works with **Bevy 0.15**.

pub mod block;
pub mod caves;
pub mod clusters;
pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod lighting;
pub mod plugin;
pub mod rng;
pub mod spawn;
pub mod terrain;
pub mod world_gen;

pub use block::{BlockKind, VariantTable};
pub use clusters::{grow_clusters, ClusterReport, ClusterSpec};
pub use config::WorldConfig;
pub use error::{Result, WorldError};
pub use grid::{BlockGrid, Layer, LayerIds};
pub use lighting::{GlowSource, LightField};
pub use plugin::{FrostboundPlugin, WorldSource};
pub use rng::{world_rng, TileRng};
pub use spawn::{Creature, SpawnRule, SpawnValidator};
pub use world_gen::{generate, import_world, SpawnPoint};
