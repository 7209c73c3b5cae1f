//! Bevy wiring: world creation at startup, light recompute every tick
use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::grid::{BlockGrid, LayerIds};
use crate::lighting::{recompute_light_system, LightField};
use crate::rng::world_rng;
use crate::world_gen::{generate, import_world, SpawnPoint};

/// Where the world comes from.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub enum WorldSource {
    #[default]
    Generate,
    /// previously exported layers; generation is skipped
    Saved {
        foreground: LayerIds,
        background: LayerIds,
        spawn: SpawnPoint,
    },
}

#[derive(Clone, Debug, Default)]
pub struct FrostboundPlugin {
    pub config: WorldConfig,
    pub source: WorldSource,
}

impl FrostboundPlugin {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            source: WorldSource::Generate,
        }
    }

    pub fn saved(
        config: WorldConfig,
        foreground: LayerIds,
        background: LayerIds,
        spawn: SpawnPoint,
    ) -> Self {
        Self {
            config,
            source: WorldSource::Saved { foreground, background, spawn },
        }
    }
}

impl Plugin for FrostboundPlugin {
    fn build(&self, app: &mut App) {
        let (w, h) = (self.config.width, self.config.height);
        app.insert_resource(self.config.clone())
            .insert_resource(self.source.clone())
            .insert_resource(BlockGrid::new(w, h))
            .insert_resource(LightField::new(w, h))
            .add_systems(Startup, create_world_system)
            .add_systems(PreUpdate, recompute_light_system);
    }
}

/* ===========================================================
   startup
   =========================================================== */
pub fn create_world_system(
    mut commands: Commands,
    config: Res<WorldConfig>,
    source: Res<WorldSource>,
    mut grid: ResMut<BlockGrid>,
    mut exit: EventWriter<AppExit>,
) {
    let result = match &*source {
        WorldSource::Generate => {
            info!("generating {}x{} world (seed {:?})", config.width, config.height, config.seed);
            generate(&mut grid, &mut world_rng(config.seed), &config)
        }
        WorldSource::Saved { foreground, background, spawn } => {
            import_world(&mut grid, foreground, background).map(|()| *spawn)
        }
    };

    match result {
        Ok(spawn) => {
            commands.insert_resource(spawn);
            // layers are no longer needed once applied
            commands.remove_resource::<WorldSource>();
        }
        Err(err) => {
            error!("world creation failed: {err}");
            exit.send(AppExit::error());
        }
    }
}
