//! headless bootstrap: build or load a world, light it every tick
//!
//! `frostbound [config.toml]` – without a path the built‑in defaults are used.
//! Works with **Bevy 0.15**.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use frostbound::components::{Glow, GridPosition, Player};
use frostbound::constants::TILE_SIZE;
use frostbound::plugin::create_world_system;
use frostbound::{
    BlockGrid, Creature, FrostboundPlugin, LightField, SpawnPoint, SpawnValidator, WorldConfig,
};

/* ------------------------------------------------------------------------ */
/* player light                                                             */
/* ------------------------------------------------------------------------ */
fn spawn_player(mut commands: Commands, spawn: Option<Res<SpawnPoint>>, config: Res<WorldConfig>) {
    let Some(spawn) = spawn else { return };
    commands.spawn((
        Player,
        GridPosition { x: spawn.x, y: spawn.y },
        Glow(config.player_glow),
    ));
}

/* ------------------------------------------------------------------------ */
/* periodic report                                                          */
/* ------------------------------------------------------------------------ */
#[derive(Resource, Deref, DerefMut)]
struct ReportTimer(Timer);

fn report_system(
    time: Res<Time>,
    mut timer: ResMut<ReportTimer>,
    grid: Res<BlockGrid>,
    light: Res<LightField>,
    player_q: Query<&GridPosition, With<Player>>,
) {
    if !timer.tick(time.delta()).just_finished() {
        return;
    }

    let levels = light.levels();
    let lit = levels.iter().filter(|&&l| l > 0).count();
    info!("light: {lit}/{} cells lit", levels.len());
    if let Ok(pos) = player_q.get_single() {
        info!("light at player ({}, {}): {}", pos.x, pos.y, light.light_at(&grid, pos.x, pos.y));
    }

    /* cell‑aligned survey: feet on row y + 1 */
    let validator = SpawnValidator::new(&grid, &light);
    for creature in Creature::ALL {
        let rule = creature.spawn_rule();
        let mut sites = 0;
        for y in 0..grid.height() as i32 - 1 {
            for x in 0..grid.width() as i32 {
                let (px, py) = (x * TILE_SIZE, (y + 1) * TILE_SIZE - rule.hitbox_h);
                if validator.can_place(&rule, px, py) {
                    sites += 1;
                }
            }
        }
        debug!("{creature:?}: {sites} spawn sites");
    }
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() -> AppExit {
    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("cannot load {path}: {err}");
                return AppExit::error();
            }
        },
        None => WorldConfig::default(),
    };

    App::new()
        /* bevy core ------------------------------------------------------- */
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
            LogPlugin::default(),
        ))

        /* world ----------------------------------------------------------- */
        .add_plugins(FrostboundPlugin::new(config))
        .insert_resource(ReportTimer(Timer::from_seconds(5.0, TimerMode::Repeating)))

        /* startup / frame‑update ------------------------------------------ */
        .add_systems(Startup, spawn_player.after(create_world_system))
        .add_systems(Update, report_system)
        .run()
}
