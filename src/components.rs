use bevy::prelude::*;

/* ===========================================================
   shared components
   =========================================================== */
/// Cell the entity occupies, in grid coordinates.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

/* glow stat; floor(glow) capped at 10 seeds the light field */
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Deref, DerefMut)]
pub struct Glow(pub f32);

/* ===========================================================
   player
   =========================================================== */
#[derive(Component)]
pub struct Player;
