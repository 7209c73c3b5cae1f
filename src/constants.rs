/// -------- tiles & world size --------
pub const TILE_SIZE: i32     = 32;
pub const WORLD_WIDTH: usize  = 149;
pub const WORLD_HEIGHT: usize = 149;

/// -------- light --------
pub const MAX_LIGHT: u8   = 10;
pub const SKY_LIGHT: u8   = MAX_LIGHT;
pub const SOLID_DECAY: u8 = 3;
pub const SHADE_DECAY: u8 = 1;

/// -------- vertical bands (absolute rows, row‑0 = top) --------
pub const SKY_LIMIT: i32  = 15;
pub const COLD_LIMIT: i32 = 60;
pub const ROCK_LIMIT: i32 = 104;
pub const HOT_LIMIT: i32  = 148;

/// -------- hills --------
pub const HILL_BUFFER: i32 = 5;

/// -------- cold‑band strata (depth below the local snow line) --------
pub const SNOW_DEPTH: i32       = 6;
pub const SNOW_FADE: i32        = 4;
pub const PERMAFROST_DEPTH: i32 = 20;
pub const PERMAFROST_FADE: i32  = 6;

/// -------- horizontal tunnels --------
pub const TUNNEL_COUNT: (i32, i32)  = (50, 99);
pub const TUNNEL_LENGTH: (i32, i32) = (8, 32);
pub const TUNNEL_JOG_ODDS: i32      = 10; // 1 in N each way
pub const STALACTITE_CHANCE: i32    = 20; // percent
pub const MUSHROOM_CHANCE: i32      = 20; // percent

/// -------- vertical ravines --------
pub const RAVINE_COUNT: (i32, i32) = (8, 13);
pub const RAVINE_DEPTH: (i32, i32) = (15, 40);
pub const RAVINE_HALF_WIDTH: (i32, i32) = (1, 3);
pub const RAVINE_DRIFT_HALF_WIDTH: (i32, i32) = (1, 2);

/// -------- starter clearing --------
pub const STARTER_WIDTH: i32  = 12;
pub const STARTER_HEIGHT: i32 = 4;
pub const STARTER_EROSION: i32 = 25; // percent
pub const STARTER_ROOT_DEPTH: i32 = 3;
pub const STARTER_ROOT_CHANCE: i32 = 70; // percent

/// -------- surface trees --------
pub const TREE_CHANCE: i32  = 10; // percent per column
pub const TREE_TRUNK: (i32, i32) = (4, 9);
pub const TREE_SPACING: i32 = 5;
pub const TREE_CANOPY: [i32; 5] = [3, 5, 3, 3, 1];

/// -------- clusters --------
pub const CORE_FRACTION: usize = 5; // 1 / N of a cluster becomes core
pub const CLUSTER_SEED_ATTEMPTS: u32 = 4_096;

/// -------- player --------
pub const PLAYER_GLOW: f32 = 0.0;
