//! Tuning constants shared by the generator, the coordinator and the flow.
//!
//! The settle and impact values are empirical. They are the defaults for
//! [`GameConfig`](crate::api::game::GameConfig) and can be overridden there.

// -- Simulation --

pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const MAX_SUBSTEPS: u32 = 3;
/// Frame deltas are clamped to this before accumulation (e.g. after a backgrounded tab).
pub const MAX_FRAME_DT: f32 = 0.1;
pub const GRAVITY_Y: f32 = -9.82;
pub const DEFAULT_SEED: u32 = 12345;

// -- Launcher / projectile --

pub const LAUNCHER_X: f32 = 0.0;
pub const LAUNCHER_Y: f32 = 1.5;
pub const LAUNCHER_Z: f32 = 0.0;
/// Render extent of the ground plane; the physics plane is unbounded.
pub const GROUND_SIZE: f32 = 200.0;
pub const PROJECTILE_RADIUS: f32 = 0.5;
pub const PROJECTILE_ANGULAR_DAMPING: f32 = 0.1;
pub const PROJECTILE_DENSITY: f32 = 2.0;

// -- Blocks / targets --

pub const TARGET_RADIUS: f32 = 0.6;
pub const TARGET_DENSITY: f32 = 0.8;
pub const DEBRIS_LINEAR_DAMPING: f32 = 0.2;
pub const DEBRIS_ANGULAR_DAMPING: f32 = 0.4;
pub const SLEEP_LINEAR_THRESHOLD: f32 = 0.2;
pub const SLEEP_ANGULAR_THRESHOLD: f32 = 0.2;

pub const WOOD_HEALTH: i32 = 2;
pub const STONE_HEALTH: i32 = 4;
pub const GLASS_HEALTH: i32 = 1;

pub const TARGET_POINTS: u32 = 500;
pub const BLOCK_POINTS: u32 = 100;

// -- Settle heuristic --

pub const SETTLE_PROJECTILE_LINEAR: f32 = 0.1;
pub const SETTLE_PROJECTILE_ANGULAR: f32 = 0.2;
pub const SETTLE_DEBRIS_LINEAR: f32 = 0.3;
pub const SETTLE_DEBRIS_ANGULAR: f32 = 0.5;
/// Minimum time after launch before settle is polled.
pub const SETTLE_GRACE: f32 = 1.0;
/// Forced-settle ceiling, measured from launch.
pub const SETTLE_MAX_WAIT: f32 = 8.0;

// -- Impacts --

pub const KILL_THRESHOLD: f32 = 4.0;
pub const DAMAGE_THRESHOLD: f32 = 2.0;
pub const DAMAGE_DIVISOR: f32 = 3.0;
/// Block-on-target impacts. Kept independent of the projectile kill threshold.
pub const DEBRIS_KILL_THRESHOLD: f32 = 3.0;
pub const TARGET_WAKE_RADIUS: f32 = 3.0;
pub const BLOCK_WAKE_RADIUS: f32 = 5.0;

// -- Generator --

pub const LEVEL_SEED_MULTIPLIER: u32 = 7919;
pub const MIN_TARGETS: u32 = 1;
pub const MAX_TARGETS: u32 = 6;
pub const MIN_BLOCKS: u32 = 6;
pub const MAX_BLOCKS: u32 = 40;
pub const MIN_AMMO: u32 = 3;
pub const MAX_STRUCTURES: u32 = 3;
/// Distance from the launcher to the first structure anchor, along +X.
pub const STRUCTURE_DISTANCE: f32 = 18.0;
pub const STRUCTURE_SPACING: f32 = 9.0;
/// Standard cube block half-size.
pub const BLOCK_HALF: f32 = 0.5;
pub const PLANK_HALF_THICKNESS: f32 = 0.2;
