use std::fmt;

use glam::Vec3;

/// Stable identifier for a live entity. Allocated by the physics coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved for the ground plane. The id counter never hands it out.
    pub const GROUND: EntityId = EntityId(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// Opaque handle to whatever the renderer uses to draw an entity.
/// The core stores and forwards it, never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisualHandle(pub u32);

/// What a live entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Projectile,
    Block,
    Target,
    Ground,
}

impl EntityKind {
    /// Numeric code used in the flat render buffer.
    pub fn code(self) -> f32 {
        match self {
            EntityKind::Projectile => 0.0,
            EntityKind::Block => 1.0,
            EntityKind::Target => 2.0,
            EntityKind::Ground => 3.0,
        }
    }
}

/// Event channel topics. `as_str` gives the wire identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    LevelStart,
    LevelReset,
    AimStart,
    AimUpdate,
    AimRelease,
    Launched,
    ProjectileHit,
    TargetHit,
    BlockHit,
    TargetKilled,
    BlockDestroyed,
    ProjectileSettled,
    LevelComplete,
    GameOver,
    ScoreChanged,
}

impl Topic {
    pub const ALL: [Topic; 15] = [
        Topic::LevelStart,
        Topic::LevelReset,
        Topic::AimStart,
        Topic::AimUpdate,
        Topic::AimRelease,
        Topic::Launched,
        Topic::ProjectileHit,
        Topic::TargetHit,
        Topic::BlockHit,
        Topic::TargetKilled,
        Topic::BlockDestroyed,
        Topic::ProjectileSettled,
        Topic::LevelComplete,
        Topic::GameOver,
        Topic::ScoreChanged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::LevelStart => "level-start",
            Topic::LevelReset => "level-reset",
            Topic::AimStart => "aim-start",
            Topic::AimUpdate => "aim-update",
            Topic::AimRelease => "aim-release",
            Topic::Launched => "launched",
            Topic::ProjectileHit => "projectile-hit",
            Topic::TargetHit => "target-hit",
            Topic::BlockHit => "block-hit",
            Topic::TargetKilled => "target-killed",
            Topic::BlockDestroyed => "block-destroyed",
            Topic::ProjectileSettled => "projectile-settled",
            Topic::LevelComplete => "level-complete",
            Topic::GameOver => "game-over",
            Topic::ScoreChanged => "score-changed",
        }
    }

    /// Numeric code used when events are flattened for the web bridge.
    pub fn code(self) -> f32 {
        Topic::ALL.iter().position(|t| *t == self).unwrap_or(0) as f32 + 1.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What struck a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitSource {
    Projectile,
    /// A block falling or sliding onto the target.
    Debris,
}

impl HitSource {
    pub fn code(self) -> f32 {
        match self {
            HitSource::Projectile => 0.0,
            HitSource::Debris => 1.0,
        }
    }
}

/// A domain event published on the event channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelStart { level: u32 },
    LevelReset,
    AimStart,
    AimUpdate {
        pull: Option<Vec3>,
        velocity: Option<Vec3>,
        cancelled: bool,
    },
    AimRelease { velocity: Vec3 },
    Launched { projectile: EntityId },
    ProjectileHit { other: EntityId, force: f32 },
    TargetHit {
        target: EntityId,
        force: f32,
        source: HitSource,
    },
    BlockHit { block: EntityId, force: f32 },
    TargetKilled { target: EntityId },
    BlockDestroyed { block: EntityId },
    ProjectileSettled,
    LevelComplete { level: u32, score: u32 },
    GameOver { level: u32, score: u32 },
    ScoreChanged { score: u32, total: u32 },
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::LevelStart { .. } => Topic::LevelStart,
            GameEvent::LevelReset => Topic::LevelReset,
            GameEvent::AimStart => Topic::AimStart,
            GameEvent::AimUpdate { .. } => Topic::AimUpdate,
            GameEvent::AimRelease { .. } => Topic::AimRelease,
            GameEvent::Launched { .. } => Topic::Launched,
            GameEvent::ProjectileHit { .. } => Topic::ProjectileHit,
            GameEvent::TargetHit { .. } => Topic::TargetHit,
            GameEvent::BlockHit { .. } => Topic::BlockHit,
            GameEvent::TargetKilled { .. } => Topic::TargetKilled,
            GameEvent::BlockDestroyed { .. } => Topic::BlockDestroyed,
            GameEvent::ProjectileSettled => Topic::ProjectileSettled,
            GameEvent::LevelComplete { .. } => Topic::LevelComplete,
            GameEvent::GameOver { .. } => Topic::GameOver,
            GameEvent::ScoreChanged { .. } => Topic::ScoreChanged,
        }
    }

    /// Flatten into `[topic, a, b, c]` for the web bridge.
    pub fn to_wire(&self) -> WireEvent {
        let (a, b, c) = match *self {
            GameEvent::LevelStart { level } => (level as f32, 0.0, 0.0),
            GameEvent::LevelReset | GameEvent::AimStart | GameEvent::ProjectileSettled => {
                (0.0, 0.0, 0.0)
            }
            GameEvent::AimUpdate { velocity, cancelled, .. } => {
                let v = velocity.unwrap_or(Vec3::ZERO);
                if cancelled {
                    (-1.0, 0.0, 0.0)
                } else {
                    (v.x, v.y, v.z)
                }
            }
            GameEvent::AimRelease { velocity } => (velocity.x, velocity.y, velocity.z),
            GameEvent::Launched { projectile } => (projectile.0 as f32, 0.0, 0.0),
            GameEvent::ProjectileHit { other, force } => (other.0 as f32, force, 0.0),
            GameEvent::TargetHit { target, force, source } => {
                (target.0 as f32, force, source.code())
            }
            GameEvent::BlockHit { block, force } => (block.0 as f32, force, 0.0),
            GameEvent::TargetKilled { target } => (target.0 as f32, 0.0, 0.0),
            GameEvent::BlockDestroyed { block } => (block.0 as f32, 0.0, 0.0),
            GameEvent::LevelComplete { level, score } | GameEvent::GameOver { level, score } => {
                (level as f32, score as f32, 0.0)
            }
            GameEvent::ScoreChanged { score, total } => (score as f32, total as f32, 0.0),
        };
        WireEvent {
            kind: self.topic().code(),
            a,
            b,
            c,
        }
    }
}

/// A game event flattened for the JS side: `kind` is the topic code, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
}
