use glam::{Quat, Vec3};

use crate::api::types::{EntityId, EntityKind, VisualHandle};
use crate::core::physics::PhysicsBody;
use crate::level::spec::Material;

/// A live simulated object. Owned by the physics coordinator for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    pub kind: EntityKind,
    /// The one simulation body this entity owns.
    pub body: PhysicsBody,
    /// Remaining health. Only blocks and targets carry one.
    pub health: Option<i32>,
    /// Passed through to the renderer, never read by the core.
    pub visual: VisualHandle,
    /// Position in world space, copied from the body after every step.
    pub pos: Vec3,
    /// Orientation, copied from the body after every step.
    pub rotation: Quat,
    /// Box half extents, or `(r, r, r)` for spheres.
    pub half_extents: Vec3,
    /// Render hint for blocks.
    pub material: Option<Material>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, body: PhysicsBody) -> Self {
        Self {
            id,
            kind,
            body,
            health: None,
            visual: VisualHandle::default(),
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            half_extents: Vec3::ZERO,
            material: None,
        }
    }

    // -- Builder pattern --

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_visual(mut self, visual: VisualHandle) -> Self {
        self.visual = visual;
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn is_projectile(&self) -> bool {
        self.kind == EntityKind::Projectile
    }
}
