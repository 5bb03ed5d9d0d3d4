use std::num::NonZeroUsize;
use std::sync::Mutex;

use glam::{Quat, Vec3};
use rapier3d::na as nalgebra;
use rapier3d::prelude::*;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra and back
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry3<f32>) -> (Vec3, Quat) {
    let pos = na_to_vec3(&iso.translation.vector);
    let q = iso.rotation;
    (pos, Quat::from_xyzw(q.i, q.j, q.k, q.w))
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Infinite plane through the body origin, solid below, normal +Y.
    HalfSpace,
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderDesc::HalfSpace => ColliderBuilder::halfspace(nalgebra::Vector3::y_axis()),
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Sleep activation thresholds for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepThresholds {
    pub linear: f32,
    pub angular: f32,
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity_scale: f32,
    pub ccd: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Insert the body already asleep.
    pub sleeping: bool,
    pub sleep: Option<SleepThresholds>,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
            sleeping: false,
            sleep: None,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            gravity_scale: 0.0,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body faster.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set the angular damping (rotation decay). Higher values slow rotation faster.
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    pub fn asleep(mut self) -> Self {
        self.sleeping = true;
        self
    }

    pub fn with_sleep_thresholds(mut self, linear: f32, angular: f32) -> Self {
        self.sleep = Some(SleepThresholds { linear, angular });
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A contact that started during a step, resolved to entity ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactStart {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// Norm of the relative linear velocity of the two bodies when the contact was reported.
    pub impact: f32,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

fn body_entity(bodies: &RigidBodySet, colliders: &ColliderSet, h: ColliderHandle) -> Option<(EntityId, Vec3)> {
    let collider = colliders.get(h)?;
    let body = bodies.get(collider.parent()?)?;
    Some((EntityId(body.user_data as u32), na_to_vec3(body.linvel())))
}

struct DirectEventCollector {
    started: Mutex<Vec<ContactStart>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            started: Mutex::new(Vec::new()),
        }
    }

    fn drain_into(&self, out: &mut Vec<ContactStart>) {
        if let Ok(mut started) = self.started.lock() {
            out.append(&mut started);
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // Only new contacts are interesting; velocities here are pre-solve.
        let CollisionEvent::Started(h1, h2, _) = event else {
            return;
        };
        let (Some((a, va)), Some((b, vb))) = (
            body_entity(bodies, colliders, h1),
            body_entity(bodies, colliders, h2),
        ) else {
            return;
        };
        if let Ok(mut started) = self.started.lock() {
            started.push(ContactStart {
                entity_a: a,
                entity_b: b,
                impact: (va - vb).length(),
            });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single struct.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector (Y up).
    pub fn new(gravity: Vec3, dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        // A single solver pass keeps free flight on plain semi-implicit Euler.
        integration_parameters.num_solver_iterations = NonZeroUsize::MIN;
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let mut rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec3_to_na(desc.position))
            .linvel(vec3_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(true)
            .sleeping(desc.sleeping)
            .user_data(entity_id.0 as u128)
            .build();

        if let Some(sleep) = desc.sleep {
            let activation = rb.activation_mut();
            activation.normalized_linear_threshold = sleep.linear;
            activation.angular_threshold = sleep.angular;
        }

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Run one fixed step and append newly started contacts to `started`.
    pub fn step_into(&mut self, started: &mut Vec<ContactStart>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
        self.event_collector.drain_into(started);
    }

    /// Set the linear velocity of a body directly and wake it.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec3_to_na(vel), true);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.angvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Teleport a body, keeping its orientation.
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec3_to_na(pos), true);
        }
    }

    pub fn set_gravity_scale(&mut self, body: &PhysicsBody, scale: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_gravity_scale(scale, true);
        }
    }

    pub fn wake(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.wake_up(true);
        }
    }

    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(false)
    }

    /// Get the current position and orientation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec3, Quat) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY))
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
