//! Physics coordinator: owns the rapier world and the entity arena, advances
//! the simulation on a fixed sub-step and turns raw contacts into domain
//! events. It never touches score or health policy; the flow does that.

use glam::{Quat, Vec3};

use crate::api::game::{GameConfig, SettleConfig};
use crate::api::types::{EntityId, EntityKind, GameEvent, HitSource, VisualHandle};
use crate::components::entity::Entity;
use crate::constants::*;
use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, ContactStart, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::level::spec::BlockSpec;

pub struct PhysicsCoordinator {
    world: PhysicsWorld,
    scene: Scene,
    timestep: FixedTimestep,
    next_id: u32,
    projectile: Option<EntityId>,
    settle: SettleConfig,
    debris_kill_threshold: f32,
    contacts: Vec<ContactStart>,
    events: Vec<GameEvent>,
}

impl PhysicsCoordinator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            world: PhysicsWorld::new(config.gravity, config.fixed_dt),
            scene: Scene::new(),
            timestep: FixedTimestep::new(config.fixed_dt, config.max_substeps, config.max_frame_dt),
            next_id: 1,
            projectile: None,
            settle: config.settle,
            debris_kill_threshold: config.impact.debris_kill_threshold,
            contacts: Vec::new(),
            events: Vec::new(),
        }
    }

    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn(&mut self, id: EntityId, kind: EntityKind, desc: BodyDesc, material: ColliderMaterial) -> Entity {
        let body = self.world.create_body(id, &desc, material);
        Entity::new(id, kind, body)
            .with_pos(desc.position)
            .with_visual(VisualHandle(id.0))
    }

    /// Static ground plane at y = 0. `size` is only a render hint; the plane is unbounded.
    pub fn create_ground(&mut self, size: f32) -> EntityId {
        if self.scene.contains(EntityId::GROUND) {
            return EntityId::GROUND;
        }
        let desc = BodyDesc::fixed(ColliderDesc::HalfSpace);
        let material = ColliderMaterial {
            restitution: 0.2,
            friction: 0.8,
            density: 1.0,
        };
        let entity = self
            .spawn(EntityId::GROUND, EntityKind::Ground, desc, material)
            .with_half_extents(Vec3::new(size / 2.0, 0.0, size / 2.0));
        self.scene.spawn(entity);
        EntityId::GROUND
    }

    /// Dynamic sphere held in place (no gravity) until `launch`. Replaces any live projectile.
    pub fn add_projectile(&mut self, position: Vec3, radius: f32) -> EntityId {
        if let Some(old) = self.projectile.take() {
            self.remove_entity(old);
        }
        let id = self.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(position)
            .with_gravity_scale(0.0)
            .with_linear_damping(0.0)
            .with_angular_damping(PROJECTILE_ANGULAR_DAMPING)
            .with_ccd(true);
        let material = ColliderMaterial {
            restitution: 0.3,
            friction: 0.6,
            density: PROJECTILE_DENSITY,
        };
        let entity = self
            .spawn(id, EntityKind::Projectile, desc, material)
            .with_half_extents(Vec3::splat(radius));
        self.scene.spawn(entity);
        self.projectile = Some(id);
        id
    }

    /// Dynamic box, inserted asleep so a fresh structure does not sag before the first shot.
    pub fn add_block(&mut self, position: Vec3, half_extents: Vec3, health: i32) -> EntityId {
        let id = self.next_id();
        let desc = debris_desc(ColliderDesc::Cuboid { half_extents }, position);
        let material = ColliderMaterial {
            restitution: 0.1,
            friction: 0.7,
            density: 1.0,
        };
        let entity = self
            .spawn(id, EntityKind::Block, desc, material)
            .with_health(health)
            .with_half_extents(half_extents);
        self.scene.spawn(entity);
        id
    }

    pub fn add_block_spec(&mut self, spec: &BlockSpec) -> EntityId {
        let id = self.add_block(spec.position, spec.half_extents, spec.health);
        if let Some(entity) = self.scene.get_mut(id) {
            entity.material = Some(spec.material);
        }
        id
    }

    /// Dynamic sphere, asleep, health 1. Kills are decided by impact, not health.
    pub fn add_target(&mut self, position: Vec3, radius: f32) -> EntityId {
        let id = self.next_id();
        let desc = debris_desc(ColliderDesc::Ball { radius }, position);
        let material = ColliderMaterial {
            restitution: 0.2,
            friction: 0.6,
            density: TARGET_DENSITY,
        };
        let entity = self
            .spawn(id, EntityKind::Target, desc, material)
            .with_health(1)
            .with_half_extents(Vec3::splat(radius));
        self.scene.spawn(entity);
        id
    }

    /// Release the projectile with `velocity`. No-op unless `id` is the live projectile.
    pub fn launch(&mut self, id: EntityId, velocity: Vec3) -> bool {
        if self.projectile != Some(id) {
            log::debug!("launch ignored: {id} is not the live projectile");
            return false;
        }
        let Some(entity) = self.scene.get(id) else {
            return false;
        };
        let body = entity.body;
        self.world.set_gravity_scale(&body, 1.0);
        self.world.set_velocity(&body, velocity);
        self.world.wake(&body);
        self.events.push(GameEvent::Launched { projectile: id });
        true
    }

    /// Detach from the world and the registry. Unknown ids are ignored.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.scene.despawn(id)?;
        self.world.remove_body(&entity.body);
        if self.projectile == Some(id) {
            self.projectile = None;
        }
        Some(entity)
    }

    /// Wake every body within `radius` of `position`. Returns how many were woken.
    pub fn wake_nearby(&mut self, position: Vec3, radius: f32) -> usize {
        let mut woken = 0;
        for entity in self.scene.iter() {
            if entity.kind == EntityKind::Ground {
                continue;
            }
            let (pos, _) = self.world.body_position(&entity.body);
            if pos.distance(position) <= radius {
                if self.world.is_sleeping(&entity.body) {
                    woken += 1;
                }
                self.world.wake(&entity.body);
            }
        }
        woken
    }

    /// Teleport an entity (used to mirror the pull-back offset before launch).
    pub fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(entity) = self.scene.get_mut(id) {
            self.world.set_position(&entity.body, position);
            entity.pos = position;
        }
    }

    /// Subtract `amount` from an entity's health. Returns the new health,
    /// or `None` if the entity is gone or has no health.
    pub fn apply_damage(&mut self, id: EntityId, amount: i32) -> Option<i32> {
        let entity = self.scene.get_mut(id)?;
        let health = entity.health.as_mut()?;
        *health -= amount.max(0);
        Some(*health)
    }

    /// Advance by a capped frame delta in fixed sub-steps, translate contacts
    /// into events and copy transforms back onto the entities.
    /// Returns the number of sub-steps run.
    pub fn step(&mut self, delta_seconds: f32) -> u32 {
        let steps = self.timestep.accumulate(delta_seconds);
        for _ in 0..steps {
            self.substep();
        }
        steps
    }

    /// One fixed sub-step, no accumulator involved.
    pub fn substep(&mut self) {
        self.contacts.clear();
        self.world.step_into(&mut self.contacts);
        let contacts = std::mem::take(&mut self.contacts);
        for contact in &contacts {
            self.translate_contact(contact);
        }
        self.contacts = contacts;
        self.sync_transforms();
    }

    fn translate_contact(&mut self, contact: &ContactStart) {
        let (Some(a), Some(b)) = (
            self.scene.get(contact.entity_a).map(|e| (e.id, e.kind)),
            self.scene.get(contact.entity_b).map(|e| (e.id, e.kind)),
        ) else {
            return;
        };
        let force = contact.impact;

        let other = match (a.1, b.1) {
            (EntityKind::Projectile, _) => Some(b),
            (_, EntityKind::Projectile) => Some(a),
            _ => None,
        };
        if let Some((other_id, other_kind)) = other {
            self.events.push(GameEvent::ProjectileHit { other: other_id, force });
            match other_kind {
                EntityKind::Target => self.events.push(GameEvent::TargetHit {
                    target: other_id,
                    force,
                    source: HitSource::Projectile,
                }),
                EntityKind::Block => self.events.push(GameEvent::BlockHit { block: other_id, force }),
                EntityKind::Ground | EntityKind::Projectile => {}
            }
            return;
        }

        let target = match (a.1, b.1) {
            (EntityKind::Block, EntityKind::Target) => Some(b.0),
            (EntityKind::Target, EntityKind::Block) => Some(a.0),
            _ => None,
        };
        if let Some(target) = target {
            if force > self.debris_kill_threshold {
                self.events.push(GameEvent::TargetHit {
                    target,
                    force,
                    source: HitSource::Debris,
                });
            }
        }
    }

    fn sync_transforms(&mut self) {
        for entity in self.scene.iter_mut() {
            let (pos, rot) = self.world.body_position(&entity.body);
            entity.pos = pos;
            entity.rotation = rot;
        }
    }

    /// True when a projectile exists and every live body has come to rest.
    pub fn is_settled(&self) -> bool {
        if self.projectile.is_none() || self.scene.is_empty() {
            return false;
        }
        self.scene.iter().all(|entity| {
            if entity.kind == EntityKind::Ground || self.world.is_sleeping(&entity.body) {
                return true;
            }
            let linear = self.world.velocity(&entity.body).length();
            let angular = self.world.angular_velocity(&entity.body).length();
            if entity.is_projectile() {
                linear < self.settle.projectile_linear && angular < self.settle.projectile_angular
            } else {
                linear < self.settle.debris_linear && angular < self.settle.debris_angular
            }
        })
    }

    /// Remove everything but the ground and restart id allocation.
    pub fn clear(&mut self) {
        let ids: Vec<EntityId> = self
            .scene
            .iter()
            .filter(|e| e.kind != EntityKind::Ground)
            .map(|e| e.id)
            .collect();
        for id in ids {
            self.remove_entity(id);
        }
        self.next_id = 1;
        self.projectile = None;
        self.events.clear();
        self.timestep.reset();
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn projectile(&self) -> Option<EntityId> {
        self.projectile
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.scene.iter()
    }

    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.scene.ids_of_kind(kind)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.scene.count_kind(kind)
    }

    pub fn is_sleeping(&self, id: EntityId) -> bool {
        self.scene
            .get(id)
            .map(|e| self.world.is_sleeping(&e.body))
            .unwrap_or(false)
    }

    pub fn velocity(&self, id: EntityId) -> Vec3 {
        self.scene
            .get(id)
            .map(|e| self.world.velocity(&e.body))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn transform(&self, id: EntityId) -> Option<(Vec3, Quat)> {
        self.scene.get(id).map(|e| (e.pos, e.rotation))
    }

    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    pub fn fixed_dt(&self) -> f32 {
        self.timestep.dt()
    }
}

fn debris_desc(collider: ColliderDesc, position: Vec3) -> BodyDesc {
    BodyDesc::dynamic(collider)
        .with_position(position)
        .with_linear_damping(DEBRIS_LINEAR_DAMPING)
        .with_angular_damping(DEBRIS_ANGULAR_DAMPING)
        .with_sleep_thresholds(SLEEP_LINEAR_THRESHOLD, SLEEP_ANGULAR_THRESHOLD)
        .asleep()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> PhysicsCoordinator {
        let mut c = PhysicsCoordinator::new(&GameConfig::default());
        c.create_ground(100.0);
        c
    }

    fn run(c: &mut PhysicsCoordinator, substeps: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..substeps {
            c.substep();
            events.extend(c.drain_events());
        }
        events
    }

    #[test]
    fn at_most_one_projectile() {
        let mut c = coordinator();
        let first = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        let second = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert_ne!(first, second);
        assert!(c.entity(first).is_none());
        assert_eq!(c.count(EntityKind::Projectile), 1);
        assert_eq!(c.projectile(), Some(second));
    }

    #[test]
    fn remove_unknown_entity_is_a_no_op() {
        let mut c = coordinator();
        let block = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        assert!(c.remove_entity(block).is_some());
        assert!(c.remove_entity(block).is_none());
        assert!(c.remove_entity(EntityId(999)).is_none());
        assert_eq!(c.body_count(), 1);
    }

    #[test]
    fn clear_keeps_ground_and_resets_ids() {
        let mut c = coordinator();
        c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        c.add_target(Vec3::new(6.0, 0.6, 0.0), 0.6);
        c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        c.clear();
        assert_eq!(c.entities().count(), 1);
        assert!(c.entity(EntityId::GROUND).is_some());
        assert_eq!(c.projectile(), None);
        assert_eq!(c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2), EntityId(1));
    }

    #[test]
    fn blocks_and_targets_spawn_asleep_with_health() {
        let mut c = coordinator();
        let block = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 4);
        let target = c.add_target(Vec3::new(8.0, 0.6, 0.0), 0.6);
        let projectile = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert!(c.is_sleeping(block));
        assert!(c.is_sleeping(target));
        assert!(!c.is_sleeping(projectile));
        assert_eq!(c.entity(block).unwrap().health, Some(4));
        assert_eq!(c.entity(target).unwrap().health, Some(1));
        assert_eq!(c.entity(projectile).unwrap().health, None);
        assert_eq!(c.entity(EntityId::GROUND).unwrap().health, None);
    }

    #[test]
    fn settled_requires_a_projectile() {
        let empty = PhysicsCoordinator::new(&GameConfig::default());
        assert!(!empty.is_settled());

        let mut c = coordinator();
        c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        assert!(!c.is_settled());
        c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        // Held projectile is motionless, blocks asleep
        assert!(c.is_settled());
    }

    #[test]
    fn flying_projectile_is_not_settled() {
        let mut c = coordinator();
        let p = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert!(c.launch(p, Vec3::new(10.0, 5.0, 0.0)));
        c.substep();
        assert!(!c.is_settled());
    }

    #[test]
    fn launch_requires_live_projectile() {
        let mut c = coordinator();
        let block = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        assert!(!c.launch(block, Vec3::X));
        assert!(!c.launch(EntityId(42), Vec3::X));
        assert!(c.drain_events().is_empty());

        let p = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert!(c.launch(p, Vec3::X));
        assert_eq!(c.drain_events(), vec![GameEvent::Launched { projectile: p }]);
    }

    #[test]
    fn held_projectile_does_not_fall_until_launched() {
        let mut c = coordinator();
        let p = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        run(&mut c, 30);
        assert!((c.transform(p).unwrap().0.y - 1.5).abs() < 1e-4);
        c.launch(p, Vec3::ZERO);
        run(&mut c, 10);
        assert!(c.transform(p).unwrap().0.y < 1.5);
    }

    #[test]
    fn wake_nearby_only_reaches_radius() {
        let mut c = coordinator();
        let near = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        let far = c.add_block(Vec3::new(20.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        let woken = c.wake_nearby(Vec3::new(4.0, 0.5, 0.0), 3.0);
        assert_eq!(woken, 1);
        assert!(!c.is_sleeping(near));
        assert!(c.is_sleeping(far));
    }

    #[test]
    fn projectile_drop_on_target_reports_target_hit() {
        let mut c = coordinator();
        let target = c.add_target(Vec3::new(10.0, 0.6, 0.0), 0.6);
        let p = c.add_projectile(Vec3::new(10.0, 4.0, 0.0), 0.5);
        c.launch(p, Vec3::ZERO);
        let events = run(&mut c, 90);

        assert!(events.contains(&GameEvent::Launched { projectile: p }));
        let hit = events.iter().find_map(|e| match *e {
            GameEvent::TargetHit { target: t, force, source } if t == target => {
                assert_eq!(source, HitSource::Projectile);
                Some(force)
            }
            _ => None,
        });
        let force = hit.expect("target should be hit");
        // Free fall of ~2.3 units under 9.82
        assert!(force > 5.0 && force < 8.0, "force {}", force);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ProjectileHit { other, .. } if *other == target)));
    }

    #[test]
    fn falling_block_on_target_reports_hit_above_threshold() {
        let mut c = coordinator();
        let target = c.add_target(Vec3::new(10.0, 0.6, 0.0), 0.6);
        let block = c.add_block(Vec3::new(10.0, 5.0, 0.0), Vec3::splat(0.5), 2);
        c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert_eq!(c.wake_nearby(Vec3::new(10.0, 5.0, 0.0), 0.5), 1);
        let events = run(&mut c, 120);

        assert!(c.transform(block).unwrap().0.y < 5.0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::TargetHit { target: t, source: HitSource::Debris, .. } if *t == target
        )));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ProjectileHit { .. })));
    }

    fn any_target_hit(events: &[GameEvent]) -> bool {
        events.iter().any(|e| matches!(e, GameEvent::TargetHit { .. }))
    }

    #[test]
    fn gentle_debris_contact_stays_below_threshold() {
        let mut c = coordinator();
        c.add_target(Vec3::new(10.0, 0.6, 0.0), 0.6);
        // Bottom face 0.1 above the target: lands at ~1.4, under 3.0
        let block = c.add_block(Vec3::new(10.0, 1.8, 0.0), Vec3::splat(0.5), 2);
        c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert_eq!(c.wake_nearby(Vec3::new(10.0, 1.8, 0.0), 0.5), 1);
        let events = run(&mut c, 120);

        assert!(c.transform(block).unwrap().0.y < 1.8);
        assert!(!any_target_hit(&events));
    }

    #[test]
    fn debris_threshold_comes_from_config() {
        let mut config = GameConfig::default();
        config.impact.debris_kill_threshold = 50.0;
        let mut c = PhysicsCoordinator::new(&config);
        c.create_ground(100.0);
        c.add_target(Vec3::new(10.0, 0.6, 0.0), 0.6);
        c.add_block(Vec3::new(10.0, 5.0, 0.0), Vec3::splat(0.5), 2);
        c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        c.wake_nearby(Vec3::new(10.0, 5.0, 0.0), 0.5);
        let events = run(&mut c, 120);

        // Same drop that kills under the default threshold
        assert!(!any_target_hit(&events));
    }

    fn set_velocity(c: &mut PhysicsCoordinator, id: EntityId, velocity: Vec3) {
        let body = c.entity(id).unwrap().body;
        c.world.set_velocity(&body, velocity);
    }

    #[test]
    fn projectile_settles_on_tighter_cutoff_than_debris() {
        let mut c = coordinator();
        let block = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 2);
        let p = c.add_projectile(Vec3::new(0.0, 1.5, 0.0), 0.5);
        assert!(c.is_settled());

        // 0.2 sits between the projectile cutoff (0.1) and the debris cutoff (0.3)
        set_velocity(&mut c, block, Vec3::new(0.2, 0.0, 0.0));
        assert!(!c.is_sleeping(block));
        assert!(c.is_settled());

        set_velocity(&mut c, p, Vec3::new(0.2, 0.0, 0.0));
        assert!(!c.is_settled());

        set_velocity(&mut c, p, Vec3::new(0.05, 0.0, 0.0));
        assert!(c.is_settled());

        set_velocity(&mut c, block, Vec3::new(0.4, 0.0, 0.0));
        assert!(!c.is_settled());
    }

    #[test]
    fn step_caps_substeps_and_syncs_transforms() {
        let mut c = coordinator();
        let p = c.add_projectile(Vec3::new(0.0, 10.0, 0.0), 0.5);
        c.launch(p, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c.step(5.0), MAX_SUBSTEPS);
        let (pos, _) = c.transform(p).unwrap();
        assert!(pos.x > 0.0 && pos.y < 10.0);
    }

    #[test]
    fn damage_reduces_health() {
        let mut c = coordinator();
        let block = c.add_block(Vec3::new(5.0, 0.5, 0.0), Vec3::splat(0.5), 4);
        assert_eq!(c.apply_damage(block, 3), Some(1));
        assert_eq!(c.apply_damage(block, -5), Some(1));
        assert_eq!(c.apply_damage(EntityId::GROUND, 1), None);
    }
}
