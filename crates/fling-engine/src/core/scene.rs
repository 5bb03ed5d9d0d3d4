use crate::api::types::{EntityId, EntityKind};
use crate::components::entity::Entity;

/// Entity arena using a flat Vec, keyed by `EntityId`.
/// Designed for small entity counts (dozens to hundreds). Insertion order is
/// preserved, so iteration is deterministic.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Ids of all entities of the given kind, in insertion order.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial, PhysicsWorld};
    use glam::Vec3;

    fn entity(world: &mut PhysicsWorld, id: u32, kind: EntityKind) -> Entity {
        let body = world.create_body(
            EntityId(id),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 }),
            ColliderMaterial::default(),
        );
        Entity::new(EntityId(id), kind, body)
    }

    #[test]
    fn spawn_and_get() {
        let mut world = PhysicsWorld::new(Vec3::ZERO, 1.0 / 60.0);
        let mut scene = Scene::new();
        scene.spawn(entity(&mut world, 1, EntityKind::Block).with_pos(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec3::new(1.0, 2.0, 3.0));
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn despawn_is_idempotent() {
        let mut world = PhysicsWorld::new(Vec3::ZERO, 1.0 / 60.0);
        let mut scene = Scene::new();
        scene.spawn(entity(&mut world, 1, EntityKind::Target));
        assert!(scene.despawn(EntityId(1)).is_some());
        assert!(scene.despawn(EntityId(1)).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn kind_queries_keep_insertion_order() {
        let mut world = PhysicsWorld::new(Vec3::ZERO, 1.0 / 60.0);
        let mut scene = Scene::new();
        scene.spawn(entity(&mut world, 3, EntityKind::Block));
        scene.spawn(entity(&mut world, 1, EntityKind::Target));
        scene.spawn(entity(&mut world, 2, EntityKind::Block));
        assert_eq!(scene.ids_of_kind(EntityKind::Block), vec![EntityId(3), EntityId(2)]);
        assert_eq!(scene.count_kind(EntityKind::Target), 1);
    }
}
