use crate::components::entity::Entity;
use crate::renderer::instance::{EntityInstance, RenderBuffer};

pub fn entity_instance(entity: &Entity) -> EntityInstance {
    EntityInstance {
        visual: entity.visual.0 as f32,
        kind: entity.kind.code(),
        material: entity.material.map(|m| m.code()).unwrap_or(-1.0),
        health: entity.health.unwrap_or(0) as f32,
        x: entity.pos.x,
        y: entity.pos.y,
        z: entity.pos.z,
        qx: entity.rotation.x,
        qy: entity.rotation.y,
        qz: entity.rotation.z,
        qw: entity.rotation.w,
        hx: entity.half_extents.x,
        hy: entity.half_extents.y,
        hz: entity.half_extents.z,
        transparent: if entity.material.is_some_and(|m| m.is_transparent()) {
            1.0
        } else {
            0.0
        },
        _pad: 0.0,
    }
}

/// Rebuild the render buffer from the live entities, in registry order.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();
    for entity in entities {
        buffer.push(entity_instance(entity));
    }
}
