use bytemuck::{Pod, Zeroable};

/// Per-entity render data handed to the external renderer.
/// 16 floats = 64 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    /// Opaque visual handle, as a float.
    pub visual: f32,
    /// `EntityKind::code`.
    pub kind: f32,
    /// `Material::code`, or -1 for non-blocks.
    pub material: f32,
    /// Remaining health, 0 when the entity has none.
    pub health: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub hx: f32,
    pub hy: f32,
    pub hz: f32,
    /// 1.0 for see-through materials.
    pub transparent: f32,
    pub _pad: f32,
}

impl EntityInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Flat buffer of entity instances, rebuilt every frame.
pub struct RenderBuffer {
    pub instances: Vec<EntityInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: EntityInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for the host to read.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_instance_is_16_floats() {
        assert_eq!(std::mem::size_of::<EntityInstance>(), EntityInstance::STRIDE_BYTES);
        assert_eq!(EntityInstance::FLOATS, 16);
    }

    #[test]
    fn floats_view_follows_field_order() {
        let mut buf = RenderBuffer::new();
        buf.push(EntityInstance {
            visual: 7.0,
            y: 2.5,
            ..Default::default()
        });
        buf.push(EntityInstance::default());
        assert_eq!(buf.instance_count(), 2);
        let floats = buf.as_floats();
        assert_eq!(floats.len(), 32);
        assert_eq!(floats[0], 7.0);
        assert_eq!(floats[5], 2.5);
    }
}
