use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{GLASS_HEALTH, STONE_HEALTH, WOOD_HEALTH};

/// Block material. Only health and the render hint differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Wood,
    Stone,
    Glass,
}

impl Material {
    pub fn health(self) -> i32 {
        match self {
            Material::Wood => WOOD_HEALTH,
            Material::Stone => STONE_HEALTH,
            Material::Glass => GLASS_HEALTH,
        }
    }

    /// Render hint: glass is drawn see-through.
    pub fn is_transparent(self) -> bool {
        self == Material::Glass
    }

    pub fn code(self) -> f32 {
        match self {
            Material::Wood => 0.0,
            Material::Stone => 1.0,
            Material::Glass => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub position: Vec3,
    pub half_extents: Vec3,
    pub material: Material,
    pub health: i32,
}

impl BlockSpec {
    pub fn new(position: Vec3, half_extents: Vec3, material: Material) -> Self {
        Self {
            position,
            half_extents,
            material,
            health: material.health(),
        }
    }
}

/// Targets share one physical profile, so only the position varies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub position: Vec3,
}

/// Everything needed to build one level. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub level: u32,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub ammo: u32,
}

impl LevelDescriptor {
    pub fn empty(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
