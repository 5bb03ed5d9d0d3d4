//! Structure layouts.
//!
//! Every template draws from the level's RNG stream in a fixed order, so the
//! same stream always produces the same layout. Placement goes through
//! [`StructureBuilder`], which refuses anything past the structure's budget.

use glam::Vec3;

use crate::constants::{BLOCK_HALF, PLANK_HALF_THICKNESS, TARGET_RADIUS};
use crate::level::rng::Lcg;
use crate::level::spec::{BlockSpec, Material, TargetSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Stack,
    Tower,
    Wall,
    Platforms,
    Fortress,
}

impl Template {
    pub const ALL: [Template; 5] = [
        Template::Stack,
        Template::Tower,
        Template::Wall,
        Template::Platforms,
        Template::Fortress,
    ];

    /// Uniform draw over the five templates.
    pub fn draw(rng: &mut Lcg) -> Template {
        Template::ALL[rng.next_int(Template::ALL.len() as u32) as usize]
    }

    pub fn build(self, b: &mut StructureBuilder<'_>) {
        match self {
            Template::Stack => stack(b),
            Template::Tower => tower(b),
            Template::Wall => wall(b),
            Template::Platforms => platforms(b),
            Template::Fortress => fortress(b),
        }
    }
}

/// Budgeted sink for one structure's blocks and targets.
pub struct StructureBuilder<'a> {
    pub rng: &'a mut Lcg,
    pub anchor: Vec3,
    block_budget: u32,
    target_budget: u32,
    pub blocks: Vec<BlockSpec>,
    pub targets: Vec<TargetSpec>,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(rng: &'a mut Lcg, anchor: Vec3, block_budget: u32, target_budget: u32) -> Self {
        Self {
            rng,
            anchor,
            block_budget,
            target_budget,
            blocks: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn blocks_left(&self) -> u32 {
        self.block_budget - self.blocks.len() as u32
    }

    pub fn targets_left(&self) -> u32 {
        self.target_budget - self.targets.len() as u32
    }

    /// Place a block at `offset` from the anchor. False once the budget is spent.
    pub fn block(&mut self, offset: Vec3, half_extents: Vec3, material: Material) -> bool {
        if self.blocks_left() == 0 {
            return false;
        }
        self.blocks
            .push(BlockSpec::new(self.anchor + offset, half_extents, material));
        true
    }

    pub fn target(&mut self, offset: Vec3) -> bool {
        if self.targets_left() == 0 {
            return false;
        }
        self.targets.push(TargetSpec {
            position: self.anchor + offset,
        });
        true
    }
}

/// Offset of item `i` of `n` centred on zero with the given spacing.
fn spread(i: u32, n: u32, spacing: f32) -> f32 {
    (i as f32 - (n.saturating_sub(1)) as f32 / 2.0) * spacing
}

fn cube() -> Vec3 {
    Vec3::splat(BLOCK_HALF)
}

/// Material for stack layers: the base favours stone, upper layers mix all three.
fn layer_material(rng: &mut Lcg, layer: u32) -> Material {
    let r = rng.next_f64();
    if layer == 0 {
        if r < 0.7 {
            Material::Stone
        } else {
            Material::Wood
        }
    } else if r < 0.15 {
        Material::Glass
    } else if r < 0.4 {
        Material::Stone
    } else {
        Material::Wood
    }
}

/// Horizontal layers of cubes, bottom-up, targets on top.
fn stack(b: &mut StructureBuilder<'_>) {
    let width = 2 + b.rng.next_int(2);
    let size = BLOCK_HALF * 2.0;
    let mut layer = 0;
    'layers: while b.blocks_left() > 0 {
        for col in 0..width {
            let material = layer_material(b.rng, layer);
            let offset = Vec3::new(0.0, BLOCK_HALF + layer as f32 * size, spread(col, width, size));
            if !b.block(offset, cube(), material) {
                break 'layers;
            }
        }
        layer += 1;
    }

    let top = layer as f32 * size;
    let n = b.targets_left();
    for i in 0..n {
        b.target(Vec3::new(0.0, top + TARGET_RADIUS, spread(i, n, TARGET_RADIUS * 2.0)));
    }
}

/// A vertical column with symmetric side supports, a target on the summit.
fn tower(b: &mut StructureBuilder<'_>) {
    let size = BLOCK_HALF * 2.0;
    let pairs = if b.blocks_left() >= 5 { 1 + b.rng.next_int(2) } else { 0 };
    let height = b.blocks_left().saturating_sub(pairs * 2).max(1);

    for level in 0..height {
        let material = if b.rng.chance(0.5) { Material::Stone } else { Material::Wood };
        b.block(Vec3::new(0.0, BLOCK_HALF + level as f32 * size, 0.0), cube(), material);
    }
    for level in 0..pairs {
        let y = BLOCK_HALF + level as f32 * size;
        b.block(Vec3::new(0.0, y, -size), cube(), Material::Wood);
        b.block(Vec3::new(0.0, y, size), cube(), Material::Wood);
    }

    let summit = b.blocks.len().min(height as usize) as f32 * size;
    b.target(Vec3::new(0.0, summit + TARGET_RADIUS, 0.0));
    let n = b.targets_left();
    for i in 0..n {
        b.target(Vec3::new(1.6, TARGET_RADIUS, spread(i, n, 1.3)));
    }
}

/// A multi-row wall with targets either behind it or along its top.
fn wall(b: &mut StructureBuilder<'_>) {
    let size = BLOCK_HALF * 2.0;
    let cols = 3 + b.rng.next_int(3);
    let rows = b.blocks_left().div_ceil(cols).min(4);
    let behind = b.rng.chance(0.5);

    let mut built_rows = 0;
    'rows: for row in 0..rows {
        for col in 0..cols {
            let r = b.rng.next_f64();
            let material = if r < 0.6 {
                Material::Wood
            } else if r < 0.85 {
                Material::Stone
            } else {
                Material::Glass
            };
            let offset = Vec3::new(0.0, BLOCK_HALF + row as f32 * size, spread(col, cols, size));
            if !b.block(offset, cube(), material) {
                break 'rows;
            }
        }
        built_rows = row + 1;
    }

    let n = b.targets_left();
    for i in 0..n {
        let offset = if behind {
            Vec3::new(2.0, TARGET_RADIUS, spread(i, n, 1.3))
        } else {
            Vec3::new(0.0, built_rows as f32 * size + TARGET_RADIUS, spread(i, n, 1.3))
        };
        b.target(offset);
    }
}

/// Pillar-supported decks, one target per deck.
fn platforms(b: &mut StructureBuilder<'_>) {
    let n = b.targets_left();
    for i in 0..n {
        let z = spread(i, n, 2.8);
        if b.blocks_left() < 3 {
            b.target(Vec3::new(0.0, TARGET_RADIUS, z));
            continue;
        }
        let height = 1.0 + b.rng.next_int(3) as f32 * 0.5;
        let pillar_material = if b.rng.chance(0.5) { Material::Stone } else { Material::Wood };
        let pillar = Vec3::new(0.25, height / 2.0, 0.25);
        b.block(Vec3::new(0.0, height / 2.0, z - 0.6), pillar, pillar_material);
        b.block(Vec3::new(0.0, height / 2.0, z + 0.6), pillar, pillar_material);
        b.block(
            Vec3::new(0.0, height + PLANK_HALF_THICKNESS, z),
            Vec3::new(0.9, PLANK_HALF_THICKNESS, 0.9),
            Material::Wood,
        );
        b.target(Vec3::new(0.0, height + PLANK_HALF_THICKNESS * 2.0 + TARGET_RADIUS, z));
    }
}

/// Walled perimeter with corner pillars and a roof, targets inside.
fn fortress(b: &mut StructureBuilder<'_>) {
    let half = 1.75 + b.rng.next_int(2) as f32 * 0.5;
    let height = 2 + b.rng.next_int(2);
    let h = height as f32;

    let pillar = Vec3::new(0.35, h / 2.0, 0.35);
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        b.block(Vec3::new(sx * half, h / 2.0, sz * half), pillar, Material::Stone);
    }

    let span = half - 0.4;
    for level in 0..height {
        let y = BLOCK_HALF + level as f32;
        for (offset, extents) in [
            (Vec3::new(-half, y, 0.0), Vec3::new(0.25, BLOCK_HALF, span)),
            (Vec3::new(half, y, 0.0), Vec3::new(0.25, BLOCK_HALF, span)),
            (Vec3::new(0.0, y, -half), Vec3::new(span, BLOCK_HALF, 0.25)),
            (Vec3::new(0.0, y, half), Vec3::new(span, BLOCK_HALF, 0.25)),
        ] {
            let r = b.rng.next_f64();
            let material = if r < 0.2 {
                Material::Glass
            } else if r < 0.5 {
                Material::Stone
            } else {
                Material::Wood
            };
            b.block(offset, extents, material);
        }
    }

    b.block(
        Vec3::new(0.0, h + PLANK_HALF_THICKNESS, 0.0),
        Vec3::new(half + 0.4, PLANK_HALF_THICKNESS, half + 0.4),
        Material::Wood,
    );

    let n = b.targets_left();
    let inside = n.min(2);
    for i in 0..inside {
        b.target(Vec3::new(0.0, TARGET_RADIUS, spread(i, inside, 1.3)));
    }
    let outside = n - inside;
    for i in 0..outside {
        b.target(Vec3::new(half + 1.4, TARGET_RADIUS, spread(i, outside, 1.3)));
    }
}
