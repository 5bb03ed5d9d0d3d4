pub mod generator;
pub mod rng;
pub mod spec;
pub mod templates;

pub use generator::{budget, generate, LevelBudget};
pub use rng::{advance_seed, Lcg};
pub use spec::{BlockSpec, LevelDescriptor, Material, TargetSpec};
pub use templates::Template;
