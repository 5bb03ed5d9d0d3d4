pub mod api;
pub mod components;
pub mod constants;
pub mod core;
pub mod flow;
pub mod input;
pub mod level;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::events::{EventBus, EventHandler, HandlerError, SubscriptionId};
pub use api::game::{ConfigError, GameConfig, ImpactConfig, SettleConfig};
pub use api::telemetry::{LevelSummary, ReportError, ScoreReporter, Telemetry};
pub use api::types::{EntityId, EntityKind, GameEvent, HitSource, Topic, VisualHandle, WireEvent};
pub use components::entity::Entity;
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, ContactStart, PhysicsBody, PhysicsWorld,
};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use flow::{GameFlow, GameProgress, Phase};
pub use input::queue::{AimInput, InputQueue};
pub use level::{
    advance_seed, budget, generate, BlockSpec, Lcg, LevelBudget, LevelDescriptor, Material,
    TargetSpec, Template,
};
pub use renderer::instance::{EntityInstance, RenderBuffer};
pub use systems::coordinator::PhysicsCoordinator;
pub use systems::render::build_render_buffer;
pub use systems::trajectory::Trajectory;
