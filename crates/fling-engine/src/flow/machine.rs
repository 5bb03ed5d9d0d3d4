//! Game flow: level lifecycle, aiming, shot resolution and scoring policy.
//!
//! The coordinator reports contacts; everything that turns a contact into
//! points, damage or a level outcome lives here.

use glam::Vec3;

use crate::api::events::{EventBus, HandlerError, SubscriptionId};
use crate::api::game::GameConfig;
use crate::api::telemetry::{LevelSummary, ScoreReporter, Telemetry};
use crate::api::types::{EntityId, EntityKind, GameEvent, Topic};
use crate::constants::{BLOCK_POINTS, GROUND_SIZE, TARGET_POINTS};
use crate::flow::progress::{GameProgress, Phase};
use crate::input::queue::{AimInput, InputQueue};
use crate::level::generator::generate;
use crate::level::rng::advance_seed;
use crate::level::spec::LevelDescriptor;
use crate::systems::coordinator::PhysicsCoordinator;
use crate::systems::trajectory::Trajectory;

pub struct GameFlow {
    config: GameConfig,
    coordinator: PhysicsCoordinator,
    bus: EventBus,
    telemetry: Telemetry,
    progress: GameProgress,
    input: InputQueue,
    /// Seconds since launch, reset on every launch.
    shot_time: f32,
    /// Pull-back offset of the current aim gesture.
    pull: Vec3,
    preview: Vec<Vec3>,
    /// Everything published since the last `take_events`.
    published: Vec<GameEvent>,
}

impl GameFlow {
    pub fn new(config: GameConfig) -> Self {
        let mut coordinator = PhysicsCoordinator::new(&config);
        coordinator.create_ground(GROUND_SIZE);
        Self {
            coordinator,
            bus: EventBus::new(),
            telemetry: Telemetry::offline(),
            progress: GameProgress::new(config.seed),
            input: InputQueue::new(),
            shot_time: 0.0,
            pull: Vec3::ZERO,
            preview: Vec::with_capacity(config.trajectory_samples),
            published: Vec::new(),
            config,
        }
    }

    // -- Collaborators --

    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) -> Result<(), HandlerError> + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(topic, handler)
    }

    /// Install or remove the score reporter. `None` means offline.
    pub fn set_reporter(&mut self, reporter: Option<Box<dyn ScoreReporter>>) {
        self.telemetry.set_reporter(reporter);
    }

    // -- Queries --

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn phase(&self) -> Phase {
        self.progress.phase
    }

    pub fn coordinator(&self) -> &PhysicsCoordinator {
        &self.coordinator
    }

    /// Current aim forecast. Empty when not aiming.
    pub fn trajectory_preview(&self) -> &[Vec3] {
        &self.preview
    }

    /// Take every event published since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.published)
    }

    pub fn push_input(&mut self, input: AimInput) {
        self.input.push(input);
    }

    fn publish(&mut self, event: GameEvent) {
        self.bus.emit(&event);
        self.published.push(event);
    }

    // -- Level lifecycle --

    /// Start over from level 1. `seed` overrides the configured seed.
    pub fn new_game(&mut self, seed: Option<u32>) {
        let seed = seed.unwrap_or(self.config.seed);
        log::info!("new game with seed {seed}");
        self.progress.reset(seed);
        self.progress.started = true;
        self.load_level(1);
    }

    /// Generate and load `level` from the current seed.
    pub fn load_level(&mut self, level: u32) {
        let descriptor = generate(self.progress.seed, level);
        self.load_descriptor(&descriptor);
    }

    /// Tear down the world and build `descriptor` in its place.
    pub(crate) fn load_descriptor(&mut self, descriptor: &LevelDescriptor) {
        self.coordinator.clear();
        self.coordinator.create_ground(GROUND_SIZE);
        self.input.clear();
        self.preview.clear();
        self.pull = Vec3::ZERO;
        self.shot_time = 0.0;

        for block in &descriptor.blocks {
            self.coordinator.add_block_spec(block);
        }
        for target in &descriptor.targets {
            self.coordinator.add_target(target.position, self.config.target_radius);
        }
        self.progress.started = true;
        self.progress.begin_level(
            descriptor.level,
            descriptor.ammo,
            descriptor.targets.len() as u32,
            descriptor.blocks.len() as u32,
        );
        log::info!(
            "level {} loaded: {} blocks, {} targets, {} shots",
            descriptor.level,
            descriptor.blocks.len(),
            descriptor.targets.len(),
            descriptor.ammo
        );
        self.publish(GameEvent::LevelStart {
            level: descriptor.level,
        });

        if self.progress.targets_remaining == 0 {
            self.complete_level();
        } else if self.progress.ammo == 0 {
            self.game_over();
        } else {
            self.spawn_projectile();
        }
    }

    /// Reload the same level. The seed is untouched, so the layout is identical.
    pub fn retry_level(&mut self) {
        if !self.progress.started {
            log::debug!("retry ignored: no game in progress");
            return;
        }
        self.publish(GameEvent::LevelReset);
        self.load_level(self.progress.level);
    }

    /// Bank the level score, advance the seed once and load the following level.
    /// Only valid once the current level is complete.
    pub fn next_level(&mut self) {
        if self.progress.phase != Phase::LevelComplete {
            log::debug!("next level ignored in {:?}", self.progress.phase);
            return;
        }
        self.progress.total_score += self.progress.score;
        self.progress.score = 0;
        self.progress.seed = advance_seed(self.progress.seed);
        self.load_level(self.progress.level + 1);
    }

    pub fn return_to_menu(&mut self) {
        self.coordinator.clear();
        self.input.clear();
        self.preview.clear();
        self.progress.started = false;
        self.progress.paused = false;
        self.progress.aiming = false;
        self.progress.phase = Phase::Menu;
    }

    pub fn pause(&mut self) {
        if self.progress.started && self.progress.phase != Phase::Menu {
            self.progress.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.progress.paused = false;
    }

    fn spawn_projectile(&mut self) {
        self.coordinator
            .add_projectile(self.config.launcher, self.config.projectile_radius);
        self.pull = Vec3::ZERO;
        self.progress.aiming = false;
        self.progress.phase = Phase::Aiming;
    }

    fn complete_level(&mut self) {
        self.progress.phase = Phase::LevelComplete;
        log::info!(
            "level {} complete with {} points",
            self.progress.level,
            self.progress.score
        );
        self.publish(GameEvent::LevelComplete {
            level: self.progress.level,
            score: self.progress.score,
        });
        self.save_level(true);
    }

    fn game_over(&mut self) {
        self.progress.phase = Phase::GameOver;
        log::info!("game over on level {}", self.progress.level);
        self.publish(GameEvent::GameOver {
            level: self.progress.level,
            score: self.progress.score,
        });
        self.save_level(false);
    }

    fn save_level(&mut self, completed: bool) {
        self.telemetry.save_level(LevelSummary {
            level: self.progress.level,
            score: self.progress.score,
            total_score: self.progress.running_total(),
            completed,
        });
    }

    // -- Aiming --

    fn can_aim(&self) -> bool {
        self.progress.is_playing() && self.progress.phase == Phase::Aiming
    }

    pub fn aim_start(&mut self) {
        if !self.can_aim() {
            log::debug!("aim start ignored in {:?}", self.progress.phase);
            return;
        }
        self.progress.aiming = true;
        self.publish(GameEvent::AimStart);
    }

    /// Track the current pull and refresh the forecast.
    pub fn aim_update(&mut self, pull: Vec3, velocity: Vec3) {
        if !self.can_aim() || !self.progress.aiming {
            return;
        }
        self.pull = pull;
        let start = self.config.launcher + pull;
        self.preview.clear();
        self.preview.extend(Trajectory::from_config(&self.config, start, velocity));
        self.publish(GameEvent::AimUpdate {
            pull: Some(pull),
            velocity: Some(velocity),
            cancelled: false,
        });
    }

    pub fn aim_cancel(&mut self) {
        if !self.progress.aiming {
            return;
        }
        self.progress.aiming = false;
        self.pull = Vec3::ZERO;
        self.preview.clear();
        self.publish(GameEvent::AimUpdate {
            pull: None,
            velocity: None,
            cancelled: true,
        });
    }

    /// Fire the held projectile from the pulled-back position.
    pub fn aim_release(&mut self, velocity: Vec3) {
        if !self.can_aim() || self.progress.ammo == 0 {
            log::debug!("release ignored in {:?}", self.progress.phase);
            return;
        }
        let Some(projectile) = self.coordinator.projectile() else {
            log::debug!("release ignored: no projectile");
            return;
        };
        self.progress.aiming = false;
        self.preview.clear();
        self.publish(GameEvent::AimRelease { velocity });

        self.coordinator
            .set_position(projectile, self.config.launcher + self.pull);
        if !self.coordinator.launch(projectile, velocity) {
            return;
        }
        self.progress.ammo -= 1;
        self.progress.phase = Phase::Launched;
        self.shot_time = 0.0;
        self.dispatch_physics_events();
    }

    fn apply_input(&mut self, input: AimInput) {
        match input {
            AimInput::Start => self.aim_start(),
            AimInput::Update { pull, velocity } => self.aim_update(pull, velocity),
            AimInput::Release { velocity } => self.aim_release(velocity),
            AimInput::Cancel => self.aim_cancel(),
        }
    }

    // -- Frame --

    /// Advance one frame: queued input, physics, contact policy, settle timers.
    pub fn tick(&mut self, dt: f32) {
        if !self.progress.is_playing() {
            return;
        }
        let dt = if dt.is_finite() { dt } else { 0.0 };
        for input in self.input.drain() {
            self.apply_input(input);
        }

        self.coordinator.step(dt);
        self.dispatch_physics_events();

        if !self.progress.is_waiting_for_settle() {
            return;
        }
        self.shot_time += dt.clamp(0.0, self.config.max_frame_dt);
        let settle = self.config.settle;
        if self.progress.phase == Phase::Launched && self.shot_time >= settle.grace {
            self.progress.phase = Phase::Settling;
        }
        if self.progress.phase == Phase::Settling {
            let forced = self.shot_time >= settle.max_wait;
            if forced || self.coordinator.is_settled() {
                if forced {
                    log::debug!("forced settle after {:.2}s", self.shot_time);
                }
                self.resolve_shot();
            }
        }
    }

    fn resolve_shot(&mut self) {
        self.publish(GameEvent::ProjectileSettled);
        if let Some(projectile) = self.coordinator.projectile() {
            self.coordinator.remove_entity(projectile);
        }
        if self.progress.targets_remaining == 0 {
            self.complete_level();
        } else if self.progress.ammo == 0 {
            self.game_over();
        } else {
            self.spawn_projectile();
        }
    }

    fn dispatch_physics_events(&mut self) {
        for event in self.coordinator.drain_events() {
            self.publish(event);
            self.handle_event(&event);
        }
    }

    /// Scoring policy for a physics event. Events about entities that are
    /// already gone are ignored.
    pub fn handle_event(&mut self, event: &GameEvent) {
        let impact = self.config.impact;
        match *event {
            GameEvent::TargetHit { target, force, source } if force > impact.threshold_for(source) => {
                if let Some(pos) = self.live_position(target, EntityKind::Target) {
                    self.coordinator.remove_entity(target);
                    self.progress.targets_remaining = self.progress.targets_remaining.saturating_sub(1);
                    self.award(TARGET_POINTS);
                    self.publish(GameEvent::TargetKilled { target });
                    self.coordinator.wake_nearby(pos, impact.target_wake_radius);
                }
            }
            GameEvent::BlockHit { block, force } if force > impact.damage_threshold => {
                let Some(pos) = self.live_position(block, EntityKind::Block) else {
                    return;
                };
                let damage = (force / impact.damage_divisor).ceil() as i32;
                let Some(health) = self.coordinator.apply_damage(block, damage) else {
                    return;
                };
                if health <= 0 {
                    self.coordinator.remove_entity(block);
                    self.progress.blocks_remaining = self.progress.blocks_remaining.saturating_sub(1);
                    self.award(BLOCK_POINTS);
                    self.publish(GameEvent::BlockDestroyed { block });
                    self.coordinator.wake_nearby(pos, impact.block_wake_radius);
                }
            }
            _ => {}
        }
    }

    fn live_position(&self, id: EntityId, kind: EntityKind) -> Option<Vec3> {
        self.coordinator
            .entity(id)
            .filter(|e| e.kind == kind)
            .map(|e| e.pos)
    }

    fn award(&mut self, points: u32) {
        self.progress.score += points;
        self.telemetry.add_points(points);
        self.publish(GameEvent::ScoreChanged {
            score: self.progress.score,
            total: self.progress.running_total(),
        });
    }
}
