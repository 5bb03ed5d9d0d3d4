/// Where the game loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Menu,
    /// A projectile is held at the launcher, waiting for input.
    Aiming,
    /// In flight, inside the settle grace period.
    Launched,
    /// Polling the world for rest.
    Settling,
    LevelComplete,
    GameOver,
}

/// Session state. Owned and mutated only by the game flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    pub level: u32,
    /// Points scored in the current level.
    pub score: u32,
    /// Points banked from finished levels.
    pub total_score: u32,
    pub ammo: u32,
    pub targets_remaining: u32,
    pub blocks_remaining: u32,
    /// Advanced once per level transition, never on retry.
    pub seed: u32,
    pub phase: Phase,
    pub started: bool,
    pub paused: bool,
    /// An aim gesture is in progress.
    pub aiming: bool,
}

impl GameProgress {
    pub fn new(seed: u32) -> Self {
        Self {
            level: 1,
            score: 0,
            total_score: 0,
            ammo: 0,
            targets_remaining: 0,
            blocks_remaining: 0,
            seed,
            phase: Phase::Menu,
            started: false,
            paused: false,
            aiming: false,
        }
    }

    /// Full reset for a new game.
    pub fn reset(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    /// Partial reset on level load: per-level fields go, cumulative score and seed stay.
    pub fn begin_level(&mut self, level: u32, ammo: u32, targets: u32, blocks: u32) {
        self.level = level;
        self.score = 0;
        self.ammo = ammo;
        self.targets_remaining = targets;
        self.blocks_remaining = blocks;
        self.paused = false;
        self.aiming = false;
        self.phase = Phase::Aiming;
    }

    /// Cumulative score including the level in progress.
    pub fn running_total(&self) -> u32 {
        self.total_score + self.score
    }

    pub fn is_playing(&self) -> bool {
        self.started
            && !self.paused
            && matches!(self.phase, Phase::Aiming | Phase::Launched | Phase::Settling)
    }

    pub fn is_waiting_for_settle(&self) -> bool {
        matches!(self.phase, Phase::Launched | Phase::Settling)
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase == Phase::LevelComplete
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SEED)
    }
}
