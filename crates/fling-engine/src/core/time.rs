/// Fixed timestep accumulator.
/// Turns variable frame deltas into a bounded number of fixed physics sub-steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per sub-step.
    dt: f32,
    /// Upper bound on sub-steps per frame.
    max_steps: u32,
    /// Frame deltas are clamped to this before accumulation.
    max_frame_dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32, max_frame_dt: f32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            max_frame_dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// A NaN or infinite delta counts as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() {
            return self.accumulate(0.0);
        }
        let frame_dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += frame_dt;
        let steps = ((self.accumulator / self.dt) as u32).min(self.max_steps);
        self.accumulator -= steps as f32 * self.dt;
        // Drop whatever the step cap left behind, no unbounded catch-up
        self.accumulator = self.accumulator.min(self.dt);
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
