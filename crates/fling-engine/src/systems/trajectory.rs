//! Aim preview. Integrates the same fixed-step semi-implicit Euler the live
//! world runs (velocity from gravity first, then position from velocity) and
//! yields every second sub-step.

use glam::Vec3;

use crate::api::game::GameConfig;

/// Sub-steps integrated between two emitted samples.
pub const SUBSTEPS_PER_SAMPLE: u32 = 2;

/// Lazy forecast of a launched projectile. Yields `samples` points, the first
/// being the start position. Once a sample reaches `ground_y` every later
/// sample repeats it.
#[derive(Debug, Clone)]
pub struct Trajectory {
    position: Vec3,
    velocity: Vec3,
    gravity: Vec3,
    dt: f32,
    ground_y: f32,
    remaining: usize,
    started: bool,
    grounded: bool,
}

impl Trajectory {
    pub fn new(start: Vec3, velocity: Vec3, gravity: Vec3, dt: f32, samples: usize) -> Self {
        Self {
            position: start,
            velocity,
            gravity,
            dt,
            ground_y: 0.0,
            remaining: samples,
            started: false,
            grounded: false,
        }
    }

    /// Forecast with the world's integration constants.
    pub fn from_config(config: &GameConfig, start: Vec3, velocity: Vec3) -> Self {
        Self::new(
            start,
            velocity,
            config.gravity,
            config.fixed_dt,
            config.trajectory_samples,
        )
    }

    pub fn with_ground(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self
    }

    fn integrate(&mut self) {
        for _ in 0..SUBSTEPS_PER_SAMPLE {
            self.velocity += self.gravity * self.dt;
            self.position += self.velocity * self.dt;
        }
        if self.position.y <= self.ground_y {
            self.position.y = self.ground_y;
            self.grounded = true;
        }
    }
}

impl Iterator for Trajectory {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        if !self.started {
            self.started = true;
        } else if !self.grounded {
            self.integrate();
        }
        Some(self.position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Trajectory {}

#[cfg(test)]
mod tests {
    use super::*;

    const G: Vec3 = Vec3::new(0.0, -9.82, 0.0);
    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn yields_exactly_the_sample_budget() {
        let t = Trajectory::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(8.0, 8.0, 0.0), G, DT, 60);
        assert_eq!(t.len(), 60);
        assert_eq!(t.count(), 60);
    }

    #[test]
    fn first_sample_is_the_start() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut t = Trajectory::new(start, Vec3::X, G, DT, 5);
        assert_eq!(t.next(), Some(start));
    }

    #[test]
    fn matches_semi_implicit_euler() {
        let v0 = Vec3::new(5.0, 6.0, 0.0);
        let points: Vec<Vec3> = Trajectory::new(Vec3::new(0.0, 10.0, 0.0), v0, G, DT, 4).collect();

        let mut p = Vec3::new(0.0, 10.0, 0.0);
        let mut v = v0;
        for _ in 0..SUBSTEPS_PER_SAMPLE * 3 {
            v += G * DT;
            p += v * DT;
        }
        assert!((points[3] - p).length() < 1e-5);
    }

    #[test]
    fn holds_at_ground_after_landing() {
        let points: Vec<Vec3> =
            Trajectory::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(3.0, 0.0, 0.0), G, DT, 60).collect();
        let first_ground = points
            .iter()
            .position(|p| p.y <= 0.0)
            .expect("should land within the horizon");
        let landing = points[first_ground];
        assert_eq!(landing.y, 0.0);
        assert!(points[first_ground..].iter().all(|p| *p == landing));
        assert!(points.iter().all(|p| p.y >= 0.0));
    }

    #[test]
    fn ground_height_is_configurable() {
        let points: Vec<Vec3> = Trajectory::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, G, DT, 60)
            .with_ground(0.5)
            .collect();
        assert_eq!(points.last().map(|p| p.y), Some(0.5));
    }

    #[test]
    fn from_config_uses_world_constants() {
        let config = GameConfig::default();
        let t = Trajectory::from_config(&config, Vec3::ZERO, Vec3::Y);
        assert_eq!(t.len(), config.trajectory_samples);
        assert_eq!(t.dt, config.fixed_dt);
        assert_eq!(t.gravity, config.gravity);
    }
}
