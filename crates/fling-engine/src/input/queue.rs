use glam::Vec3;

/// Aim gestures, already resolved to world-space vectors by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimInput {
    /// The player grabbed the projectile.
    Start,
    /// Pull-back offset from the launcher and the launch velocity it implies.
    Update { pull: Vec3, velocity: Vec3 },
    /// The player let go.
    Release { velocity: Vec3 },
    /// The gesture was abandoned; nothing launches.
    Cancel,
}

impl AimInput {
    /// Decode the flat `(kind, x, y, z, vx, vy, vz)` form the web bridge forwards.
    /// Kinds: 0 start, 1 update, 2 release, 3 cancel.
    pub fn from_raw(kind: u32, pull: Vec3, velocity: Vec3) -> Option<Self> {
        match kind {
            0 => Some(AimInput::Start),
            1 => Some(AimInput::Update { pull, velocity }),
            2 => Some(AimInput::Release { velocity }),
            3 => Some(AimInput::Cancel),
            _ => None,
        }
    }
}

/// A queue of aim gestures.
/// The host pushes between frames; the state machine drains once per tick.
pub struct InputQueue {
    events: Vec<AimInput>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: AimInput) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<AimInput> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = InputQueue::new();
        q.push(AimInput::Start);
        q.push(AimInput::Release { velocity: Vec3::X });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events, vec![AimInput::Start, AimInput::Release { velocity: Vec3::X }]);
        assert!(q.is_empty());
    }

    #[test]
    fn raw_kinds_decode() {
        let pull = Vec3::new(-1.0, 0.5, 0.0);
        let vel = Vec3::new(9.0, 4.0, 0.0);
        assert_eq!(
            AimInput::from_raw(1, pull, vel),
            Some(AimInput::Update { pull, velocity: vel })
        );
        assert_eq!(AimInput::from_raw(2, pull, vel), Some(AimInput::Release { velocity: vel }));
        assert_eq!(AimInput::from_raw(3, pull, vel), Some(AimInput::Cancel));
        assert_eq!(AimInput::from_raw(9, pull, vel), None);
    }
}
