use fling_engine::systems::render::build_render_buffer;
use fling_engine::{AimInput, GameConfig, GameEvent, GameFlow, RenderBuffer, WireEvent};
use glam::Vec3;

/// Wires the game flow to the flat buffers the browser reads each frame.
///
/// The wasm exports in `lib.rs` keep one runner in a `thread_local!`,
/// because wasm-bindgen cannot export a stateful struct with borrowed buffers.
pub struct GameRunner {
    flow: GameFlow,
    render_buffer: RenderBuffer,
    /// Events published during the last tick, flattened to `[kind, a, b, c]`.
    event_buffer: Vec<WireEvent>,
    /// Aim forecast as `[x, y, z]` triples.
    trajectory_buffer: Vec<f32>,
}

impl GameRunner {
    pub fn new(config: GameConfig) -> Self {
        Self {
            flow: GameFlow::new(config),
            render_buffer: RenderBuffer::new(),
            event_buffer: Vec::with_capacity(64),
            trajectory_buffer: Vec::with_capacity(config.trajectory_samples * 3),
        }
    }

    pub fn flow(&self) -> &GameFlow {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut GameFlow {
        &mut self.flow
    }

    pub fn push_input(&mut self, input: AimInput) {
        self.flow.push_input(input);
    }

    /// Run one frame and refresh every outgoing buffer.
    pub fn tick(&mut self, dt: f32) {
        self.flow.tick(dt);
        self.refresh();
    }

    /// Rebuild the buffers without advancing time, after a lifecycle call.
    pub fn refresh(&mut self) {
        build_render_buffer(self.flow.coordinator().entities(), &mut self.render_buffer);

        self.event_buffer.clear();
        self.event_buffer
            .extend(self.flow.take_events().iter().map(GameEvent::to_wire));

        self.trajectory_buffer.clear();
        for point in self.flow.trajectory_preview() {
            self.trajectory_buffer.extend_from_slice(&point.to_array());
        }
    }

    /// Queue a raw aim gesture. It is applied at the start of the next tick.
    pub fn aim(&mut self, kind: u32, pull: Vec3, velocity: Vec3) {
        match AimInput::from_raw(kind, pull, velocity) {
            Some(input) => self.push_input(input),
            None => log::warn!("unknown aim input kind {kind}"),
        }
    }

    // ---- Pointer accessors for host reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn trajectory_ptr(&self) -> *const f32 {
        self.trajectory_buffer.as_ptr()
    }

    pub fn trajectory_len(&self) -> u32 {
        (self.trajectory_buffer.len() / 3) as u32
    }
}
