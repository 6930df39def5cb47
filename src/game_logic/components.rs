use bevy::prelude::*;

/// Links a rendered car entity to its slot in `RaceSession::cars`.
#[derive(Component, Clone, Copy)]
pub struct CarBody {
    pub index: usize,
}

#[derive(Component)]
pub struct PlayerControlled;

#[derive(Component)]
pub struct AIControlled;

/// Kinematic record for one car.
///
/// Positions live on the ground plane: `position.x` is world X and
/// `position.y` is world Z. A heading of 0 faces +Z.
#[derive(Clone, Debug, PartialEq)]
pub struct CarState {
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub track_t: f32,
    pub prev_track_t: f32,
    pub lap: u32,
    pub passed_halfway: bool,
    pub lap_start_time: f32,
    pub best_lap_time: f32,
    pub total_distance: f32,
}

impl CarState {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            speed: 0.0,
            track_t: 0.0,
            prev_track_t: 0.0,
            lap: 0,
            passed_halfway: false,
            lap_start_time: 0.0,
            best_lap_time: f32::INFINITY,
            total_distance: 0.0,
        }
    }

    /// Places the car at a known track parameter without triggering lap logic.
    pub fn with_track_t(mut self, t: f32) -> Self {
        self.track_t = t;
        self.prev_track_t = t;
        self
    }

    pub fn forward_vector(&self) -> Vec2 {
        Vec2::new(self.heading.sin(), self.heading.cos())
    }

    /// Moves the car along its heading.
    pub fn integrate(&mut self, delta: f32) {
        self.position += self.forward_vector() * self.speed * delta;
        self.total_distance += self.speed.abs() * delta;
    }

    /// Shifts the current parameter into `prev_track_t` and stores the new one.
    pub fn record_track_t(&mut self, t: f32) {
        self.prev_track_t = self.track_t;
        self.track_t = t;
    }

    pub fn best_lap(&self) -> Option<f32> {
        self.best_lap_time.is_finite().then_some(self.best_lap_time)
    }
}
