use crate::game_logic::{
    AI_CONTAINMENT, CAMERA_COUNTDOWN_HEIGHT, CAMERA_DISTANCE, CAMERA_HEIGHT, CAMERA_LOOK_HEIGHT,
    CAMERA_SMOOTHING, COUNTDOWN_DURATION, CRASH_COOLDOWN, CRASH_SOUND_MIN_SPEED, CarState,
    HUD_INTERVAL, PLAYER_CONTAINMENT, PLAYER_INDEX, PhysicsInput, TOTAL_CARS, TOTAL_LAPS,
    TrackCurve, apply_ai_physics, apply_player_physics, check_lap, clamp_delta, contain_to_track,
    player_position, resolve_car_collisions,
};
use bevy::prelude::*;

/// Per-frame summary for the heads-up display.
///
/// `countdown > 0` means the race has not started and only the countdown is
/// meaningful.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub time: f32,
    pub lap: u32,
    pub total_laps: u32,
    pub speed: f32,
    pub position: usize,
    pub total_cars: usize,
    pub finished: bool,
    pub best_lap_time: Option<f32>,
    pub finish_position: usize,
    pub countdown: u32,
}

impl HudSnapshot {
    pub fn countdown(remaining: f32, total_laps: u32) -> Self {
        Self {
            time: 0.0,
            lap: 0,
            total_laps,
            speed: 0.0,
            position: TOTAL_CARS,
            total_cars: TOTAL_CARS,
            finished: false,
            best_lap_time: None,
            finish_position: TOTAL_CARS,
            countdown: remaining.max(0.0).ceil() as u32,
        }
    }
}

impl Default for HudSnapshot {
    fn default() -> Self {
        Self::countdown(COUNTDOWN_DURATION, TOTAL_LAPS)
    }
}

/// Discrete things that happened during a step.
#[derive(Clone, Debug, PartialEq)]
pub enum RaceEvent {
    LapCompleted {
        car: usize,
        lap: u32,
        lap_time: f32,
    },
    BoundaryCrash,
    RaceFinished {
        time: f32,
        position: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub struct StepOutcome {
    pub hud: Option<HudSnapshot>,
    pub events: Vec<RaceEvent>,
    /// Player speed magnitude for the engine sound, while racing.
    pub engine_speed: Option<f32>,
}

/// Chase camera that trails the player car.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl ChaseCamera {
    pub fn behind(car: &CarState) -> Self {
        Self {
            position: Self::target(car, CAMERA_COUNTDOWN_HEIGHT),
            look_at: Vec3::new(car.position.x, 1.0, car.position.y),
        }
    }

    fn target(car: &CarState, height: f32) -> Vec3 {
        let back = car.forward_vector() * CAMERA_DISTANCE;
        Vec3::new(car.position.x - back.x, height, car.position.y - back.y)
    }

    /// Exponentially eases towards the spot behind the car.
    pub fn follow(&mut self, car: &CarState, height: f32, delta: f32) {
        let blend = 1.0 - (-CAMERA_SMOOTHING * delta).exp();
        self.position = self.position.lerp(Self::target(car, height), blend);
        self.look_at = Vec3::new(car.position.x, CAMERA_LOOK_HEIGHT, car.position.y);
    }
}

/// State of one race, from the countdown to the finish.
///
/// Car 0 is the player; cars 1.. are AI drivers. Restarting a race means
/// replacing the whole session.
#[derive(Resource, Clone, Debug)]
pub struct RaceSession {
    pub cars: Vec<CarState>,
    pub time: f32,
    pub countdown: f32,
    pub started: bool,
    pub finished: bool,
    pub paused: bool,
    pub finish_position: usize,
    pub total_laps: u32,
    pub camera: ChaseCamera,
    last_hud_time: f32,
    crash_cooldown: f32,
}

impl RaceSession {
    /// Lines up the grid: the player on the start line, AI in staggered rows
    /// behind it.
    pub fn new(track: &TrackCurve) -> Self {
        let player = CarState::new(track.point_at(0.0), track.heading_at(0.0)).with_track_t(0.0);

        let mut cars = Vec::with_capacity(TOTAL_CARS);
        cars.push(player);
        for i in 0..TOTAL_CARS - 1 {
            let row = (i + 1) / 2;
            let side = if (i + 1) % 2 == 0 { 1.0 } else { -1.0 };
            let lateral = side * (3.0 + (row % 2) as f32 * 1.5);
            let behind_t = (2.0 - (row + 1) as f32 * 0.006) % 1.0;

            let position = track.point_at(behind_t) + track.normal_at(behind_t) * lateral;
            cars.push(CarState::new(position, track.heading_at(behind_t)).with_track_t(behind_t));
        }

        let camera = ChaseCamera::behind(&cars[PLAYER_INDEX]);
        Self {
            cars,
            time: 0.0,
            countdown: COUNTDOWN_DURATION,
            started: false,
            finished: false,
            paused: false,
            finish_position: TOTAL_CARS,
            total_laps: TOTAL_LAPS,
            camera,
            last_hud_time: -1.0,
            crash_cooldown: 0.0,
        }
    }

    pub fn with_total_laps(mut self, total_laps: u32) -> Self {
        self.total_laps = total_laps;
        self
    }

    pub fn player(&self) -> &CarState {
        &self.cars[PLAYER_INDEX]
    }

    /// Abandons the current race and lines up a new grid with the same lap count.
    pub fn restart(&mut self, track: &TrackCurve) {
        *self = Self::new(track).with_total_laps(self.total_laps);
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Advances the race by one rendered frame.
    pub fn step(&mut self, track: &TrackCurve, input: &PhysicsInput, raw_delta: f32) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.paused || self.finished {
            return outcome;
        }

        let delta = clamp_delta(raw_delta);

        if !self.started {
            self.countdown -= delta;
            if self.countdown <= 0.0 {
                self.started = true;
                self.countdown = 0.0;
                info!("Race started");
            }
            outcome.hud = Some(HudSnapshot::countdown(self.countdown, self.total_laps));
            self.camera
                .follow(&self.cars[PLAYER_INDEX], CAMERA_COUNTDOWN_HEIGHT, delta);
            return outcome;
        }

        self.time += delta;
        self.crash_cooldown = (self.crash_cooldown - delta).max(0.0);
        let time = self.time;

        // Player
        let player = &mut self.cars[PLAYER_INDEX];
        apply_player_physics(player, input, delta);
        let contained = contain_to_track(player, track, &PLAYER_CONTAINMENT);
        if contained.hit_boundary
            && self.crash_cooldown <= 0.0
            && player.speed.abs() > CRASH_SOUND_MIN_SPEED
        {
            debug!("Player hit the barrier at {:.1}", player.speed.abs());
            outcome.events.push(RaceEvent::BoundaryCrash);
            self.crash_cooldown = CRASH_COOLDOWN;
        }
        player.record_track_t(contained.projection.t);
        if let Some(lap_time) = check_lap(player, time) {
            info!("Lap {} complete in {:.2}s", player.lap, lap_time);
            outcome.events.push(RaceEvent::LapCompleted {
                car: PLAYER_INDEX,
                lap: player.lap,
                lap_time,
            });
        }

        // AI
        for (index, car) in self.cars.iter_mut().enumerate().skip(1) {
            apply_ai_physics(car, index - 1, track, time, delta);
            let contained = contain_to_track(car, track, &AI_CONTAINMENT);
            car.record_track_t(contained.projection.t);
            if let Some(lap_time) = check_lap(car, time) {
                debug!("AI car {} lap {} in {:.2}s", index, car.lap, lap_time);
                outcome.events.push(RaceEvent::LapCompleted {
                    car: index,
                    lap: car.lap,
                    lap_time,
                });
            }
        }

        resolve_car_collisions(&mut self.cars, delta);

        self.camera
            .follow(&self.cars[PLAYER_INDEX], CAMERA_HEIGHT, delta);
        outcome.engine_speed = Some(self.player().speed.abs());

        if time - self.last_hud_time > HUD_INTERVAL {
            self.last_hud_time = time;
            outcome.hud = Some(self.snapshot());
        }

        if self.player().lap >= self.total_laps {
            self.finished = true;
            self.finish_position = player_position(&self.cars);
            info!(
                "Race finished in {:.2}s, position {}",
                time, self.finish_position
            );
            outcome.events.push(RaceEvent::RaceFinished {
                time,
                position: self.finish_position,
            });
            outcome.hud = Some(self.snapshot());
        }

        outcome
    }

    /// HUD view of the current race state.
    pub fn snapshot(&self) -> HudSnapshot {
        let player = self.player();
        let position = player_position(&self.cars);
        HudSnapshot {
            time: self.time,
            lap: player.lap.min(self.total_laps),
            total_laps: self.total_laps,
            speed: player.speed.abs(),
            position,
            total_cars: self.cars.len(),
            finished: self.finished,
            best_lap_time: player.best_lap(),
            finish_position: if self.finished {
                self.finish_position
            } else {
                position
            },
            countdown: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{
        AI_LOOK_AHEAD, MAX_FRAME_DELTA, MAX_SPEED, MIN_SPEED, ROAD_WIDTH, wrap_angle,
    };

    const FRAME: f32 = 1.0 / 60.0;

    fn started_session(track: &TrackCurve) -> RaceSession {
        let mut session = RaceSession::new(track);
        let idle = PhysicsInput::default();
        while !session.started {
            session.step(track, &idle, MAX_FRAME_DELTA);
        }
        session
    }

    /// Holds the throttle and steers at a point just ahead on the track.
    fn scripted_driver(session: &RaceSession, track: &TrackCurve) -> PhysicsInput {
        let car = session.player();
        let target = track.point_at((car.track_t + AI_LOOK_AHEAD) % 1.0);
        let to_target = target - car.position;
        let diff = wrap_angle(to_target.x.atan2(to_target.y) - car.heading);
        PhysicsInput {
            forward: true,
            backward: false,
            left: diff > 0.02,
            right: diff < -0.02,
        }
    }

    #[test]
    fn test_grid_starts_behind_the_line() {
        let track = TrackCurve::circuit();
        let session = RaceSession::new(&track);

        assert_eq!(session.cars.len(), TOTAL_CARS);
        assert_eq!(session.player().track_t, 0.0);
        for car in session.cars.iter().skip(1) {
            assert!(car.track_t > 0.9);
            assert_eq!(car.lap, 0);
            assert!(car.position.distance(session.player().position) >= 3.0);
        }
    }

    #[test]
    fn test_countdown_freezes_physics() {
        let track = TrackCurve::circuit();
        let mut session = RaceSession::new(&track);
        let before = session.cars.clone();
        let input = PhysicsInput {
            forward: true,
            ..Default::default()
        };

        let outcome = session.step(&track, &input, 0.5);
        let hud = outcome.hud.expect("countdown always reports");
        assert_eq!(hud.countdown, 3);
        assert!((session.countdown - (COUNTDOWN_DURATION - MAX_FRAME_DELTA)).abs() < 1e-6);
        assert_eq!(session.cars, before);
        assert_eq!(session.time, 0.0);
        assert!(outcome.engine_speed.is_none());
    }

    #[test]
    fn test_countdown_transitions_to_racing() {
        let track = TrackCurve::circuit();
        let session = started_session(&track);
        assert!(session.started);
        assert_eq!(session.countdown, 0.0);
        assert_eq!(session.time, 0.0);
    }

    #[test]
    fn test_step_never_advances_more_than_max_delta() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let idle = PhysicsInput::default();

        for raw in [0.0, 0.01, 0.05, 0.2, 3.0] {
            let before = session.time;
            session.step(&track, &idle, raw);
            assert!(session.time - before <= MAX_FRAME_DELTA + 1e-6);
        }
    }

    #[test]
    fn test_speeds_stay_clamped_while_racing() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let input = PhysicsInput {
            forward: true,
            right: true,
            ..Default::default()
        };

        for _ in 0..600 {
            session.step(&track, &input, FRAME);
            for car in &session.cars {
                assert!(car.speed <= MAX_SPEED && car.speed >= MIN_SPEED);
                assert!(car.track_t >= 0.0 && car.track_t < 1.0);
            }
        }
    }

    #[test]
    fn test_hud_is_throttled() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let idle = PhysicsInput::default();

        let emitted = (0..60)
            .filter(|_| session.step(&track, &idle, FRAME).hud.is_some())
            .count();
        // one second of racing at 60 fps, at most one snapshot per 50ms
        assert!(emitted <= 20);
        assert!(emitted >= 15);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let input = PhysicsInput {
            forward: true,
            ..Default::default()
        };
        session.step(&track, &input, FRAME);

        assert!(session.toggle_pause());
        let frozen = session.clone();
        for _ in 0..30 {
            let outcome = session.step(&track, &input, FRAME);
            assert!(outcome.hud.is_none() && outcome.events.is_empty());
        }
        assert_eq!(session.cars, frozen.cars);
        assert_eq!(session.time, frozen.time);

        assert!(!session.toggle_pause());
        session.step(&track, &input, FRAME);
        assert!(session.time > frozen.time);
    }

    #[test]
    fn test_camera_trails_player() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let input = PhysicsInput {
            forward: true,
            ..Default::default()
        };
        for _ in 0..120 {
            session.step(&track, &input, FRAME);
        }

        let player = session.player();
        let camera = session.camera;
        let ground = Vec2::new(camera.position.x, camera.position.z);
        assert!(camera.look_at.distance(Vec3::new(player.position.x, 1.5, player.position.y)) < 1e-4);
        // behind the car relative to its heading
        assert!((player.position - ground).dot(player.forward_vector()) > 0.0);
    }

    #[test]
    fn test_restart_discards_progress() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track).with_total_laps(2);
        for _ in 0..300 {
            let input = scripted_driver(&session, &track);
            session.step(&track, &input, FRAME);
        }
        session.cars[3].lap = 1;
        session.toggle_pause();

        session.restart(&track);

        assert_eq!(session.time, 0.0);
        assert_eq!(session.countdown, COUNTDOWN_DURATION);
        assert!(!session.started && !session.paused && !session.finished);
        assert_eq!(session.total_laps, 2);
        assert!(session.cars.iter().all(|car| car.lap == 0 && car.speed == 0.0));
        assert_eq!(session.cars, RaceSession::new(&track).cars);
    }

    fn crash_count(outcome: &StepOutcome) -> usize {
        outcome
            .events
            .iter()
            .filter(|e| matches!(e, RaceEvent::BoundaryCrash))
            .count()
    }

    #[test]
    fn test_crash_cue_is_rate_limited() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        let input = PhysicsInput {
            forward: true,
            right: true,
            ..Default::default()
        };

        let mut crash_times = Vec::new();
        for _ in 0..600 {
            let outcome = session.step(&track, &input, FRAME);
            assert!(crash_count(&outcome) <= 1);
            if crash_count(&outcome) == 1 {
                crash_times.push(session.time);
            }
        }

        assert!(!crash_times.is_empty());
        for pair in crash_times.windows(2) {
            assert!(pair[1] - pair[0] >= CRASH_COOLDOWN - 1e-3);
        }
    }

    fn place_outside(session: &mut RaceSession, track: &TrackCurve, speed: f32) {
        let t = 0.25;
        let player = &mut session.cars[PLAYER_INDEX];
        player.position = track.point_at(t) + track.normal_at(t) * (ROAD_WIDTH / 2.0 + 4.0);
        player.heading = track.heading_at(t);
        player.speed = speed;
    }

    #[test]
    fn test_slow_scrape_is_silent() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        place_outside(&mut session, &track, 4.0);

        let outcome = session.step(&track, &PhysicsInput::default(), FRAME);
        assert_eq!(crash_count(&outcome), 0);
        assert!(session.player().speed < 4.0);
    }

    #[test]
    fn test_fast_hit_crashes_once_within_cooldown() {
        let track = TrackCurve::circuit();
        let mut session = started_session(&track);
        place_outside(&mut session, &track, 30.0);

        let first = session.step(&track, &PhysicsInput::default(), FRAME);
        assert_eq!(crash_count(&first), 1);

        // still fast and still off the road, but inside the cooldown
        place_outside(&mut session, &track, 30.0);
        let second = session.step(&track, &PhysicsInput::default(), FRAME);
        assert_eq!(crash_count(&second), 0);
    }

    fn run_full_race(laps: u32) -> (Vec<RaceEvent>, RaceSession) {
        let track = TrackCurve::circuit();
        let mut session = RaceSession::new(&track).with_total_laps(laps);
        let mut events = Vec::new();

        for _ in 0..60 * 60 * 10 {
            let input = scripted_driver(&session, &track);
            events.extend(session.step(&track, &input, FRAME).events);
            if session.finished {
                break;
            }
        }
        (events, session)
    }

    #[test]
    fn test_full_race_finishes_once() {
        let (events, mut session) = run_full_race(TOTAL_LAPS);
        let track = TrackCurve::circuit();

        assert!(session.finished);
        assert_eq!(session.player().lap, TOTAL_LAPS);

        let finishes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, RaceEvent::RaceFinished { .. }))
            .collect();
        assert_eq!(finishes.len(), 1);

        let player_laps = events
            .iter()
            .filter(|e| matches!(e, RaceEvent::LapCompleted { car: PLAYER_INDEX, .. }))
            .count();
        assert_eq!(player_laps, TOTAL_LAPS as usize);

        // nothing moves once the race is over
        let frozen = session.cars.clone();
        let outcome = session.step(&track, &PhysicsInput::default(), FRAME);
        assert!(outcome.events.is_empty());
        assert_eq!(session.cars, frozen);

        let position = session.finish_position;
        assert!((1..=TOTAL_CARS).contains(&position));
        assert!(session.snapshot().finished);
        assert_eq!(session.snapshot().lap, TOTAL_LAPS);
        assert!(session.snapshot().best_lap_time.is_some());
    }

    #[test]
    fn test_full_race_is_deterministic() {
        let (first_events, first) = run_full_race(TOTAL_LAPS);
        let (second_events, second) = run_full_race(TOTAL_LAPS);

        assert_eq!(first.finish_position, second.finish_position);
        assert_eq!(first.time, second.time);
        assert_eq!(first_events, second_events);
    }
}
