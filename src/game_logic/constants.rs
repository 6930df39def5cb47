// Race format
pub const TOTAL_LAPS: u32 = 3;
pub const TOTAL_CARS: usize = 8;
pub const PLAYER_INDEX: usize = 0;
pub const COUNTDOWN_DURATION: f32 = 3.0;

// Frame timing
pub const MAX_FRAME_DELTA: f32 = 0.05; // larger hitches are simulated as 50ms
pub const HUD_INTERVAL: f32 = 0.05;

// Track geometry
pub const ROAD_WIDTH: f32 = 18.0;
pub const TRACK_SAMPLES: usize = 600;
pub const ARC_LENGTH_DIVISIONS: usize = 1000;
pub const CURVE_TENSION: f32 = 0.5;

// Car physics
pub const MAX_SPEED: f32 = 65.0;
pub const MIN_SPEED: f32 = -MAX_SPEED * 0.3;
pub const ACCEL: f32 = 30.0;
pub const BRAKE_FORCE: f32 = 20.0;
pub const TURN_RATE: f32 = 2.0;
pub const DRAG_PER_FRAME: f32 = 0.97; // per 1/60s frame
pub const STOP_SPEED: f32 = 0.1;
pub const STEER_MIN_SPEED: f32 = 0.3;
pub const FULL_STEER_SPEED: f32 = 20.0;

// AI drivers
pub const AI_TARGET_SPEEDS: [f32; 7] = [52.0, 48.0, 45.0, 42.0, 50.0, 46.0, 44.0];
pub const AI_SPEED_WOBBLE: f32 = 3.0;
pub const AI_LOOK_AHEAD: f32 = 0.025;
pub const AI_STEER_GAIN: f32 = 5.0;
pub const AI_THROTTLE_GAIN: f32 = 3.0;

// Collisions
pub const CAR_COLLISION_DISTANCE: f32 = 3.5;
pub const CAR_PUSH_RATE: f32 = 10.0;
pub const CAR_COLLISION_SPEED_PENALTY: f32 = 0.96;
pub const CRASH_COOLDOWN: f32 = 0.5;
pub const CRASH_SOUND_MIN_SPEED: f32 = 5.0;

// Lap detection windows on the track parameter
pub const HALFWAY_T: f32 = 0.5;
pub const LAP_WRAP_FROM_T: f32 = 0.85;
pub const LAP_WRAP_TO_T: f32 = 0.15;

// Chase camera
pub const CAMERA_DISTANCE: f32 = 18.0;
pub const CAMERA_HEIGHT: f32 = 9.0;
pub const CAMERA_COUNTDOWN_HEIGHT: f32 = 10.0;
pub const CAMERA_LOOK_HEIGHT: f32 = 1.5;
pub const CAMERA_SMOOTHING: f32 = 3.5;

// Persistence
pub const LEADERBOARD_CAPACITY: usize = 10;
