use crate::game_logic::{
    ACCEL, AI_LOOK_AHEAD, AI_SPEED_WOBBLE, AI_STEER_GAIN, AI_TARGET_SPEEDS, AI_THROTTLE_GAIN,
    BRAKE_FORCE, CarState, DRAG_PER_FRAME, FULL_STEER_SPEED, MAX_FRAME_DELTA, MAX_SPEED,
    MIN_SPEED, STEER_MIN_SPEED, STOP_SPEED, TURN_RATE, TrackCurve,
};
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Latest sampled driver controls, read once per frame by the race step.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct PhysicsInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Delta actually simulated for a frame: never negative, never above 50ms.
pub fn clamp_delta(raw_delta: f32) -> f32 {
    raw_delta.clamp(0.0, MAX_FRAME_DELTA)
}

pub fn clamp_speed(speed: f32) -> f32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Applies throttle, drag, steering and movement to the player's car.
pub fn apply_player_physics(car: &mut CarState, input: &PhysicsInput, delta: f32) {
    if input.forward {
        car.speed += ACCEL * delta;
    }
    if input.backward {
        car.speed -= BRAKE_FORCE * delta;
    }
    if !input.forward && !input.backward {
        // frame-rate independent drag
        car.speed *= DRAG_PER_FRAME.powf(60.0 * delta);
    }

    car.speed = clamp_speed(car.speed);
    if car.speed.abs() < STOP_SPEED {
        car.speed = 0.0;
    }

    // no steering on the spot; authority grows with speed up to a cap
    if car.speed.abs() > STEER_MIN_SPEED {
        let turn_dir = input.left as i8 - input.right as i8;
        let speed_factor = (car.speed.abs() / FULL_STEER_SPEED).min(1.0);
        car.heading += turn_dir as f32 * TURN_RATE * speed_factor * delta;
    }

    car.integrate(delta);
}

/// Target cruising speed for AI driver `ai_index` at race time `time`.
pub fn ai_target_speed(ai_index: usize, time: f32) -> f32 {
    let base = AI_TARGET_SPEEDS[ai_index % AI_TARGET_SPEEDS.len()];
    base + (time * 0.5 + ai_index as f32 * 2.0).sin() * AI_SPEED_WOBBLE
}

/// Steers an AI car at a point just ahead on the track and eases its speed
/// towards the target.
pub fn apply_ai_physics(
    car: &mut CarState,
    ai_index: usize,
    track: &TrackCurve,
    time: f32,
    delta: f32,
) {
    let target_speed = ai_target_speed(ai_index, time);
    let look_ahead_t = (track.nearest(car.position).t + AI_LOOK_AHEAD) % 1.0;
    let to_target = track.point_at(look_ahead_t) - car.position;
    let target_heading = to_target.x.atan2(to_target.y);

    let angle_diff = wrap_angle(target_heading - car.heading);
    car.heading += angle_diff * AI_STEER_GAIN * delta;
    car.speed += (target_speed - car.speed) * AI_THROTTLE_GAIN * delta;
    car.speed = clamp_speed(car.speed);

    car.integrate(delta);
}
