use crate::game_logic::{CarState, HALFWAY_T, LAP_WRAP_FROM_T, LAP_WRAP_TO_T, PLAYER_INDEX};

/// Runs the halfway/lap state machine on a car whose `prev_track_t` and
/// `track_t` were just updated. Returns the lap time when a lap completes.
///
/// A lap only counts when the parameter wraps past the start line after the
/// car crossed the halfway mark, so jitter around the line never scores.
pub fn check_lap(car: &mut CarState, time: f32) -> Option<f32> {
    let prev_t = car.prev_track_t;
    let curr_t = car.track_t;

    if prev_t < HALFWAY_T && curr_t >= HALFWAY_T {
        car.passed_halfway = true;
    }

    if prev_t > LAP_WRAP_FROM_T && curr_t < LAP_WRAP_TO_T && car.passed_halfway {
        car.lap += 1;
        car.passed_halfway = false;

        let lap_time = time - car.lap_start_time;
        if lap_time < car.best_lap_time {
            car.best_lap_time = lap_time;
        }
        car.lap_start_time = time;
        return Some(lap_time);
    }

    None
}

/// Car indices from leader to last: most laps first, then furthest along.
pub fn race_order(cars: &[CarState]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cars.len()).collect();
    order.sort_by(|&a, &b| {
        cars[b]
            .lap
            .cmp(&cars[a].lap)
            .then_with(|| cars[b].track_t.total_cmp(&cars[a].track_t))
    });
    order
}

/// 1-based race position of the car at `index`.
pub fn race_position(cars: &[CarState], index: usize) -> usize {
    race_order(cars)
        .iter()
        .position(|&i| i == index)
        .map_or(cars.len(), |rank| rank + 1)
}

pub fn player_position(cars: &[CarState]) -> usize {
    race_position(cars, PLAYER_INDEX)
}
