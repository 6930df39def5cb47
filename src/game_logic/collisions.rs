use crate::game_logic::{
    CAR_COLLISION_DISTANCE, CAR_COLLISION_SPEED_PENALTY, CAR_PUSH_RATE, CarState, ROAD_WIDTH,
    TrackCurve, TrackProjection,
};

/// How hard the road edge bites for one kind of driver.
#[derive(Clone, Copy, Debug)]
pub struct Containment {
    /// Distance inside the road edge where the push starts.
    pub margin: f32,
    /// Fraction of the overshoot undone in one pass.
    pub push_factor: f32,
    pub speed_penalty: f32,
}

pub const PLAYER_CONTAINMENT: Containment = Containment {
    margin: 1.0,
    push_factor: 0.8,
    speed_penalty: 0.88,
};

pub const AI_CONTAINMENT: Containment = Containment {
    margin: 2.0,
    push_factor: 1.0,
    speed_penalty: 0.95,
};

/// Outcome of a containment pass.
#[derive(Clone, Copy, Debug)]
pub struct ContainmentResult {
    /// Projection of the position before any push was applied.
    pub projection: TrackProjection,
    pub hit_boundary: bool,
}

/// Pushes a car that strayed past the road edge back towards the centreline
/// and bleeds off some of its speed.
pub fn contain_to_track(
    car: &mut CarState,
    track: &TrackCurve,
    rules: &Containment,
) -> ContainmentResult {
    let projection = track.nearest(car.position);
    let limit = ROAD_WIDTH / 2.0 - rules.margin;

    let hit_boundary = projection.distance > limit;
    if hit_boundary {
        let overshoot = projection.distance - limit;
        car.position += projection.push * overshoot * rules.push_factor;
        car.speed *= rules.speed_penalty;
    }

    ContainmentResult {
        projection,
        hit_boundary,
    }
}

/// Separates every overlapping pair of cars. Returns the number of contacts.
///
/// Each car of a pair moves half the penetration depth scaled by
/// `delta * CAR_PUSH_RATE`; the scale is capped at 1 so a pair never ends up
/// further apart than the contact distance.
pub fn resolve_car_collisions(cars: &mut [CarState], delta: f32) -> usize {
    let scale = (delta * CAR_PUSH_RATE).min(1.0);
    let mut contacts = 0;

    for i in 0..cars.len() {
        for j in (i + 1)..cars.len() {
            let offset = cars[j].position - cars[i].position;
            let distance = offset.length();

            // coincident cars have no usable normal
            if distance >= CAR_COLLISION_DISTANCE || distance <= 0.01 {
                continue;
            }

            let push = (CAR_COLLISION_DISTANCE - distance) * 0.5;
            let displacement = offset / distance * push * scale;
            cars[i].position -= displacement;
            cars[j].position += displacement;
            cars[i].speed *= CAR_COLLISION_SPEED_PENALTY;
            cars[j].speed *= CAR_COLLISION_SPEED_PENALTY;
            contacts += 1;
        }
    }

    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    #[test]
    fn test_boundary_pushes_car_back() {
        let track = TrackCurve::circuit();
        let t = 0.0;
        let start = track.point_at(t) + track.normal_at(t) * (ROAD_WIDTH / 2.0 + 5.0);
        let mut car = CarState::new(start, track.heading_at(t));
        car.speed = 30.0;

        let before = track.nearest(car.position).distance;
        let result = contain_to_track(&mut car, &track, &PLAYER_CONTAINMENT);
        let after = track.nearest(car.position).distance;

        assert!(result.hit_boundary);
        assert!(after < before);
        assert!(car.speed < 30.0);
        assert!((car.speed - 30.0 * 0.88).abs() < 1e-4);
    }

    #[test]
    fn test_ai_boundary_removes_full_overshoot() {
        let track = TrackCurve::circuit();
        let t = 0.5;
        let start = track.point_at(t) - track.normal_at(t) * (ROAD_WIDTH / 2.0 + 5.0);
        let mut car = CarState::new(start, track.heading_at(t));
        car.speed = 40.0;

        contain_to_track(&mut car, &track, &AI_CONTAINMENT);
        let after = track.nearest(car.position).distance;

        assert!((after - (ROAD_WIDTH / 2.0 - 2.0)).abs() < 0.5);
        assert!((car.speed - 38.0).abs() < 1e-4);
    }

    #[test]
    fn test_car_on_road_is_untouched() {
        let track = TrackCurve::circuit();
        let start = track.point_at(0.3) + track.normal_at(0.3) * 3.0;
        let mut car = CarState::new(start, 0.0);
        car.speed = 20.0;

        let result = contain_to_track(&mut car, &track, &PLAYER_CONTAINMENT);
        assert!(!result.hit_boundary);
        assert_eq!(car.position, start);
        assert_eq!(car.speed, 20.0);
    }

    #[test]
    fn test_car_collision_is_symmetric() {
        let mut cars = vec![
            CarState::new(Vec2::new(10.0, 10.0), 0.0),
            CarState::new(Vec2::new(12.0, 10.0), 0.0),
        ];
        cars[0].speed = 30.0;
        cars[1].speed = 30.0;

        let contacts = resolve_car_collisions(&mut cars, 0.016);
        assert_eq!(contacts, 1);

        let moved_a = cars[0].position - Vec2::new(10.0, 10.0);
        let moved_b = cars[1].position - Vec2::new(12.0, 10.0);
        assert!((moved_a + moved_b).length() < 1e-5);
        assert!(moved_a.x < 0.0 && moved_b.x > 0.0);
        assert!((moved_b.x - 0.75 * 0.16).abs() < 1e-5);
        assert_eq!(cars[0].speed, cars[1].speed);
        assert!((cars[0].speed - 30.0 * 0.96).abs() < 1e-4);
    }

    #[test]
    fn test_large_delta_never_overshoots() {
        let mut cars = vec![
            CarState::new(Vec2::new(0.0, 0.0), 0.0),
            CarState::new(Vec2::new(0.0, 1.0), 0.0),
        ];
        resolve_car_collisions(&mut cars, 5.0);
        let distance = cars[0].position.distance(cars[1].position);
        assert!((distance - CAR_COLLISION_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn test_distant_and_coincident_cars_are_ignored() {
        let mut cars = vec![
            CarState::new(Vec2::new(0.0, 0.0), 0.0),
            CarState::new(Vec2::new(0.0, 0.0), 0.0),
            CarState::new(Vec2::new(50.0, 0.0), 0.0),
        ];
        assert_eq!(resolve_car_collisions(&mut cars, 0.016), 0);
        assert_eq!(cars[2].position, Vec2::new(50.0, 0.0));
    }
}
