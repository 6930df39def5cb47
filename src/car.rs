use crate::game_logic::{
    AIControlled, CarBody, PLAYER_INDEX, PhysicsInput, PlayerControlled, RaceSession, TOTAL_CARS,
};
use bevy::prelude::*;

/// Paint options, in menu order.
pub const CAR_COLORS: [Color; 8] = [
    Color::srgb(0.863, 0.149, 0.149),
    Color::srgb(0.145, 0.388, 0.922),
    Color::srgb(0.086, 0.639, 0.290),
    Color::srgb(0.918, 0.702, 0.031),
    Color::srgb(0.576, 0.200, 0.918),
    Color::srgb(0.976, 0.451, 0.086),
    Color::srgb(0.024, 0.714, 0.831),
    Color::srgb(0.925, 0.282, 0.600),
];

pub const CAR_NAMES: [&str; 8] = [
    "Blaze Red",
    "Sapphire",
    "Venom",
    "Gold Rush",
    "Phantom",
    "Inferno",
    "Glacier",
    "Fuchsia",
];

const BODY_SIZE: Vec3 = Vec3::new(2.0, 0.8, 4.0);
const CABIN_SIZE: Vec3 = Vec3::new(1.6, 0.6, 1.8);

/// The player's chosen paint. AI cars take the remaining colours.
#[derive(Resource, Clone, Default)]
pub struct CarColorSelection {
    pub index: usize,
}

impl CarColorSelection {
    pub fn color(&self) -> Color {
        CAR_COLORS[self.index % CAR_COLORS.len()]
    }

    pub fn name(&self) -> &'static str {
        CAR_NAMES[self.index % CAR_NAMES.len()]
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % CAR_COLORS.len();
    }

    pub fn prev(&mut self) {
        if self.index == 0 {
            self.index = CAR_COLORS.len() - 1;
        } else {
            self.index -= 1;
        }
    }

    /// Colours for the AI field, never repeating the player's.
    pub fn ai_colors(&self) -> Vec<Color> {
        CAR_COLORS
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.index)
            .map(|(_, color)| *color)
            .take(TOTAL_CARS - 1)
            .collect()
    }
}

/// Collapses the keyboard into the four driving flags, once per frame.
pub fn sample_driver_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PhysicsInput>) {
    *input = PhysicsInput {
        forward: keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
        backward: keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
        left: keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
    };
}

pub fn spawn_cars(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    selection: Res<CarColorSelection>,
    session: Res<RaceSession>,
) {
    let body_mesh = meshes.add(Cuboid::from_size(BODY_SIZE));
    let cabin_mesh = meshes.add(Cuboid::from_size(CABIN_SIZE));
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.1, 0.14),
        perceptual_roughness: 0.2,
        ..default()
    });

    let colors = std::iter::once(selection.color()).chain(selection.ai_colors());
    for (index, (car, color)) in session.cars.iter().zip(colors).enumerate() {
        let paint = materials.add(StandardMaterial {
            base_color: color,
            metallic: 0.4,
            perceptual_roughness: 0.35,
            ..default()
        });

        let mut entity = commands.spawn((
            CarBody { index },
            car_transform(car.position, car.heading),
            Visibility::default(),
        ));
        entity.with_children(|parent| {
            parent.spawn((
                Mesh3d(body_mesh.clone()),
                MeshMaterial3d(paint),
                Transform::from_xyz(0.0, BODY_SIZE.y / 2.0 + 0.2, 0.0),
            ));
            parent.spawn((
                Mesh3d(cabin_mesh.clone()),
                MeshMaterial3d(glass.clone()),
                Transform::from_xyz(0.0, BODY_SIZE.y + 0.5, -0.3),
            ));
        });

        if index == PLAYER_INDEX {
            entity.insert(PlayerControlled);
        } else {
            entity.insert(AIControlled);
        }
    }
}

/// Places every car mesh where the simulation left it.
pub fn sync_car_transforms(
    session: Res<RaceSession>,
    mut cars: Query<(&CarBody, &mut Transform)>,
) {
    for (body, mut transform) in cars.iter_mut() {
        if let Some(car) = session.cars.get(body.index) {
            *transform = car_transform(car.position, car.heading);
        }
    }
}

fn car_transform(position: Vec2, heading: f32) -> Transform {
    Transform::from_xyz(position.x, 0.0, position.y).with_rotation(Quat::from_rotation_y(heading))
}
