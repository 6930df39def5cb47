use crate::game_logic::RaceSession;
use bevy::prelude::*;

pub const WIN_W: f32 = 1280.;
pub const WIN_H: f32 = 720.;

pub fn camera_setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 60.0, -220.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Camera movement system that follows the player
pub fn move_camera(session: Res<RaceSession>, mut camera: Single<&mut Transform, With<Camera>>) {
    let chase = session.camera;
    **camera = Transform::from_translation(chase.position).looking_at(chase.look_at, Vec3::Y);
}

// Overview shot for the menu and results screens
pub fn reset_camera(mut camera: Single<&mut Transform, With<Camera>>) {
    **camera = Transform::from_xyz(0.0, 60.0, -220.0).looking_at(Vec3::ZERO, Vec3::Y);
}
