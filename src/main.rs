mod audio;
mod camera;
mod car;
mod game_logic;
mod hud;
mod leaderboard;
mod race_plugin;
mod terrain;
mod title_screen;
mod victory_screen;

use audio::RaceAudioPlugin;
use bevy::log::LogPlugin;
use bevy::{prelude::*, window::PresentMode};
use camera::{WIN_H, WIN_W, camera_setup};
use race_plugin::RacePlugin;
use title_screen::{MainScreenEntity, check_for_title_input, despawn_screen, setup_title_screen};
use victory_screen::{VictoryScreenEntity, check_for_victory_input, setup_victory_screen};

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Victory,
}

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Momentum X".into(),
                        resolution: (WIN_W, WIN_H).into(),
                        present_mode: PresentMode::AutoVsync,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn".into(),
                    ..default()
                }),
        )
        .add_plugins((RacePlugin, RaceAudioPlugin))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)))
        .init_state::<GameState>()
        .add_systems(Startup, camera_setup)
        .add_systems(OnEnter(GameState::Title), setup_title_screen)
        .add_systems(OnExit(GameState::Title), despawn_screen::<MainScreenEntity>)
        .add_systems(OnEnter(GameState::Victory), setup_victory_screen)
        .add_systems(OnExit(GameState::Victory), despawn_screen::<VictoryScreenEntity>)
        .add_systems(
            Update,
            (
                check_for_title_input.run_if(in_state(GameState::Title)),
                check_for_victory_input.run_if(in_state(GameState::Victory)),
            ),
        )
        .run();
}
