use crate::GameState;
use crate::audio::AudioCue;
use crate::car::{CAR_COLORS, CarColorSelection};
use crate::game_logic::{TOTAL_CARS, TOTAL_LAPS};
use crate::hud::format_time;
use crate::leaderboard::Leaderboard;
use crate::terrain::SceneryMode;
use bevy::prelude::*;

#[derive(Component)]
pub struct MainScreenEntity;

#[derive(Component)]
pub struct CarNameText;

#[derive(Component)]
pub struct CarSwatch;

#[derive(Component)]
pub struct SceneryText;

/// Despawns every entity tagged with `Screen`.
pub fn despawn_screen<Screen: Component>(
    mut commands: Commands,
    query: Query<Entity, With<Screen>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn text(value: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(value),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

pub fn setup_title_screen(
    mut commands: Commands,
    selection: Res<CarColorSelection>,
    scenery: Res<SceneryMode>,
    leaderboard: Res<Leaderboard>,
) {
    let muted = Color::srgb(0.6, 0.6, 0.65);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(14.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.05, 0.05, 0.07)),
            MainScreenEntity,
        ))
        .with_children(|parent| {
            parent.spawn(text("MOMENTUM X", 72.0, Color::WHITE));
            parent.spawn(text(
                format!("{}-Lap Circuit Race - {} Drivers", TOTAL_LAPS, TOTAL_CARS),
                18.0,
                muted,
            ));

            parent.spawn(text("SELECT YOUR CAR", 14.0, muted));
            parent.spawn((
                Node {
                    width: Val::Px(128.0),
                    height: Val::Px(72.0),
                    ..default()
                },
                BackgroundColor(selection.color()),
                CarSwatch,
            ));
            parent.spawn((
                text(car_label(&selection), 22.0, Color::WHITE),
                CarNameText,
            ));
            parent.spawn((
                text(format!("[N] {}", scenery.label()), 18.0, Color::WHITE),
                SceneryText,
            ));
            parent.spawn(text("Press ENTER to start", 26.0, Color::srgb(0.9, 0.2, 0.2)));
            parent.spawn(text(
                "W/Up accelerate   S/Down brake   A/D steer   Esc pause",
                14.0,
                muted,
            ));

            if !leaderboard.is_empty() {
                parent.spawn(text("BEST TIMES", 14.0, muted));
                for (rank, entry) in leaderboard.entries().iter().take(5).enumerate() {
                    parent.spawn(text(
                        format!("{}. {}  (P{})", rank + 1, format_time(entry.time), entry.position),
                        16.0,
                        Color::WHITE,
                    ));
                }
            }
        });
}

fn car_label(selection: &CarColorSelection) -> String {
    format!(
        "<  {}  >   {} / {}",
        selection.name(),
        selection.index + 1,
        CAR_COLORS.len()
    )
}

pub fn check_for_title_input(
    input: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut selection: ResMut<CarColorSelection>,
    mut scenery: ResMut<SceneryMode>,
    mut cues: EventWriter<AudioCue>,
    mut texts: ParamSet<(
        Query<&mut Text, With<CarNameText>>,
        Query<&mut Text, With<SceneryText>>,
    )>,
    mut swatch: Query<&mut BackgroundColor, With<CarSwatch>>,
) {
    if input.any_just_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        selection.prev();
        cues.write(AudioCue::Click);
    } else if input.any_just_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        selection.next();
        cues.write(AudioCue::Click);
    } else if input.just_pressed(KeyCode::KeyN) {
        let night = scenery.toggle();
        info!("Night mode: {}", night);
        cues.write(AudioCue::Click);
    } else if input.any_just_pressed([KeyCode::Enter, KeyCode::Space]) {
        info!("Starting race with {}", selection.name());
        cues.write(AudioCue::Click);
        next_state.set(GameState::Playing);
        return;
    } else {
        return;
    }

    for mut label in texts.p0().iter_mut() {
        label.0 = car_label(&selection);
    }
    for mut label in texts.p1().iter_mut() {
        label.0 = format!("[N] {}", scenery.label());
    }
    for mut color in swatch.iter_mut() {
        color.0 = selection.color();
    }
}
