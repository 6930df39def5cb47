use crate::car::CarColorSelection;
use crate::game_logic::{
    HudSnapshot, MAX_SPEED, PLAYER_INDEX, RaceSession, TOTAL_CARS, race_order,
};
use bevy::prelude::*;

/// Latest snapshot published by the race step.
#[derive(Resource, Default)]
pub struct HudState(pub HudSnapshot);

#[derive(Component)]
pub struct HudEntity;

/// Which reading a HUD text entity shows.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudField {
    Position,
    TotalCars,
    Lap,
    Time,
    BestLap,
    Speed,
    Countdown,
    PauseBanner,
}

#[derive(Component)]
pub struct SpeedBar;

/// One line of the standings panel; `rank` is 0 for the leader.
#[derive(Component)]
pub struct StandingsRow {
    pub rank: usize,
}

/// Formats seconds as `m:ss.s`.
pub fn format_time(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor();
    let rest = seconds - minutes * 60.0;
    format!("{}:{:04.1}", minutes as u32, rest)
}

pub fn ordinal(n: usize) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{}th", n),
    }
}

/// Speedometer reading shown to the player.
pub fn speed_kmh(speed: f32) -> u32 {
    (speed * 5.0).round() as u32
}

/// Text shown by `field` for the given snapshot.
pub fn field_text(field: HudField, data: &HudSnapshot, paused: bool) -> String {
    match field {
        HudField::Position => ordinal(data.position),
        HudField::TotalCars => format!("of {}", data.total_cars),
        HudField::Lap => format!("LAP {}/{}", (data.lap + 1).min(data.total_laps), data.total_laps),
        HudField::Time => format_time(data.time),
        HudField::BestLap => data
            .best_lap_time
            .map(|best| format!("BEST {}", format_time(best)))
            .unwrap_or_default(),
        HudField::Speed => format!("{} km/h", speed_kmh(data.speed)),
        HudField::Countdown => {
            if data.countdown > 0 {
                data.countdown.to_string()
            } else if data.finished {
                "FINISH".to_string()
            } else {
                String::new()
            }
        }
        HudField::PauseBanner => {
            if paused {
                "PAUSED\n[Esc] Resume   [R] Restart   [M] Menu".to_string()
            } else {
                String::new()
            }
        }
    }
}

/// Driver label for car `index` on the standings panel.
pub fn driver_label(index: usize) -> String {
    if index == PLAYER_INDEX {
        "YOU".to_string()
    } else {
        format!("CPU {}", index)
    }
}

fn hud_text(value: &str, size: f32) -> (Text, TextFont, TextColor) {
    (
        Text::new(value),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
    )
}

fn hud_label(value: &str) -> (Text, TextFont, TextColor) {
    (
        Text::new(value),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
    )
}

fn panel(node: Node) -> (Node, BackgroundColor, HudEntity) {
    (
        Node {
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            padding: UiRect::all(Val::Px(12.0)),
            ..node
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        HudEntity,
    )
}

pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn(panel(Node {
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        }))
        .with_children(|parent| {
            parent.spawn(hud_label("POS"));
            parent.spawn((hud_text("8th", 40.0), HudField::Position));
            parent.spawn((hud_label("of 8"), HudField::TotalCars));
            parent.spawn((hud_text("LAP 1/3", 22.0), HudField::Lap));
        });

    commands
        .spawn(panel(Node {
            top: Val::Px(16.0),
            right: Val::Px(16.0),
            ..default()
        }))
        .with_children(|parent| {
            parent.spawn(hud_label("TIME"));
            parent.spawn((hud_text("0:00.0", 32.0), HudField::Time));
            parent.spawn((hud_text("", 18.0), HudField::BestLap));
        });

    commands
        .spawn(panel(Node {
            bottom: Val::Px(16.0),
            right: Val::Px(16.0),
            width: Val::Px(220.0),
            ..default()
        }))
        .with_children(|parent| {
            parent.spawn((hud_text("0 km/h", 36.0), HudField::Speed));
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(8.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                ))
                .with_children(|bar| {
                    bar.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.2, 0.8, 0.3)),
                        SpeedBar,
                    ));
                });
        });

    commands
        .spawn(panel(Node {
            top: Val::Px(170.0),
            left: Val::Px(16.0),
            row_gap: Val::Px(2.0),
            ..default()
        }))
        .with_children(|parent| {
            parent.spawn(hud_label("STANDINGS"));
            for rank in 0..TOTAL_CARS {
                parent.spawn((hud_text("", 16.0), StandingsRow { rank }));
            }
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            HudEntity,
        ))
        .with_children(|parent| {
            parent.spawn((hud_text("3", 120.0), HudField::Countdown));
            parent.spawn((hud_text("", 40.0), HudField::PauseBanner));
        });
}

pub fn update_hud(
    hud: Res<HudState>,
    session: Res<RaceSession>,
    selection: Res<CarColorSelection>,
    mut texts: Query<(&mut Text, &HudField)>,
    mut standings: Query<(&mut Text, &mut TextColor, &StandingsRow), Without<HudField>>,
    mut speed_bar: Query<(&mut Node, &mut BackgroundColor), With<SpeedBar>>,
) {
    let data = &hud.0;

    for (mut text, field) in texts.iter_mut() {
        let value = field_text(*field, data, session.paused);
        if text.0 != value {
            text.0 = value;
        }
    }

    let order = race_order(&session.cars);
    let ai_colors = selection.ai_colors();
    for (mut text, mut color, row) in standings.iter_mut() {
        let Some(&index) = order.get(row.rank) else {
            continue;
        };
        text.0 = format!("{}. {}", row.rank + 1, driver_label(index));
        color.0 = if index == PLAYER_INDEX {
            selection.color()
        } else {
            ai_colors.get(index - 1).copied().unwrap_or(Color::WHITE)
        };
    }

    let fraction = (data.speed / MAX_SPEED).clamp(0.0, 1.0);
    for (mut node, mut color) in speed_bar.iter_mut() {
        node.width = Val::Percent(fraction * 100.0);
        color.0 = if fraction > 0.8 {
            Color::srgb(0.9, 0.2, 0.2)
        } else if fraction > 0.5 {
            Color::srgb(0.95, 0.7, 0.1)
        } else {
            Color::srgb(0.2, 0.8, 0.3)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.0");
        assert_eq!(format_time(9.34), "0:09.3");
        assert_eq!(format_time(75.5), "1:15.5");
        assert_eq!(format_time(600.0), "10:00.0");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(8), "8th");
    }

    #[test]
    fn test_position_panel_shows_field_size() {
        let data = HudSnapshot {
            position: 3,
            total_cars: 8,
            lap: 5,
            total_laps: 3,
            countdown: 0,
            ..HudSnapshot::default()
        };
        assert_eq!(field_text(HudField::Position, &data, false), "3rd");
        assert_eq!(field_text(HudField::TotalCars, &data, false), "of 8");
        assert_eq!(field_text(HudField::Lap, &data, false), "LAP 3/3");
        assert_eq!(field_text(HudField::Countdown, &data, false), "");
    }

    #[test]
    fn test_pause_banner_lists_restart_and_menu() {
        let data = HudSnapshot::default();
        assert_eq!(field_text(HudField::PauseBanner, &data, false), "");
        let banner = field_text(HudField::PauseBanner, &data, true);
        assert!(banner.starts_with("PAUSED"));
        assert!(banner.contains("[R] Restart"));
        assert!(banner.contains("[M] Menu"));
    }

    #[test]
    fn test_driver_labels() {
        assert_eq!(driver_label(PLAYER_INDEX), "YOU");
        assert_eq!(driver_label(1), "CPU 1");
        assert_eq!(driver_label(7), "CPU 7");
    }

    #[test]
    fn test_speed_kmh() {
        assert_eq!(speed_kmh(0.0), 0);
        assert_eq!(speed_kmh(65.0), 325);
    }
}
