use crate::GameState;
use crate::audio::AudioCue;
use crate::hud::{format_time, ordinal};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::race_plugin::RaceResult;
use bevy::prelude::*;

#[derive(Component)]
pub struct VictoryScreenEntity;

/// One line per leaderboard entry; the run that just finished is marked.
pub fn leaderboard_lines(entries: &[LeaderboardEntry], latest: Option<f32>) -> Vec<String> {
    let mut marked = false;
    entries
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            let is_latest = !marked && latest == Some(entry.time);
            marked |= is_latest;
            format!(
                "{}{:>2}. {}  {}",
                if is_latest { "> " } else { "  " },
                rank + 1,
                format_time(entry.time),
                ordinal(entry.position),
            )
        })
        .collect()
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

pub fn setup_victory_screen(
    mut commands: Commands,
    result: Option<Res<RaceResult>>,
    leaderboard: Res<Leaderboard>,
) {
    let Some(result) = result else {
        return;
    };
    let gold = Color::srgb(0.95, 0.75, 0.2);
    let muted = Color::srgb(0.6, 0.6, 0.65);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.05, 0.05, 0.07)),
            VictoryScreenEntity,
        ))
        .with_children(|parent| {
            if result.position <= 3 {
                parent.spawn(text("PODIUM FINISH!", 28.0, gold));
            }
            parent.spawn(text("RACE COMPLETE", 56.0, Color::WHITE));
            parent.spawn(text(ordinal(result.position), 48.0, gold));
            parent.spawn(text(format_time(result.time), 36.0, Color::WHITE));

            parent.spawn(text("LEADERBOARD", 14.0, muted));
            for line in leaderboard_lines(leaderboard.entries(), Some(result.time)) {
                parent.spawn(text(line, 18.0, Color::WHITE));
            }

            parent.spawn(text("[R] Race again    [M] Menu", 20.0, muted));
        });
}

pub fn check_for_victory_input(
    input: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut cues: EventWriter<AudioCue>,
) {
    if input.just_pressed(KeyCode::KeyR) {
        cues.write(AudioCue::Click);
        next_state.set(GameState::Playing);
    } else if input.any_just_pressed([KeyCode::KeyM, KeyCode::Escape]) {
        cues.write(AudioCue::Click);
        next_state.set(GameState::Title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: f32, position: usize) -> LeaderboardEntry {
        LeaderboardEntry {
            time,
            date: String::new(),
            position,
        }
    }

    #[test]
    fn test_latest_run_is_marked_once() {
        let entries = vec![entry(40.0, 1), entry(50.0, 2), entry(50.0, 4)];
        let lines = leaderboard_lines(&entries, Some(50.0));

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   1."));
        assert!(lines[1].starts_with(">  2."));
        assert!(!lines[2].starts_with(">"));
        assert!(lines[1].ends_with("2nd"));
    }
}
