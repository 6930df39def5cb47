use bevy::audio::{AudioPlugin, AudioSink, AudioSinkPlayback, Pitch, PlaybackSettings, Volume};
use bevy::prelude::*;
use std::time::Duration;

const ENGINE_BASE_HZ: f32 = 55.0;
const ENGINE_HZ_PER_SPEED: f32 = 4.0;
const ENGINE_MAX_VOLUME: f32 = 0.12;
const FANFARE_HZ: [f32; 4] = [523.0, 659.0, 784.0, 1047.0];

/// Sound cues raised by the race and the menus.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum AudioCue {
    Lap,
    Crash,
    Finish,
    Click,
    /// Continuous engine update with the player's speed magnitude.
    Engine(f32),
}

#[derive(Component)]
pub struct EngineHum;

/// Pending fanfare notes, played one after another.
#[derive(Component)]
struct FanfareNote {
    delay: Timer,
    frequency: f32,
}

pub struct RaceAudioPlugin;

impl Plugin for RaceAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AudioCue>();

        // Without an audio backend every cue is dropped and the race carries on.
        if !app.is_plugin_added::<AudioPlugin>() {
            warn!("Audio unavailable, race sounds disabled");
            app.add_systems(Update, drain_cues);
            return;
        }

        app.add_systems(Update, (play_cues, play_fanfare_notes));
    }
}

pub fn engine_playback_speed(speed: f32) -> f32 {
    (ENGINE_BASE_HZ + speed.abs() * ENGINE_HZ_PER_SPEED) / ENGINE_BASE_HZ
}

pub fn engine_volume(speed: f32) -> f32 {
    (speed.abs() * 0.008).min(ENGINE_MAX_VOLUME)
}

fn drain_cues(mut cues: EventReader<AudioCue>) {
    cues.clear();
}

fn tone(
    commands: &mut Commands,
    pitches: &mut Assets<Pitch>,
    frequency: f32,
    millis: u64,
    volume: f32,
) {
    commands.spawn((
        AudioPlayer(pitches.add(Pitch::new(frequency, Duration::from_millis(millis)))),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(volume)),
    ));
}

fn play_cues(
    mut commands: Commands,
    mut cues: EventReader<AudioCue>,
    mut pitches: ResMut<Assets<Pitch>>,
    hum: Query<(), With<EngineHum>>,
    mut engine: Query<&mut AudioSink, With<EngineHum>>,
) {
    for cue in cues.read() {
        match *cue {
            AudioCue::Lap => tone(&mut commands, &mut pitches, 990.0, 400, 0.2),
            AudioCue::Crash => tone(&mut commands, &mut pitches, 90.0, 150, 0.3),
            AudioCue::Click => tone(&mut commands, &mut pitches, 1000.0, 80, 0.1),
            AudioCue::Finish => {
                for (i, frequency) in FANFARE_HZ.into_iter().enumerate() {
                    commands.spawn(FanfareNote {
                        delay: Timer::from_seconds(i as f32 * 0.15, TimerMode::Once),
                        frequency,
                    });
                }
            }
            AudioCue::Engine(speed) => {
                if hum.is_empty() {
                    commands.spawn((
                        AudioPlayer(pitches.add(Pitch::new(ENGINE_BASE_HZ, Duration::from_secs(1)))),
                        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.0)),
                        EngineHum,
                    ));
                }
                for mut sink in engine.iter_mut() {
                    sink.set_speed(engine_playback_speed(speed));
                    sink.set_volume(Volume::Linear(engine_volume(speed)));
                }
            }
        }
    }
}

fn play_fanfare_notes(
    mut commands: Commands,
    time: Res<Time>,
    mut pitches: ResMut<Assets<Pitch>>,
    mut notes: Query<(Entity, &mut FanfareNote)>,
) {
    for (entity, mut note) in notes.iter_mut() {
        if note.delay.tick(time.delta()).finished() {
            tone(&mut commands, &mut pitches, note.frequency, 400, 0.15);
            commands.entity(entity).despawn();
        }
    }
}

/// Silences the engine when leaving a race.
pub fn stop_engine(mut commands: Commands, hum: Query<Entity, With<EngineHum>>) {
    for entity in hum.iter() {
        commands.entity(entity).despawn();
    }
}
