use crate::GameState;
use crate::audio::{AudioCue, stop_engine};
use crate::camera::{move_camera, reset_camera};
use crate::car::{CarColorSelection, sample_driver_input, spawn_cars, sync_car_transforms};
use crate::game_logic::{
    COUNTDOWN_DURATION, CarBody, HudSnapshot, PLAYER_INDEX, PhysicsInput, RaceEvent, RaceSession,
    TrackCurve,
};
use crate::hud::{HudEntity, HudState, setup_hud, update_hud};
use crate::leaderboard::{Leaderboard, LeaderboardStore};
use crate::terrain::{SceneryMode, TrackScenery, spawn_track};
use crate::title_screen::despawn_screen;
use bevy::prelude::*;

const RESULTS_DELAY_SECS: f32 = 0.8;

/// Raised once when the player crosses the line on the final lap.
#[derive(Event, Clone, Copy, Debug)]
pub struct RaceFinished {
    pub time: f32,
    pub position: usize,
}

/// Outcome of the last completed race, shown on the results screen.
#[derive(Resource, Clone, Debug)]
pub struct RaceResult {
    pub time: f32,
    pub position: usize,
}

#[derive(Resource)]
pub struct ResultsDelay {
    pub timer: Timer,
}

pub struct RacePlugin;

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        let track = TrackCurve::circuit();
        let store = LeaderboardStore::default();
        info!("Leaderboard at {}", store.path().display());

        app.insert_resource(RaceSession::new(&track))
            .insert_resource(track)
            .insert_resource(store.load())
            .insert_resource(store)
            .init_resource::<PhysicsInput>()
            .init_resource::<HudState>()
            .init_resource::<CarColorSelection>()
            .init_resource::<SceneryMode>()
            .add_event::<RaceFinished>()
            .add_systems(
                OnEnter(GameState::Playing),
                (start_race, (spawn_track, spawn_cars, setup_hud)).chain(),
            )
            .add_systems(
                Update,
                (
                    sample_driver_input,
                    toggle_pause,
                    pause_menu_input,
                    advance_race,
                    record_result,
                    (sync_car_transforms, move_camera, update_hud),
                    show_results_after_delay,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                OnExit(GameState::Playing),
                (
                    despawn_screen::<CarBody>,
                    despawn_screen::<TrackScenery>,
                    despawn_screen::<HudEntity>,
                    stop_engine,
                    reset_camera,
                ),
            );
    }
}

/// Throws away any previous race and lines up a fresh grid.
fn start_race(
    track: Res<TrackCurve>,
    mut session: ResMut<RaceSession>,
    mut hud: ResMut<HudState>,
    mut input: ResMut<PhysicsInput>,
) {
    session.restart(&track);
    *hud = HudState(HudSnapshot::countdown(COUNTDOWN_DURATION, session.total_laps));
    *input = PhysicsInput::default();
    info!(
        "New race: {} laps of {:.0}m, {} cars",
        session.total_laps,
        track.length(),
        session.cars.len()
    );
}

fn toggle_pause(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<RaceSession>,
    mut cues: EventWriter<AudioCue>,
) {
    if !keys.just_pressed(KeyCode::Escape) || session.finished {
        return;
    }

    if session.toggle_pause() {
        info!("Paused");
        cues.write(AudioCue::Engine(0.0));
    } else {
        info!("Resumed");
    }
}

/// While paused, R restarts the race in place and M abandons it for the menu.
fn pause_menu_input(
    keys: Res<ButtonInput<KeyCode>>,
    track: Res<TrackCurve>,
    mut session: ResMut<RaceSession>,
    mut hud: ResMut<HudState>,
    mut next_state: ResMut<NextState<GameState>>,
    mut cues: EventWriter<AudioCue>,
) {
    if !session.paused {
        return;
    }

    if keys.just_pressed(KeyCode::KeyR) {
        session.restart(&track);
        hud.0 = HudSnapshot::countdown(COUNTDOWN_DURATION, session.total_laps);
        cues.write(AudioCue::Click);
        info!("Race restarted");
    } else if keys.just_pressed(KeyCode::KeyM) {
        cues.write(AudioCue::Click);
        info!("Race abandoned");
        next_state.set(GameState::Title);
    }
}

/// Runs one simulation step and forwards its output to the HUD and audio.
fn advance_race(
    time: Res<Time>,
    track: Res<TrackCurve>,
    input: Res<PhysicsInput>,
    mut session: ResMut<RaceSession>,
    mut hud: ResMut<HudState>,
    mut cues: EventWriter<AudioCue>,
    mut finished: EventWriter<RaceFinished>,
) {
    let outcome = session.step(&track, &input, time.delta_secs());

    if let Some(snapshot) = outcome.hud {
        hud.0 = snapshot;
    }
    if let Some(speed) = outcome.engine_speed {
        cues.write(AudioCue::Engine(speed));
    }

    for event in outcome.events {
        match event {
            RaceEvent::LapCompleted { car, .. } if car == PLAYER_INDEX => {
                cues.write(AudioCue::Lap);
            }
            RaceEvent::LapCompleted { .. } => {}
            RaceEvent::BoundaryCrash => {
                cues.write(AudioCue::Crash);
            }
            RaceEvent::RaceFinished { time, position } => {
                cues.write(AudioCue::Finish);
                finished.write(RaceFinished { time, position });
            }
        }
    }
}

fn record_result(
    mut commands: Commands,
    mut finished: EventReader<RaceFinished>,
    mut leaderboard: ResMut<Leaderboard>,
    store: Res<LeaderboardStore>,
) {
    for result in finished.read() {
        leaderboard.record(result.time, result.position);
        if leaderboard.contains_time(result.time) {
            info!("{:.2}s made the leaderboard", result.time);
        }
        if let Err(err) = store.save(&leaderboard) {
            warn!("Could not save leaderboard: {}", err);
        }

        commands.insert_resource(RaceResult {
            time: result.time,
            position: result.position,
        });
        commands.insert_resource(ResultsDelay {
            timer: Timer::from_seconds(RESULTS_DELAY_SECS, TimerMode::Once),
        });
    }
}

fn show_results_after_delay(
    mut commands: Commands,
    time: Res<Time>,
    delay: Option<ResMut<ResultsDelay>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut delay) = delay else {
        return;
    };

    if delay.timer.tick(time.delta()).finished() {
        commands.remove_resource::<ResultsDelay>();
        next_state.set(GameState::Victory);
    }
}
