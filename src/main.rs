//! Dark Pines entry point
//!
//! Plays one session headlessly with an autopilot: walk to the nearest note,
//! sprint while stamina lasts, run from the monster once it appears.
//!
//! Usage: `dark-pines [seed] [tuning.json]`

use dark_pines::session::Headless;
use dark_pines::sim::{MonsterState, MoveIntent, Outcome, TickInput};
use dark_pines::{Session, Settings, Tuning, consts::*, flatten};

/// Simulated frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
/// Losses before the demo gives up
const MAX_ATTEMPTS: u32 = 3;
/// Stamina needed before the autopilot starts a sprint
const SPRINT_THRESHOLD: f32 = 30.0;
const SETTINGS_PATH: &str = "dark-pines-settings.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dark Pines (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);

    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Bad tuning file {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let settings = Settings::load(SETTINGS_PATH);
    let mut rig = Headless::new(&settings);
    let mut session = Session::new(seed, tuning, settings);
    session.start(&mut rig.frontend());

    let max_frames = ((MAX_TIME + 60.0) / FRAME_DT) as u64 * u64::from(MAX_ATTEMPTS);
    let mut attempts = 1;
    let mut frames = 0u64;

    while frames < max_frames {
        let (input, sprint) = autopilot(&session, &mut rig);
        session.set_sprint(sprint);
        session.frame(FRAME_DT, &input, &mut rig.frontend());
        session.interact(&mut rig.frontend());
        frames += 1;

        match session.state().outcome {
            Outcome::Playing => {}
            Outcome::Won => break,
            Outcome::Lost(cause) if attempts < MAX_ATTEMPTS => {
                log::info!("Attempt {} lost ({:?}), respawning", attempts, cause);
                attempts += 1;
                session.respawn(&mut rig.frontend());
            }
            Outcome::Lost(_) => break,
        }
    }

    let state = session.state();
    log::info!(
        "Finished after {} frames: {:?} with {}/{} notes, {:.1}s left, {} attempt(s)",
        frames,
        state.outcome,
        state.notes_collected,
        state.notes_required,
        state.time_left,
        attempts
    );
    if let Some(scene) = &rig.frames.last {
        match serde_json::to_string(scene) {
            Ok(json) => log::debug!("Last scene: {}", json),
            Err(e) => log::warn!("Could not serialize last scene: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser frontend; the library is driven by an embedding page
}

/// Steer the camera and pick this frame's keys and sprint
fn autopilot(session: &Session, rig: &mut Headless) -> (TickInput, bool) {
    let state = session.state();
    let here = rig.camera.pos;

    let fleeing = matches!(
        state.monster_state,
        MonsterState::Approaching | MonsterState::Chasing
    );
    if fleeing {
        let away = flatten(here - state.monster.pos);
        rig.camera.face_toward(here + away);
    } else if let Some(note) = dark_pines::sim::progress::remaining_notes(state).min_by(|a, b| {
        flatten(a.pos - here)
            .length_squared()
            .total_cmp(&flatten(b.pos - here).length_squared())
    }) {
        rig.camera.face_toward(note.pos);
    }

    // Keep sprinting until drained, then wait for the threshold again
    let sprint = fleeing
        || state.stamina > SPRINT_THRESHOLD
        || (state.sprint_requested && state.stamina > 0.0);

    let input = TickInput {
        movement: MoveIntent {
            forward: true,
            ..Default::default()
        },
    };
    (input, sprint)
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
