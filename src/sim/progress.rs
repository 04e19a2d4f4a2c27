//! Note placement and collection

use glam::Vec3;

use super::events::RandomSource;
use super::state::{GameEvent, GameState};
use crate::audio::Sound;
use crate::consts::{NOTE_HEIGHT, NOTE_MIN_SPAWN_DISTANCE, NOTE_SCATTER_HALF_EXTENT};

/// Attempts before a rejected scatter point is pushed out instead
const SCATTER_ATTEMPTS: u32 = 64;

/// Random note position away from the spawn point
pub fn scatter_position(rng: &mut dyn RandomSource) -> Vec3 {
    let mut sample = || {
        let x = (rng.chance() - 0.5) * 2.0 * NOTE_SCATTER_HALF_EXTENT;
        let z = (rng.chance() - 0.5) * 2.0 * NOTE_SCATTER_HALF_EXTENT;
        Vec3::new(x, NOTE_HEIGHT, z)
    };

    let mut pos = sample();
    for _ in 0..SCATTER_ATTEMPTS {
        if crate::flatten(pos).length() > NOTE_MIN_SPAWN_DISTANCE {
            return pos;
        }
        pos = sample();
    }

    // Unlucky source: push the last sample out to the ring
    let dir = crate::flatten(pos).normalize_or(Vec3::X);
    let ring = dir * (NOTE_MIN_SPAWN_DISTANCE + 1.0);
    Vec3::new(ring.x, NOTE_HEIGHT, ring.z)
}

/// Notes still lying in the world
pub fn remaining_notes(state: &GameState) -> impl Iterator<Item = &super::state::Note> {
    state.notes.iter().filter(|n| !n.collected)
}

/// Nearest uncollected note within `max_distance` of `from`
pub fn nearest_note_within(state: &GameState, from: Vec3, max_distance: f32) -> Option<u32> {
    remaining_notes(state)
        .map(|n| (n.id, n.pos.distance(from)))
        .filter(|(_, d)| *d < max_distance)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

/// Collect a note the caller has found to be within reach
///
/// Unknown or already collected notes are ignored. Returns the new note
/// count, which is the milestone handed to the event dispatcher.
pub fn collect_note(state: &mut GameState, note_id: u32) -> Option<u32> {
    if state.all_notes_collected() {
        return None;
    }
    let note = state
        .notes
        .iter_mut()
        .find(|n| n.id == note_id && !n.collected)?;
    note.collected = true;

    state.notes_collected += 1;
    let count = state.notes_collected;
    log::info!("Note {} collected ({}/{})", note_id, count, state.notes_required);

    state.play(Sound::Pickup);
    state.emit(GameEvent::NoteCollected { count });
    if count % 2 == 0 {
        state.emit(GameEvent::Checkpoint);
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state() -> GameState {
        let mut rng = Pcg32::seed_from_u64(11);
        GameState::new(Tuning::default(), &mut rng)
    }

    /// Always returns the middle of the range
    struct Centered;

    impl RandomSource for Centered {
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
        fn chance(&mut self) -> f32 {
            0.5
        }
    }

    #[test]
    fn test_scatter_keeps_away_from_spawn() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let pos = scatter_position(&mut rng);
            assert!(crate::flatten(pos).length() > NOTE_MIN_SPAWN_DISTANCE);
            assert!(pos.x.abs() <= NOTE_SCATTER_HALF_EXTENT);
            assert!(pos.z.abs() <= NOTE_SCATTER_HALF_EXTENT);
            assert_eq!(pos.y, NOTE_HEIGHT);
        }
    }

    #[test]
    fn test_scatter_terminates_with_degenerate_source() {
        let pos = scatter_position(&mut Centered);
        assert!(crate::flatten(pos).length() > NOTE_MIN_SPAWN_DISTANCE);
    }

    #[test]
    fn test_collect_twice_counts_once() {
        let mut state = new_state();
        let id = state.notes[0].id;
        assert_eq!(collect_note(&mut state, id), Some(1));
        assert_eq!(collect_note(&mut state, id), None);
        assert_eq!(state.notes_collected, 1);
        assert_eq!(remaining_notes(&state).count(), 9);
    }

    #[test]
    fn test_unknown_note_ignored() {
        let mut state = new_state();
        assert_eq!(collect_note(&mut state, 9999), None);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_checkpoint_on_even_counts() {
        let mut state = new_state();
        let ids: Vec<u32> = state.notes.iter().map(|n| n.id).collect();
        let mut checkpoints = Vec::new();
        for id in ids.into_iter().take(4) {
            let count = collect_note(&mut state, id).unwrap();
            if state.drain_events().contains(&GameEvent::Checkpoint) {
                checkpoints.push(count);
            }
        }
        assert_eq!(checkpoints, vec![2, 4]);
    }

    #[test]
    fn test_nearest_note_within_reach() {
        let mut state = new_state();
        state.notes[0].pos = Vec3::new(3.0, NOTE_HEIGHT, 0.0);
        state.notes[1].pos = Vec3::new(5.0, NOTE_HEIGHT, 0.0);
        let near = state.notes[0].id;
        let from = Vec3::new(0.0, NOTE_HEIGHT, 0.0);

        assert_eq!(nearest_note_within(&state, from, 8.0), Some(near));
        collect_note(&mut state, near);
        assert_eq!(nearest_note_within(&state, from, 4.0), None);
    }
}
