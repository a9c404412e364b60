//! Property-based tests for the playback queue
//!
//! Uses proptest to verify invariants across many random inputs.

use cadence_core::Track;
use cadence_playback::{Direction, Queue, RepeatMode};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Helpers =====

/// Tracks with unique ids
fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    (1usize..30).prop_map(|count| {
        (0..count)
            .map(|i| Track::new(format!("t{}", i), format!("Track {}", i), "Artist"))
            .collect()
    })
}

fn queue_with_cursor() -> impl Strategy<Value = (Vec<Track>, usize)> {
    arbitrary_tracks().prop_flat_map(|tracks| {
        let len = tracks.len();
        (Just(tracks), 0..len)
    })
}

#[derive(Debug, Clone)]
enum Op {
    Remove(usize),
    Next,
    Previous,
    Shuffle,
    Repeat,
    Enqueue(u16),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..40).prop_map(Op::Remove),
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Shuffle),
        Just(Op::Repeat),
        any::<u16>().prop_map(Op::Enqueue),
    ]
}

fn assert_invariants(queue: &Queue) -> Result<(), TestCaseError> {
    if let Some(index) = queue.current_index() {
        prop_assert!(index < queue.len(), "cursor {} past length {}", index, queue.len());
    }
    if !queue.is_shuffled() {
        prop_assert!(
            queue.original_order().is_empty() || queue.original_order() == queue.tracks(),
            "original order diverged while unshuffled"
        );
    }
    Ok(())
}

// ===== Property Tests =====

proptest! {
    /// Property: repeat-all advances `len` times and lands where it started
    #[test]
    fn repeat_all_round_trip((tracks, start) in queue_with_cursor()) {
        let len = tracks.len();
        let mut queue = Queue::new();
        queue.set_queue(tracks, start).unwrap();
        queue.set_repeat(RepeatMode::All);

        for _ in 0..len {
            queue.advance(Direction::Next).unwrap();
        }
        prop_assert_eq!(queue.current_index(), Some(start));
    }

    /// Property: shuffle on then off restores order and active identity
    #[test]
    fn shuffle_toggle_restores((tracks, start) in queue_with_cursor(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = Queue::new();
        queue.set_queue(tracks.clone(), start).unwrap();
        let active = queue.current().unwrap().id.clone();

        queue.toggle_shuffle_with(&mut rng);
        prop_assert_eq!(&queue.tracks()[start].id, &active);

        queue.toggle_shuffle_with(&mut rng);
        prop_assert_eq!(queue.tracks(), tracks.as_slice());
        prop_assert_eq!(&queue.current().unwrap().id, &active);
    }

    /// Property: shuffling is a permutation
    #[test]
    fn shuffle_is_permutation((tracks, start) in queue_with_cursor(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = Queue::new();
        queue.set_queue(tracks.clone(), start).unwrap();
        queue.toggle_shuffle_with(&mut rng);

        let mut shuffled: Vec<_> = queue.tracks().iter().map(|t| t.id.clone()).collect();
        let mut original: Vec<_> = tracks.iter().map(|t| t.id.clone()).collect();
        shuffled.sort();
        original.sort();
        prop_assert_eq!(shuffled, original);
    }

    /// Property: the cursor never leaves the queue under any operation mix
    #[test]
    fn cursor_stays_in_bounds(
        (tracks, start) in queue_with_cursor(),
        ops in prop::collection::vec(arbitrary_op(), 0..60),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = Queue::with_max_size(200);
        queue.set_queue(tracks, start).unwrap();

        for op in ops {
            match op {
                Op::Remove(index) => {
                    let len = queue.len();
                    let result = queue.remove_at(index);
                    prop_assert_eq!(result.is_ok(), index < len);
                }
                Op::Next => {
                    let _ = queue.advance_with(Direction::Next, &mut rng);
                }
                Op::Previous => {
                    let _ = queue.advance_with(Direction::Previous, &mut rng);
                }
                Op::Shuffle => {
                    queue.toggle_shuffle_with(&mut rng);
                }
                Op::Repeat => {
                    queue.cycle_repeat();
                }
                Op::Enqueue(n) => {
                    let _ = queue.enqueue(Track::new(format!("e{}", n), "Extra", "Artist"));
                }
            }
            assert_invariants(&queue)?;
        }
    }
}
