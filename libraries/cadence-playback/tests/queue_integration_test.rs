//! Queue management integration tests
//!
//! Real-world scenarios: playing a search result list, next/previous buttons,
//! shuffle and repeat toggles, editing the queue while something is active.

use cadence_core::Track;
use cadence_playback::{Direction, PlaybackError, Queue, RepeatMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Test Helpers =====

fn create_track(id: &str, title: &str, artist: &str) -> Track {
    Track::new(id, title, artist).with_duration(180)
}

fn search_results(count: usize) -> Vec<Track> {
    (1..=count)
        .map(|i| create_track(&i.to_string(), &format!("Track {}", i), "Artist"))
        .collect()
}

fn ids(queue: &Queue) -> Vec<String> {
    queue.tracks().iter().map(|t| t.id.to_string()).collect()
}

// ===== Queue Creation Tests =====

#[test]
fn test_play_from_results_starts_at_clicked_track() {
    let mut queue = Queue::new();

    // User clicks the third result
    queue.set_queue(search_results(5), 2).unwrap();

    assert_eq!(queue.current().unwrap().title, "Track 3");
    assert_eq!(queue.len(), 5);
    assert!(!queue.is_shuffled());
}

#[test]
fn test_new_search_resets_shuffle() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut queue = Queue::new();
    queue.set_queue(search_results(5), 0).unwrap();
    queue.toggle_shuffle_with(&mut rng);

    queue.set_queue(search_results(3), 0).unwrap();
    assert!(!queue.is_shuffled());
    assert_eq!(queue.original_order(), queue.tracks());
}

// ===== Navigation Tests =====

#[test]
fn test_next_through_queue_then_end() {
    let mut queue = Queue::new();
    let tracks = vec![
        create_track("a", "A", "X"),
        create_track("b", "B", "X"),
        create_track("c", "C", "X"),
    ];
    queue.set_queue(tracks, 1).unwrap();

    let track = queue.advance(Direction::Next).unwrap();
    assert_eq!(track.id.as_str(), "c");
    assert_eq!(queue.current_index(), Some(2));

    assert_eq!(
        queue.advance(Direction::Next).unwrap_err(),
        PlaybackError::EndOfQueue
    );
    assert_eq!(queue.current_index(), Some(2));
}

#[test]
fn test_repeat_all_full_cycle_returns_to_start() {
    let mut queue = Queue::new();
    queue.set_queue(search_results(4), 1).unwrap();
    queue.set_repeat(RepeatMode::All);

    for _ in 0..4 {
        queue.advance(Direction::Next).unwrap();
    }
    assert_eq!(queue.current_index(), Some(1));
}

#[test]
fn test_previous_then_next_is_identity() {
    let mut queue = Queue::new();
    queue.set_queue(search_results(4), 2).unwrap();

    queue.advance(Direction::Previous).unwrap();
    queue.advance(Direction::Next).unwrap();
    assert_eq!(queue.current_index(), Some(2));
}

// ===== Shuffle Tests =====

#[test]
fn test_shuffle_scenario_keeps_head() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut queue = Queue::new();
    queue
        .set_queue(
            vec![
                create_track("a", "A", "X"),
                create_track("b", "B", "X"),
                create_track("c", "C", "X"),
            ],
            0,
        )
        .unwrap();

    queue.toggle_shuffle_with(&mut rng);

    let order = ids(&queue);
    assert_eq!(order[0], "a");
    assert!(order[1..].contains(&"b".to_string()));
    assert!(order[1..].contains(&"c".to_string()));
}

#[test]
fn test_shuffle_toggle_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut queue = Queue::new();
    let tracks = search_results(10);
    queue.set_queue(tracks.clone(), 6).unwrap();

    queue.toggle_shuffle_with(&mut rng);
    assert_eq!(queue.current().unwrap().id.as_str(), "7");

    queue.toggle_shuffle_with(&mut rng);
    assert_eq!(queue.tracks(), tracks.as_slice());
    assert_eq!(queue.current().unwrap().id.as_str(), "7");
}

#[test]
fn test_remove_while_shuffled_then_restore() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut queue = Queue::new();
    queue.set_queue(search_results(5), 0).unwrap();
    queue.toggle_shuffle_with(&mut rng);

    let position = queue
        .tracks()
        .iter()
        .position(|t| t.id.as_str() == "3")
        .unwrap();
    queue.remove_at(position).unwrap();
    queue.toggle_shuffle_with(&mut rng);

    assert_eq!(ids(&queue), vec!["1", "2", "4", "5"]);
    assert_eq!(queue.current().unwrap().id.as_str(), "1");
}

// ===== Editing Tests =====

#[test]
fn test_remove_active_track_policy() {
    let mut queue = Queue::new();
    queue.set_queue(search_results(3), 2).unwrap();

    let removal = queue.remove_at(2).unwrap();
    assert!(removal.removed_active);
    assert_eq!(queue.current_index(), Some(1));
    assert_eq!(
        queue.advance(Direction::Next).unwrap_err(),
        PlaybackError::EndOfQueue
    );
}

#[test]
fn test_remove_last_remaining_track() {
    let mut queue = Queue::new();
    queue.set_queue(search_results(1), 0).unwrap();

    queue.remove_at(0).unwrap();
    assert!(queue.is_empty());
    assert_eq!(queue.current_index(), None);
    assert_eq!(
        queue.advance(Direction::Next).unwrap_err(),
        PlaybackError::EmptyQueue
    );
}

#[test]
fn test_clear_keeping_active() {
    let mut queue = Queue::new();
    queue.set_queue(search_results(6), 3).unwrap();
    let active = queue.current().cloned();

    queue.clear(active);
    assert_eq!(ids(&queue), vec!["4"]);
    assert_eq!(queue.current_index(), Some(0));
}
