//! Playback queue
//!
//! Ordered track list with a cursor, a shuffle/original-order pair, and the
//! repeat-mode state machine.
//!
//! ```text
//! tracks:          [C, A, D, B]     (shuffled view)
//!                      ^ cursor
//! original_order:  [A, B, C, D]     (restored when shuffle is disabled)
//! ```

use crate::error::{PlaybackError, Result};
use crate::shuffle::{random_index, shuffle_around};
use crate::types::{Direction, RepeatMode};
use cadence_core::{Track, TrackId};
use rand::Rng;

/// Result of removing a queue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The removed track
    pub track: Track,

    /// The removed entry was the one under the cursor
    pub removed_active: bool,
}

/// Playback queue
///
/// Invariants:
/// - the cursor is `None` or a valid index into `tracks`
/// - when not shuffled, `original_order` is empty or equal to `tracks`
#[derive(Debug, Clone)]
pub struct Queue {
    /// Tracks in play order
    tracks: Vec<Track>,

    /// Order before shuffling
    original_order: Vec<Track>,

    /// Active entry for highlighting, independent of transport state
    current_index: Option<usize>,

    repeat_mode: RepeatMode,

    shuffled: bool,

    /// Bound enforced by `enqueue`
    max_size: usize,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::with_max_size(100)
    }

    /// Create an empty queue accepting at most `max_size` enqueued tracks
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            tracks: Vec::new(),
            original_order: Vec::new(),
            current_index: None,
            repeat_mode: RepeatMode::Off,
            shuffled: false,
            max_size,
        }
    }

    // ===== Building =====

    /// Replace the queue wholesale
    ///
    /// Resets the original order to the new order and turns shuffle off. An
    /// empty list yields an empty queue with no cursor.
    ///
    /// # Errors
    /// `OutOfRange` when `start_index` is not a valid index; the queue is left
    /// unchanged.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if !tracks.is_empty() && start_index >= tracks.len() {
            return Err(PlaybackError::OutOfRange {
                index: start_index,
                len: tracks.len(),
            });
        }

        self.current_index = if tracks.is_empty() {
            None
        } else {
            Some(start_index)
        };
        self.original_order.clone_from(&tracks);
        self.tracks = tracks;
        self.shuffled = false;
        Ok(())
    }

    /// Restore a persisted queue
    ///
    /// An index outside the list is dropped rather than rejected.
    pub fn restore(&mut self, tracks: Vec<Track>, current_index: Option<usize>) {
        self.current_index = current_index.filter(|&index| index < tracks.len());
        self.original_order.clone_from(&tracks);
        self.tracks = tracks;
        self.shuffled = false;
    }

    /// Append a track
    ///
    /// Returns `true` when the queue was empty before the call, so the caller
    /// can start playback. The cursor is not moved.
    ///
    /// # Errors
    /// `QueueFull` when the queue is at its size bound
    pub fn enqueue(&mut self, track: Track) -> Result<bool> {
        if self.tracks.len() >= self.max_size {
            return Err(PlaybackError::QueueFull(self.max_size));
        }

        let was_empty = self.tracks.is_empty();
        if self.shuffled || !self.original_order.is_empty() || was_empty {
            self.original_order.push(track.clone());
        }
        self.tracks.push(track);
        Ok(was_empty)
    }

    /// Remove the entry at `index`
    ///
    /// Cursor policy:
    /// - removing before the cursor shifts it down by one
    /// - removing the cursor's own entry parks the cursor on the previous slot
    ///   (or clears it at index 0), so `next` resumes with the following track;
    ///   the caller is told via `removed_active` and should stop playback
    ///
    /// # Errors
    /// `OutOfRange` when `index` is not a valid index
    pub fn remove_at(&mut self, index: usize) -> Result<Removal> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.tracks.len(),
            });
        }

        let track = self.tracks.remove(index);
        if self.shuffled {
            if let Some(pos) = self.original_order.iter().position(|t| t.id == track.id) {
                self.original_order.remove(pos);
            }
        } else if index < self.original_order.len() {
            self.original_order.remove(index);
        }

        let removed_active = self.current_index == Some(index);
        self.current_index = match self.current_index {
            Some(current) if current > index => Some(current - 1),
            Some(current) if current == index => index.checked_sub(1),
            other => other,
        };

        Ok(Removal {
            track,
            removed_active,
        })
    }

    /// Empty the queue
    ///
    /// With `keep`, the cleared queue holds exactly that track at index 0.
    pub fn clear(&mut self, keep: Option<Track>) {
        self.tracks.clear();
        self.original_order.clear();
        self.current_index = None;

        if let Some(track) = keep {
            self.tracks.push(track.clone());
            self.original_order.push(track);
            self.current_index = Some(0);
        }
    }

    // ===== Navigation =====

    /// Move the cursor and return the track now under it
    ///
    /// Shuffled queues draw a uniform random index for either direction.
    ///
    /// # Errors
    /// `EmptyQueue`, or `EndOfQueue` / `StartOfQueue` at the edges without
    /// repeat-all (the cursor does not move)
    pub fn advance(&mut self, direction: Direction) -> Result<&Track> {
        self.advance_with(direction, &mut rand::thread_rng())
    }

    /// [`advance`](Self::advance) with an explicit random source
    pub fn advance_with<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Result<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlaybackError::EmptyQueue);
        }

        let target = if self.shuffled {
            random_index(len, rng)
        } else {
            self.step(direction, len)?
        };

        self.current_index = Some(target);
        Ok(&self.tracks[target])
    }

    fn step(&self, direction: Direction, len: usize) -> Result<usize> {
        let wrap = self.repeat_mode == RepeatMode::All;
        match (direction, self.current_index) {
            (Direction::Next, None) => Ok(0),
            (Direction::Next, Some(current)) if current + 1 < len => Ok(current + 1),
            (Direction::Next, Some(_)) if wrap => Ok(0),
            (Direction::Next, Some(_)) => Err(PlaybackError::EndOfQueue),
            (Direction::Previous, Some(current)) if current > 0 => Ok(current - 1),
            (Direction::Previous, _) if wrap => Ok(len - 1),
            (Direction::Previous, _) => Err(PlaybackError::StartOfQueue),
        }
    }

    /// Put the cursor on `index` and return that track
    ///
    /// # Errors
    /// `OutOfRange` when `index` is not a valid index
    pub fn jump_to(&mut self, index: usize) -> Result<&Track> {
        let len = self.tracks.len();
        let track = self
            .tracks
            .get(index)
            .ok_or(PlaybackError::OutOfRange { index, len })?;
        self.current_index = Some(index);
        Ok(track)
    }

    /// Move the cursor to the first entry with `id`
    ///
    /// Leaves the cursor alone and returns `None` when the id is not queued.
    pub fn focus(&mut self, id: &TrackId) -> Option<usize> {
        let index = self.position_of(id)?;
        self.current_index = Some(index);
        Some(index)
    }

    /// Whether a non-wrapping `next` would find a track
    pub fn has_next(&self) -> bool {
        match self.current_index {
            Some(current) => current + 1 < self.tracks.len(),
            None => !self.tracks.is_empty(),
        }
    }

    // ===== Shuffle / Repeat =====

    /// Flip shuffle, returning the new state
    ///
    /// Enabling keeps the active track at its position and shuffles the rest
    /// around it. Disabling restores the original order and follows the
    /// active track by id.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// [`toggle_shuffle`](Self::toggle_shuffle) with an explicit random source
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.shuffled {
            let active = self.current().map(|t| t.id.clone());
            self.tracks = std::mem::take(&mut self.original_order);
            self.original_order.clone_from(&self.tracks);
            self.current_index = active.and_then(|id| self.position_of(&id));
            self.shuffled = false;
        } else {
            self.original_order.clone_from(&self.tracks);
            shuffle_around(&mut self.tracks, self.current_index, rng);
            self.shuffled = true;
        }
        self.shuffled
    }

    /// Advance the repeat mode through its cycle, returning the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat_mode = self.repeat_mode.cycle();
        self.repeat_mode
    }

    /// Set the repeat mode directly
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat_mode = mode;
    }

    // ===== Accessors =====

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|index| self.tracks.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Order before shuffling (empty or equal to `tracks` when not shuffled)
    pub fn original_order(&self) -> &[Track] {
        &self.original_order
    }

    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
