//! GameState - One agent's mutable view of the game in progress
//!
//! Rebuilt incrementally from the engine's action sequence. Owned
//! exclusively by a single seat agent; never shared.

use super::card::Card;
use super::infoset::Infoset;
use super::play::Play;
use super::seat::Seat;

#[derive(Debug, Clone, Default)]
pub struct GameState {
    /// Sorted copy of the acting seat's current hand
    pub hand: Vec<Card>,
    /// Most recent opposing play, as reported by the engine
    pub last_move: Option<Play>,
    /// Seat that produced the newest sequence entry
    pub last_seat: Option<Seat>,
    /// Seat-attributed history, passes included
    pub played_with_seat: Vec<(Seat, Play)>,
    /// Non-pass plays only, in play order
    pub played: Vec<Play>,
    // Sequence entries already folded in; guards idempotent re-entry
    processed_len: usize,
}

impl GameState {
    pub fn new() -> Self {
        GameState::default()
    }

    /// Forget everything; the explicit game boundary
    pub fn reset(&mut self) {
        *self = GameState::default();
    }

    #[inline]
    pub fn processed_len(&self) -> usize {
        self.processed_len
    }

    /// Total cards seen leaving play
    pub fn cards_played_count(&self) -> usize {
        self.played.iter().map(|p| p.len()).sum()
    }

    /// (plays, passes) recorded for one seat
    pub fn seat_record(&self, seat: Seat) -> (usize, usize) {
        let mut plays = 0;
        let mut passes = 0;
        for (s, play) in &self.played_with_seat {
            if *s == seat {
                if play.is_pass() {
                    passes += 1;
                } else {
                    plays += 1;
                }
            }
        }
        (plays, passes)
    }

    /// Fold new action-sequence entries into the history.
    ///
    /// Re-running on an unchanged sequence is a no-op; a longer
    /// sequence only processes the new suffix. A sequence shorter than
    /// what was already processed means the engine started a new game
    /// without telling us, so the history is rebuilt from scratch.
    pub fn sync_sequence(&mut self, sequence: &[Play]) {
        if sequence.len() < self.processed_len {
            self.played.clear();
            self.played_with_seat.clear();
            self.processed_len = 0;
        }
        for (i, play) in sequence.iter().enumerate().skip(self.processed_len) {
            let seat = Seat::for_turn(i);
            self.played_with_seat.push((seat, play.clone()));
            if !play.is_pass() {
                self.played.push(play.clone());
            }
        }
        self.processed_len = sequence.len();
        self.last_seat = sequence.len().checked_sub(1).map(Seat::for_turn);
    }

    /// Degraded path for engines that expose only the single most
    /// recent move. Appends a non-pass move unless it equals the newest
    /// recorded play. Consecutive identical moves from distinct turns
    /// cannot be told apart without a sequence; that loss is accepted.
    pub fn note_last_move(&mut self, play: &Play) {
        if play.is_pass() {
            return;
        }
        if self.played.last() == Some(play) {
            return;
        }
        self.played.push(play.clone());
    }

    /// Refresh the whole view from one engine infoset.
    ///
    /// Runs unconditionally at the top of every turn, before any
    /// decision is attempted.
    pub fn observe(&mut self, infoset: &Infoset) {
        if infoset.action_sequence.is_empty() && self.processed_len == 0 {
            if let Some(play) = &infoset.last_move {
                self.note_last_move(play);
            }
        } else {
            self.sync_sequence(&infoset.action_sequence);
        }
        self.hand = infoset.hand.clone();
        self.hand.sort_unstable();
        self.last_move = infoset.last_move.clone();
    }
}
