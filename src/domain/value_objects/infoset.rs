//! Infoset - Per-turn input from the game engine

use super::card::Card;
use super::play::Play;
use super::seat::Seat;
use serde::{Deserialize, Serialize};

/// Authoritative remaining-card counts per seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCounts {
    pub landlord: usize,
    pub landlord_down: usize,
    pub landlord_up: usize,
}

impl SeatCounts {
    pub fn get(&self, seat: Seat) -> usize {
        match seat {
            Seat::Landlord => self.landlord,
            Seat::LandlordDown => self.landlord_down,
            Seat::LandlordUp => self.landlord_up,
        }
    }
}

/// Everything the engine supplies at one decision point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Infoset {
    /// Acting seat's current hand
    pub hand: Vec<Card>,
    /// Most recent opposing play, if any
    #[serde(default)]
    pub last_move: Option<Play>,
    /// Every move of the game so far, in play order
    #[serde(default)]
    pub action_sequence: Vec<Play>,
    /// Enumerated legal moves; never empty under the engine contract
    pub legal_moves: Vec<Play>,
    /// Per-seat remaining counts, when the engine exposes them
    #[serde(default)]
    pub seat_card_counts: Option<SeatCounts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_payload() {
        let json = r#"{
            "hand": [3, 4, 17],
            "last_move": [9, 9],
            "action_sequence": [[9, 9]],
            "legal_moves": [[], [10, 10]],
            "seat_card_counts": {"landlord": 17, "landlord_down": 15, "landlord_up": 16}
        }"#;
        let infoset: Infoset = serde_json::from_str(json).unwrap();
        assert_eq!(infoset.hand.len(), 3);
        assert_eq!(infoset.action_sequence.len(), 1);
        assert_eq!(infoset.legal_moves.len(), 2);
        assert!(infoset.legal_moves[0].is_pass());
        assert_eq!(infoset.seat_card_counts.unwrap().get(Seat::LandlordUp), 16);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"hand": [3], "legal_moves": [[3]]}"#;
        let infoset: Infoset = serde_json::from_str(json).unwrap();
        assert!(infoset.last_move.is_none());
        assert!(infoset.action_sequence.is_empty());
        assert!(infoset.seat_card_counts.is_none());
    }
}
