//! Deck inventory - What remains unseen from one seat's perspective
//!
//! Unknown cards are the full deck minus the seat's hand minus every
//! card seen leaving play. Counts are exact; a negative count means the
//! caller fed us corrupt data and is reported, never clamped.

use crate::domain::value_objects::{Card, Play, Seat, SeatCounts};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("card {card} oversubscribed: hand and played history exceed its {copies} deck copies")]
    Oversubscribed { card: Card, copies: u8 },
}

/// Multiset subtraction: full deck minus hand minus played moves.
///
/// Returns the unseen cards sorted ascending.
pub fn unknown_cards(hand: &[Card], played: &[Play]) -> Result<Vec<Card>, InventoryError> {
    let mut remaining: BTreeMap<Card, i32> = Card::ALL
        .iter()
        .map(|&card| (card, i32::from(card.copies_in_deck())))
        .collect();

    let seen = hand
        .iter()
        .copied()
        .chain(played.iter().flat_map(|play| play.cards().iter().copied()));
    for card in seen {
        let count = remaining.entry(card).or_default();
        *count -= 1;
        if *count < 0 {
            return Err(InventoryError::Oversubscribed {
                card,
                copies: card.copies_in_deck(),
            });
        }
    }

    Ok(remaining
        .into_iter()
        .flat_map(|(card, count)| std::iter::repeat(card).take(count as usize))
        .collect())
}

/// Best-effort per-seat counts for when the engine supplies none.
///
/// The acting seat's count is exact; each unseen seat is estimated as
/// half the unseen total, rounded down. The odd remainder stays
/// unassigned rather than being guessed onto a seat.
pub fn estimate_seat_counts(seat: Seat, hand_len: usize, hidden_total: usize) -> SeatCounts {
    let share = hidden_total / 2;
    let mut counts = SeatCounts {
        landlord: share,
        landlord_down: share,
        landlord_up: share,
    };
    match seat {
        Seat::Landlord => counts.landlord = hand_len,
        Seat::LandlordDown => counts.landlord_down = hand_len,
        Seat::LandlordUp => counts.landlord_up = hand_len,
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DECK_SIZE;

    fn cards(ranks: &[u8]) -> Vec<Card> {
        ranks.iter().map(|&r| Card::from_rank(r).unwrap()).collect()
    }

    fn play(ranks: &[u8]) -> Play {
        Play::new(cards(ranks))
    }

    #[test]
    fn test_empty_view_yields_full_deck() {
        let unknown = unknown_cards(&[], &[]).unwrap();
        assert_eq!(unknown.len(), DECK_SIZE);
    }

    #[test]
    fn test_exact_multiset_subtraction() {
        let hand = cards(&[3, 3, 20]);
        let played = vec![play(&[3]), play(&[30])];
        let unknown = unknown_cards(&hand, &played).unwrap();

        assert_eq!(unknown.len(), DECK_SIZE - 5);
        assert_eq!(unknown.iter().filter(|c| **c == Card::Three).count(), 1);
        assert_eq!(unknown.iter().filter(|c| **c == Card::BlackJoker).count(), 0);
        assert_eq!(unknown.iter().filter(|c| **c == Card::RedJoker).count(), 0);
        assert_eq!(unknown.iter().filter(|c| **c == Card::Four).count(), 4);
    }

    #[test]
    fn test_output_is_sorted() {
        let unknown = unknown_cards(&cards(&[14, 14]), &[play(&[3, 3])]).unwrap();
        let mut sorted = unknown.clone();
        sorted.sort_unstable();
        assert_eq!(unknown, sorted);
    }

    #[test]
    fn test_oversubscribed_rank_is_an_error() {
        // Five threes can never exist.
        let hand = cards(&[3, 3, 3, 3]);
        let played = vec![play(&[3])];
        let err = unknown_cards(&hand, &played).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Oversubscribed {
                card: Card::Three,
                copies: 4
            }
        );
    }

    #[test]
    fn test_duplicate_joker_is_an_error() {
        let hand = cards(&[30]);
        let played = vec![play(&[30])];
        let err = unknown_cards(&hand, &played).unwrap_err();
        assert_eq!(
            err,
            InventoryError::Oversubscribed {
                card: Card::RedJoker,
                copies: 1
            }
        );
    }

    #[test]
    fn test_estimate_splits_hidden_total_evenly() {
        let counts = estimate_seat_counts(Seat::Landlord, 17, 34);
        assert_eq!(counts.landlord, 17);
        assert_eq!(counts.landlord_down, 17);
        assert_eq!(counts.landlord_up, 17);

        // Odd remainder stays unassigned.
        let counts = estimate_seat_counts(Seat::LandlordUp, 5, 33);
        assert_eq!(counts.landlord, 16);
        assert_eq!(counts.landlord_down, 16);
        assert_eq!(counts.landlord_up, 5);
    }
}
