//! Play - A move: an order-irrelevant multiset of cards
//!
//! Stored sorted so that plain equality is multiset equality. The empty
//! play is a pass.

use super::card::{format_card_list, Card};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Upper bound on cards in one hand or one play
pub const MAX_PLAY_SIZE: usize = 20;

/// A single move in canonical (sorted) form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct Play {
    cards: SmallVec<[Card; MAX_PLAY_SIZE]>,
}

impl Play {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: SmallVec<[Card; MAX_PLAY_SIZE]> = cards.into_iter().collect();
        cards.sort_unstable();
        Play { cards }
    }

    /// The empty play
    pub fn pass() -> Self {
        Play::default()
    }

    #[inline]
    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Count of a given rank within the play
    pub fn count_of(&self, card: Card) -> usize {
        self.cards.iter().filter(|c| **c == card).count()
    }
}

impl From<Vec<Card>> for Play {
    fn from(cards: Vec<Card>) -> Self {
        Play::new(cards)
    }
}

impl From<Play> for Vec<Card> {
    fn from(play: Play) -> Self {
        play.cards.into_vec()
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_card_list(&self.cards))
    }
}
