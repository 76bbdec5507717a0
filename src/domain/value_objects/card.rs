//! Card - Rank-valued card type and oracle-facing token codec
//!
//! Ranks follow the engine encoding: 3-10 at face value, J=11, Q=12,
//! K=13, A=14, 2=17, black joker=20, red joker=30.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Total cards in a Dou Dizhu deck
pub const DECK_SIZE: usize = 54;

/// Token the oracle uses to designate a pass
pub const PASS_TOKEN: &str = "过牌";

/// A single card, identified by rank only (suits are irrelevant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Card {
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
    // 2 outranks the ace
    Two = 17,
    BlackJoker = 20,
    RedJoker = 30,
}

impl Card {
    /// All ranks, ascending
    pub const ALL: [Card; 15] = [
        Card::Three,
        Card::Four,
        Card::Five,
        Card::Six,
        Card::Seven,
        Card::Eight,
        Card::Nine,
        Card::Ten,
        Card::Jack,
        Card::Queen,
        Card::King,
        Card::Ace,
        Card::Two,
        Card::BlackJoker,
        Card::RedJoker,
    ];

    /// Numeric rank in the engine encoding
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            3 => Some(Card::Three),
            4 => Some(Card::Four),
            5 => Some(Card::Five),
            6 => Some(Card::Six),
            7 => Some(Card::Seven),
            8 => Some(Card::Eight),
            9 => Some(Card::Nine),
            10 => Some(Card::Ten),
            11 => Some(Card::Jack),
            12 => Some(Card::Queen),
            13 => Some(Card::King),
            14 => Some(Card::Ace),
            17 => Some(Card::Two),
            20 => Some(Card::BlackJoker),
            30 => Some(Card::RedJoker),
            _ => None,
        }
    }

    /// Display token exchanged with the oracle
    pub fn token(self) -> &'static str {
        match self {
            Card::Three => "3",
            Card::Four => "4",
            Card::Five => "5",
            Card::Six => "6",
            Card::Seven => "7",
            Card::Eight => "8",
            Card::Nine => "9",
            Card::Ten => "10",
            Card::Jack => "J",
            Card::Queen => "Q",
            Card::King => "K",
            Card::Ace => "A",
            Card::Two => "2",
            Card::BlackJoker => "小王",
            Card::RedJoker => "大王",
        }
    }

    /// Reverse token lookup; latin tokens match case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            "小王" => return Some(Card::BlackJoker),
            "大王" => return Some(Card::RedJoker),
            _ => {}
        }
        match token.to_ascii_uppercase().as_str() {
            "3" => Some(Card::Three),
            "4" => Some(Card::Four),
            "5" => Some(Card::Five),
            "6" => Some(Card::Six),
            "7" => Some(Card::Seven),
            "8" => Some(Card::Eight),
            "9" => Some(Card::Nine),
            "10" => Some(Card::Ten),
            "J" => Some(Card::Jack),
            "Q" => Some(Card::Queen),
            "K" => Some(Card::King),
            "A" => Some(Card::Ace),
            "2" => Some(Card::Two),
            _ => None,
        }
    }

    /// Copies of this rank in a full deck
    #[inline]
    pub fn copies_in_deck(self) -> u8 {
        match self {
            Card::BlackJoker | Card::RedJoker => 1,
            _ => 4,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl TryFrom<u8> for Card {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::from_rank(value).ok_or_else(|| format!("invalid card rank: {}", value))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.rank()
    }
}

/// The full 54-card deck: four of each rank, one of each joker
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for card in Card::ALL {
        for _ in 0..card.copies_in_deck() {
            deck.push(card);
        }
    }
    deck
}

/// True for either accepted pass spelling
pub fn is_pass_token(token: &str) -> bool {
    let token = token.trim();
    token == PASS_TOKEN || token.eq_ignore_ascii_case("pass")
}

/// Split a card designation into tokens.
///
/// Separators are Unicode whitespace plus the comma variants the oracle
/// has been seen to use. Empty tokens are dropped.
pub fn split_designation(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == '，' || c == '、')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Result of mapping a designation's tokens through the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenScan<'a> {
    pub cards: Vec<Card>,
    pub unmatched: Vec<&'a str>,
}

impl TokenScan<'_> {
    /// True when no token mapped to a card
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Map every token of a designation, keeping unmapped tokens countable
pub fn scan_tokens(text: &str) -> TokenScan<'_> {
    let mut cards = Vec::new();
    let mut unmatched = Vec::new();
    for token in split_designation(text) {
        match Card::from_token(token) {
            Some(card) => cards.push(card),
            None => unmatched.push(token),
        }
    }
    TokenScan { cards, unmatched }
}

/// Render cards as space-separated tokens; an empty list renders as a pass
pub fn format_card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return PASS_TOKEN.to_string();
    }
    cards
        .iter()
        .map(|c| c.token())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render cards grouped by rank, e.g. "3×2 J×1"
pub fn format_grouped(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "无".to_string();
    }
    let mut sorted = cards.to_vec();
    sorted.sort_unstable();

    let mut parts: Vec<String> = Vec::new();
    let mut run = (sorted[0], 0usize);
    for &card in &sorted {
        if card == run.0 {
            run.1 += 1;
        } else {
            parts.push(format!("{}×{}", run.0.token(), run.1));
            run = (card, 1);
        }
    }
    parts.push(format!("{}×{}", run.0.token(), run.1));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        for card in Card::ALL {
            assert_eq!(Card::from_token(card.token()), Some(card));
        }
    }

    #[test]
    fn test_rank_round_trip() {
        for card in Card::ALL {
            assert_eq!(Card::from_rank(card.rank()), Some(card));
        }
    }

    #[test]
    fn test_from_token_case_insensitive() {
        assert_eq!(Card::from_token("j"), Some(Card::Jack));
        assert_eq!(Card::from_token("q"), Some(Card::Queen));
        assert_eq!(Card::from_token("k"), Some(Card::King));
        assert_eq!(Card::from_token("a"), Some(Card::Ace));
        assert_eq!(Card::from_token(" 10 "), Some(Card::Ten));
    }

    #[test]
    fn test_from_token_rejects_unknown() {
        assert_eq!(Card::from_token("T"), None);
        assert_eq!(Card::from_token("1"), None);
        assert_eq!(Card::from_token("15"), None);
        assert_eq!(Card::from_token(""), None);
        assert_eq!(Card::from_token("王"), None);
    }

    #[test]
    fn test_serde_rank_encoding() {
        let card: Card = serde_json::from_str("17").unwrap();
        assert_eq!(card, Card::Two);
        assert_eq!(serde_json::to_string(&card).unwrap(), "17");

        assert!(serde_json::from_str::<Card>("15").is_err());
        assert!(serde_json::from_str::<Card>("0").is_err());
    }

    #[test]
    fn test_full_deck_composition() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(deck.iter().filter(|c| **c == Card::Three).count(), 4);
        assert_eq!(deck.iter().filter(|c| **c == Card::Two).count(), 4);
        assert_eq!(deck.iter().filter(|c| **c == Card::BlackJoker).count(), 1);
        assert_eq!(deck.iter().filter(|c| **c == Card::RedJoker).count(), 1);
    }

    #[test]
    fn test_pass_token_spellings() {
        assert!(is_pass_token("过牌"));
        assert!(is_pass_token("PASS"));
        assert!(is_pass_token("pass"));
        assert!(is_pass_token(" Pass "));
        assert!(!is_pass_token("过"));
        assert!(!is_pass_token("3"));
    }

    #[test]
    fn test_split_designation_separators() {
        assert_eq!(split_designation("3 3 3"), vec!["3", "3", "3"]);
        assert_eq!(split_designation("3,3,3"), vec!["3", "3", "3"]);
        assert_eq!(split_designation("3，4、5"), vec!["3", "4", "5"]);
        assert_eq!(split_designation("  J  Q  "), vec!["J", "Q"]);
        assert_eq!(split_designation(""), Vec::<&str>::new());
        assert_eq!(split_designation(" ,， "), Vec::<&str>::new());
    }

    #[test]
    fn test_scan_tokens_tracks_unmatched() {
        let scan = scan_tokens("3 3 bogus 大王");
        assert_eq!(scan.cards, vec![Card::Three, Card::Three, Card::RedJoker]);
        assert_eq!(scan.unmatched, vec!["bogus"]);

        let scan = scan_tokens("什么 牌");
        assert!(scan.is_empty());
        assert_eq!(scan.unmatched.len(), 2);
    }

    #[test]
    fn test_format_card_list() {
        assert_eq!(format_card_list(&[]), "过牌");
        assert_eq!(
            format_card_list(&[Card::Three, Card::Ten, Card::BlackJoker]),
            "3 10 小王"
        );
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(&[]), "无");
        assert_eq!(
            format_grouped(&[Card::Jack, Card::Three, Card::Three]),
            "3×2 J×1"
        );
    }
}
