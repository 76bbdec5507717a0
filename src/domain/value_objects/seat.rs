//! Seat - The three Dou Dizhu seats and their fixed rotation
//!
//! Turn order is landlord, landlord-down, landlord-up; entry `i` of an
//! action sequence was played by `ROTATION[i % 3]`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    Landlord,
    LandlordDown,
    LandlordUp,
}

impl Seat {
    /// Process-wide turn order
    pub const ROTATION: [Seat; 3] = [Seat::Landlord, Seat::LandlordDown, Seat::LandlordUp];

    /// Seat that acts at the given position of an action sequence
    #[inline]
    pub fn for_turn(turn: usize) -> Seat {
        Self::ROTATION[turn % 3]
    }

    /// Engine-facing seat name
    pub fn as_str(&self) -> &'static str {
        match self {
            Seat::Landlord => "landlord",
            Seat::LandlordDown => "landlord_down",
            Seat::LandlordUp => "landlord_up",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "landlord" => Some(Seat::Landlord),
            "landlord_down" => Some(Seat::LandlordDown),
            "landlord_up" => Some(Seat::LandlordUp),
            _ => None,
        }
    }

    /// Seat name as rendered in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Seat::Landlord => "地主",
            Seat::LandlordDown => "地主下家",
            Seat::LandlordUp => "地主上家",
        }
    }
}
