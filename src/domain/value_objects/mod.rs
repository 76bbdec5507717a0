mod card;
mod game_state;
mod infoset;
mod play;
mod seat;

pub use card::*;
pub use game_state::*;
pub use infoset::*;
pub use play::*;
pub use seat::*;
