//! LLM seat agent module
//!
//! Everything between the engine's infoset and the chosen move: prompt
//! rendering, the oracle round trip, answer resolution and reporting.

mod audit;
mod llm_agent;
mod memory;
mod observer;
mod prompt;
mod resolver;

pub use audit::*;
pub use llm_agent::*;
pub use memory::*;
pub use observer::*;
pub use prompt::*;
pub use resolver::*;
