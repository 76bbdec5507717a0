//! LLM seat agent - Turn protocol for one Dou Dizhu seat
//!
//! Per turn: resync game state from the engine's infoset, short-circuit
//! forced moves, otherwise run one oracle round trip and resolve the
//! answer onto the legal-move list. Every branch terminates with a move
//! taken from that list; only engine-contract violations are errors.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::audit::{AuditLog, AuditRecord};
use super::memory::ConversationMemory;
use super::observer::{DecisionObserver, TracingObserver, TurnOutcome, TurnReport};
use super::prompt::{self, SYSTEM_PROMPT};
use super::resolver::{self, ResolutionKind};
use crate::domain::services::inventory::{self, InventoryError};
use crate::domain::value_objects::{GameState, Infoset, Play, Seat};
use crate::infrastructure::services::{parse_decision, DecisionOracle, OracleFailure};

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Engine supplied no legal moves")]
    NoLegalMoves,
    #[error("Inventory violation: {0}")]
    Inventory(#[from] InventoryError),
}

/// One seat's agent. Owns its game state exclusively; never shared
/// across seats or concurrent games.
pub struct LlmAgent {
    seat: Seat,
    oracle: Arc<dyn DecisionOracle>,
    observer: Arc<dyn DecisionObserver>,
    memory: ConversationMemory,
    state: GameState,
    audit: Option<AuditLog>,
}

impl LlmAgent {
    pub fn new(seat: Seat, oracle: Arc<dyn DecisionOracle>) -> Self {
        Self {
            seat,
            oracle,
            observer: Arc::new(TracingObserver),
            memory: ConversationMemory::new(),
            state: GameState::new(),
            audit: None,
        }
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Enable per-game audit logging
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    #[inline]
    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Start a new game: clear the game state and conversation memory,
    /// rotate the audit file.
    pub fn reset(&mut self) {
        self.state.reset();
        self.memory.clear();
        if let Some(audit) = &mut self.audit {
            audit.next_game();
        }
        info!("[{}] agent reset for a new game", self.seat.as_str());
    }

    /// Decide this turn's move.
    ///
    /// The returned play is always an entry of `infoset.legal_moves`.
    /// Errors are engine-contract violations only (empty legal-move
    /// list, corrupt card accounting); every oracle failure resolves to
    /// a legal move instead.
    pub async fn act(&mut self, infoset: &Infoset) -> Result<Play, AgentError> {
        if infoset.legal_moves.is_empty() {
            return Err(AgentError::NoLegalMoves);
        }

        // State sync runs before any decision path, every turn.
        self.state.observe(infoset);
        let unknown = inventory::unknown_cards(&self.state.hand, &self.state.played)?;
        let turn = self.state.processed_len();

        // A single legal move is mandatory; the oracle is not consulted.
        if infoset.legal_moves.len() == 1 {
            let chosen = infoset.legal_moves[0].clone();
            self.observer.on_turn(&TurnReport {
                seat: self.seat,
                turn,
                legal_count: 1,
                chosen_index: 0,
                chosen: chosen.clone(),
                proposed: None,
                outcome: TurnOutcome::Forced,
            });
            if let Some(audit) = &mut self.audit {
                audit
                    .append(&AuditRecord {
                        turn,
                        seat: self.seat.as_str(),
                        prompt: None,
                        raw_reply: None,
                        chosen_index: 0,
                        chosen: chosen.to_string(),
                        at_ms: chrono::Utc::now().timestamp_millis(),
                    })
                    .await;
            }
            return Ok(chosen);
        }

        let prompt_text = prompt::render_turn_prompt(self.seat, &self.state, infoset, &unknown);

        let reply = self
            .oracle
            .invoke(SYSTEM_PROMPT, self.memory.messages(), &prompt_text)
            .await;

        let mut failure = None;
        let mut raw_reply = None;
        let decision = match reply {
            Ok(reply) => {
                // The exchange is remembered even if parsing fails below;
                // the oracle said it, so the oracle gets to see it again.
                self.memory.record_exchange(&prompt_text, &reply);
                let parsed = match parse_decision(&reply) {
                    Ok(decision) => Some(decision),
                    Err(e) => {
                        warn!(
                            "[{}] unparseable oracle reply: {} - {}",
                            self.seat.as_str(),
                            e,
                            truncate_chars(&reply, 200)
                        );
                        failure = Some(OracleFailure::Schema);
                        None
                    }
                };
                raw_reply = Some(reply);
                parsed
            }
            Err(e) => {
                error!("[{}] oracle call failed: {}", self.seat.as_str(), e);
                failure = Some(e.failure());
                None
            }
        };

        if let Some(reason) = decision.as_ref().and_then(|d| d.reason.as_deref()) {
            info!("Oracle rationale: {}", truncate_chars(reason, 100));
        }

        let resolution = resolver::resolve_decision(decision.as_ref(), &infoset.legal_moves);
        if resolution.dropped_tokens > 0 {
            debug!(
                "[{}] {} designation tokens were not recognized",
                self.seat.as_str(),
                resolution.dropped_tokens
            );
        }

        let outcome = match resolution.kind {
            ResolutionKind::Matched => TurnOutcome::Matched,
            ResolutionKind::Pass => TurnOutcome::Pass,
            ResolutionKind::Empty => TurnOutcome::NoDecision(OracleFailure::Empty),
            ResolutionKind::NoDecision => {
                TurnOutcome::NoDecision(failure.unwrap_or(OracleFailure::Schema))
            }
            ResolutionKind::Illegal => TurnOutcome::Illegal,
        };

        let chosen = infoset.legal_moves[resolution.index].clone();
        self.observer.on_turn(&TurnReport {
            seat: self.seat,
            turn,
            legal_count: infoset.legal_moves.len(),
            chosen_index: resolution.index,
            chosen: chosen.clone(),
            proposed: resolution.proposed.clone(),
            outcome,
        });

        if let Some(audit) = &mut self.audit {
            audit
                .append(&AuditRecord {
                    turn,
                    seat: self.seat.as_str(),
                    prompt: Some(&prompt_text),
                    raw_reply: raw_reply.as_deref(),
                    chosen_index: resolution.index,
                    chosen: chosen.to_string(),
                    at_ms: chrono::Utc::now().timestamp_millis(),
                })
                .await;
        }

        Ok(chosen)
    }
}

/// Char-safe truncation for log display
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}
