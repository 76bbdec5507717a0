//! Action resolver - Maps an oracle answer onto the legal-move list
//!
//! Resolution never fails: every branch lands on a valid index into the
//! legal-move list, with index 0 as the universal fallback. The kind
//! records which branch fired so failures stay distinguishable.

use crate::domain::value_objects::{is_pass_token, scan_tokens, split_designation, Play};
use crate::infrastructure::services::OracleDecision;

/// Which branch of the resolution chain produced the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Designation matched a legal move by multiset equality
    Matched,
    /// Designation was the pass token
    Pass,
    /// No decision arrived at all
    NoDecision,
    /// Designation carried no mappable tokens
    Empty,
    /// Designation parsed to a play absent from the legal list
    Illegal,
}

/// Outcome of resolving one oracle answer
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Valid index into the legal-move list, always
    pub index: usize,
    pub kind: ResolutionKind,
    /// The play the oracle asked for, when one could be parsed
    pub proposed: Option<Play>,
    /// Tokens dropped because the codec did not recognize them
    pub dropped_tokens: usize,
}

/// Resolve an optional oracle decision against the legal moves.
///
/// `legal_moves` must be non-empty; the agent enforces that before
/// calling in.
pub fn resolve_decision(decision: Option<&OracleDecision>, legal_moves: &[Play]) -> Resolution {
    let decision = match decision {
        Some(d) => d,
        None => {
            return Resolution {
                index: 0,
                kind: ResolutionKind::NoDecision,
                proposed: None,
                dropped_tokens: 0,
            }
        }
    };

    let text = decision.cards.as_text();
    let tokens = split_designation(&text);

    if tokens.len() == 1 && is_pass_token(tokens[0]) {
        let index = legal_moves.iter().position(|m| m.is_pass()).unwrap_or(0);
        return Resolution {
            index,
            kind: ResolutionKind::Pass,
            proposed: Some(Play::pass()),
            dropped_tokens: 0,
        };
    }

    let scan = scan_tokens(&text);
    if scan.cards.is_empty() {
        return Resolution {
            index: 0,
            kind: ResolutionKind::Empty,
            proposed: None,
            dropped_tokens: scan.unmatched.len(),
        };
    }

    let proposed = Play::new(scan.cards);
    match legal_moves.iter().position(|m| *m == proposed) {
        Some(index) => Resolution {
            index,
            kind: ResolutionKind::Matched,
            proposed: Some(proposed),
            dropped_tokens: scan.unmatched.len(),
        },
        None => Resolution {
            index: 0,
            kind: ResolutionKind::Illegal,
            proposed: Some(proposed),
            dropped_tokens: scan.unmatched.len(),
        },
    }
}
