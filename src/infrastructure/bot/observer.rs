//! Turn observers - Structured per-turn decision events
//!
//! One event per turn, emitted after the agent lands on its move. The
//! observer seam keeps diagnostics out of the resolution control flow:
//! nothing an observer does can change what gets played.

use crate::domain::value_objects::{Play, Seat};
use crate::infrastructure::services::OracleFailure;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// How one turn was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Single legal move; the oracle was never consulted
    Forced,
    /// Oracle's designation matched a legal move
    Matched,
    /// Oracle designated a pass
    Pass,
    /// No usable decision; first legal move taken
    NoDecision(OracleFailure),
    /// Oracle proposed a play absent from the legal list
    Illegal,
}

impl TurnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOutcome::Forced => "forced",
            TurnOutcome::Matched => "matched",
            TurnOutcome::Pass => "pass",
            TurnOutcome::NoDecision(_) => "no_decision",
            TurnOutcome::Illegal => "illegal",
        }
    }
}

/// Everything worth knowing about one decided turn
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub seat: Seat,
    /// Completed turns in the game when this move was chosen
    pub turn: usize,
    pub legal_count: usize,
    pub chosen_index: usize,
    pub chosen: Play,
    /// The play the oracle asked for, when one could be parsed
    pub proposed: Option<Play>,
    pub outcome: TurnOutcome,
}

/// Observer seam for turn events
pub trait DecisionObserver: Send + Sync {
    fn on_turn(&self, report: &TurnReport);
}

/// Default observer: one structured log line per turn
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn on_turn(&self, report: &TurnReport) {
        let seat = report.seat.as_str();
        match report.outcome {
            TurnOutcome::Forced => info!(
                "[{}] turn {}: forced move {} (only legal option)",
                seat, report.turn, report.chosen
            ),
            TurnOutcome::Matched => info!(
                "[{}] turn {}: oracle chose {} (index {} of {})",
                seat, report.turn, report.chosen, report.chosen_index, report.legal_count
            ),
            TurnOutcome::Pass => info!("[{}] turn {}: oracle passed", seat, report.turn),
            TurnOutcome::NoDecision(failure) => warn!(
                "[{}] turn {}: no decision ({}), defaulting to {}",
                seat,
                report.turn,
                failure.as_str(),
                report.chosen
            ),
            TurnOutcome::Illegal => warn!(
                "[{}] turn {}: oracle proposed illegal play {}, defaulting to {}",
                seat,
                report.turn,
                report
                    .proposed
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                report.chosen
            ),
        }
    }
}

/// Per-class outcome totals for reliability accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTotals {
    pub forced: usize,
    pub matched: usize,
    pub passes: usize,
    pub transport_failures: usize,
    pub schema_failures: usize,
    pub empty_designations: usize,
    pub illegal_proposals: usize,
}

impl OutcomeTotals {
    /// Turns decided without a usable oracle answer
    pub fn defaulted(&self) -> usize {
        self.transport_failures + self.schema_failures + self.empty_designations
    }
}

/// Observer that tallies outcomes per class
#[derive(Debug, Default)]
pub struct CountingObserver {
    forced: AtomicUsize,
    matched: AtomicUsize,
    passes: AtomicUsize,
    transport_failures: AtomicUsize,
    schema_failures: AtomicUsize,
    empty_designations: AtomicUsize,
    illegal_proposals: AtomicUsize,
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OutcomeTotals {
        OutcomeTotals {
            forced: self.forced.load(Ordering::SeqCst),
            matched: self.matched.load(Ordering::SeqCst),
            passes: self.passes.load(Ordering::SeqCst),
            transport_failures: self.transport_failures.load(Ordering::SeqCst),
            schema_failures: self.schema_failures.load(Ordering::SeqCst),
            empty_designations: self.empty_designations.load(Ordering::SeqCst),
            illegal_proposals: self.illegal_proposals.load(Ordering::SeqCst),
        }
    }
}

impl DecisionObserver for CountingObserver {
    fn on_turn(&self, report: &TurnReport) {
        let counter = match report.outcome {
            TurnOutcome::Forced => &self.forced,
            TurnOutcome::Matched => &self.matched,
            TurnOutcome::Pass => &self.passes,
            TurnOutcome::NoDecision(OracleFailure::Transport) => &self.transport_failures,
            TurnOutcome::NoDecision(OracleFailure::Schema) => &self.schema_failures,
            TurnOutcome::NoDecision(OracleFailure::Empty) => &self.empty_designations,
            TurnOutcome::Illegal => &self.illegal_proposals,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Card;

    fn report(outcome: TurnOutcome) -> TurnReport {
        TurnReport {
            seat: Seat::Landlord,
            turn: 0,
            legal_count: 2,
            chosen_index: 0,
            chosen: Play::new([Card::Three]),
            proposed: None,
            outcome,
        }
    }

    #[test]
    fn test_counting_observer_tallies_by_class() {
        let observer = CountingObserver::new();
        observer.on_turn(&report(TurnOutcome::Forced));
        observer.on_turn(&report(TurnOutcome::Matched));
        observer.on_turn(&report(TurnOutcome::Matched));
        observer.on_turn(&report(TurnOutcome::NoDecision(OracleFailure::Transport)));
        observer.on_turn(&report(TurnOutcome::NoDecision(OracleFailure::Schema)));
        observer.on_turn(&report(TurnOutcome::NoDecision(OracleFailure::Empty)));
        observer.on_turn(&report(TurnOutcome::Illegal));

        let totals = observer.snapshot();
        assert_eq!(totals.forced, 1);
        assert_eq!(totals.matched, 2);
        assert_eq!(totals.passes, 0);
        assert_eq!(totals.transport_failures, 1);
        assert_eq!(totals.schema_failures, 1);
        assert_eq!(totals.empty_designations, 1);
        assert_eq!(totals.illegal_proposals, 1);
        assert_eq!(totals.defaulted(), 3);
    }

    #[test]
    fn test_snapshot_starts_at_zero() {
        let observer = CountingObserver::new();
        assert_eq!(observer.snapshot(), OutcomeTotals::default());
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(TurnOutcome::Forced.as_str(), "forced");
        assert_eq!(
            TurnOutcome::NoDecision(OracleFailure::Transport).as_str(),
            "no_decision"
        );
        assert_eq!(TurnOutcome::Illegal.as_str(), "illegal");
    }
}
