//! Skip/run decision for a handoff trigger, and the state updates around it

use crate::types::{Trigger, TriggerKind};
use handoff_state::{SessionStateRecord, StateStore};

/// Growth below which a session-end handoff is a near-duplicate of the
/// compaction handoff that preceded it
pub const DEFAULT_GROWTH_THRESHOLD: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Generate a handoff
    Proceed,
    /// The transcript barely changed since the last preemptive handoff
    Skip { growth: f64 },
}

impl Decision {
    pub fn is_skip(&self) -> bool {
        matches!(self, Decision::Skip { .. })
    }
}

/// Relative transcript growth; `None` without a usable baseline
pub fn growth_ratio(prior_size: u64, current_size: u64) -> Option<f64> {
    if prior_size == 0 {
        return None;
    }
    Some((current_size as f64 - prior_size as f64) / prior_size as f64)
}

/// Pure skip/run rule.
///
/// Preemptive triggers always proceed. Other triggers skip only when a
/// prior record with a non-zero size exists and growth since then is
/// below `threshold`.
pub fn decide(
    trigger: &Trigger,
    current_size: u64,
    prior: Option<&SessionStateRecord>,
    threshold: f64,
) -> Decision {
    if trigger.kind() == TriggerKind::Preemptive {
        return Decision::Proceed;
    }

    match prior.and_then(|p| growth_ratio(p.transcript_size, current_size)) {
        Some(growth) if growth < threshold => Decision::Skip { growth },
        _ => Decision::Proceed,
    }
}

/// Applies [`decide`] against a [`StateStore`] and keeps the store in step
/// with each run's outcome.
///
/// Store failures are logged and otherwise ignored: a lost write only
/// affects the next decision.
pub struct HandoffEngine<'a, S: StateStore + ?Sized> {
    store: &'a S,
    threshold: f64,
}

impl<'a, S: StateStore + ?Sized> HandoffEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_threshold(store, DEFAULT_GROWTH_THRESHOLD)
    }

    pub fn with_threshold(store: &'a S, threshold: f64) -> Self {
        Self { store, threshold }
    }

    /// Decide for this trigger. A skip ends the session's bookkeeping, so
    /// the prior record is deleted.
    pub fn evaluate(&self, session_id: &str, trigger: &Trigger, current_size: u64) -> Decision {
        let prior = self.store.load(session_id);
        let decision = decide(trigger, current_size, prior.as_ref(), self.threshold);

        tracing::debug!(
            session_id,
            trigger = %trigger,
            current_size,
            prior_size = prior.as_ref().map(|p| p.transcript_size),
            ?decision,
            "handoff decision"
        );

        if decision.is_skip() {
            self.forget(session_id);
        }
        decision
    }

    /// Record a completed run: preemptive triggers leave a baseline for the
    /// session-end check, final triggers clear it.
    pub fn complete(&self, session_id: &str, trigger: &Trigger, current_size: u64) {
        match trigger.kind() {
            TriggerKind::Preemptive => {
                if let Err(e) = self.store.save(session_id, current_size) {
                    tracing::warn!(session_id, error = %e, "failed to save handoff state");
                }
            }
            TriggerKind::Final => self.forget(session_id),
        }
    }

    fn forget(&self, session_id: &str) {
        if let Err(e) = self.store.delete(session_id) {
            tracing::warn!(session_id, error = %e, "failed to clear handoff state");
        }
    }
}
