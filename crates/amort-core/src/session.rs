use crate::contract::ContractTerms;
use crate::impact::{self, ImpactSummary};
use crate::simulation::engine::{recalculate, AmortizationEvent, SimulationOutcome};
use crate::types::Ledger;
use crate::AmortResult;

/// Caller-held simulation state: the immutable baseline schedule plus the
/// current simulated schedule derived from it.
///
/// Events compose: each one recomputes from the current ledger, not the
/// baseline. A failed application leaves the current ledger untouched, so
/// there is never a partially applied step to roll back.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    baseline: Ledger,
    current: Ledger,
    applied: Vec<AmortizationEvent>,
    terms: ContractTerms,
}

impl SimulationSession {
    pub fn new(baseline: Ledger, terms: ContractTerms) -> Self {
        Self {
            current: baseline.clone(),
            baseline,
            applied: Vec::new(),
            terms,
        }
    }

    pub fn baseline(&self) -> &Ledger {
        &self.baseline
    }

    pub fn current(&self) -> &Ledger {
        &self.current
    }

    pub fn applied(&self) -> &[AmortizationEvent] {
        &self.applied
    }

    pub fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// Apply one event on top of the current schedule, replacing the whole
    /// current ledger atomically on success.
    pub fn apply(&mut self, event: &AmortizationEvent) -> AmortResult<SimulationOutcome> {
        let outcome = recalculate(&self.current, event, &self.terms)?;
        self.current = outcome.ledger.clone();
        self.applied.push(event.clone());
        Ok(outcome)
    }

    /// Discard all simulated events and return to the baseline schedule.
    pub fn reset(&mut self) {
        self.current = self.baseline.clone();
        self.applied.clear();
    }

    /// Compare the baseline against the current simulated schedule.
    pub fn impact(&self) -> AmortResult<ImpactSummary> {
        impact::compare(&self.baseline, &self.current)
    }

    pub fn into_current(self) -> Ledger {
        self.current
    }
}
