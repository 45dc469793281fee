use serde::{Deserialize, Serialize};

use crate::error::AmortError;
use crate::types::{Ledger, Money};
use crate::AmortResult;

/// Summary deltas between a baseline and a simulated schedule, all computed
/// as baseline minus simulated: positive values mean the simulation saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// Interest saved across the whole schedule.
    pub interest_delta: Money,
    /// Change in total row count (installments plus extra payments).
    pub term_delta: i64,
    /// Change in the cumulative amount paid.
    pub total_paid_delta: Money,
}

/// Diff two schedules. Read-only over both; fails on an empty ledger.
pub fn compare(baseline: &Ledger, simulated: &Ledger) -> AmortResult<ImpactSummary> {
    if baseline.is_empty() || simulated.is_empty() {
        return Err(AmortError::Validation {
            field: "ledger".into(),
            reason: "Comparison requires two non-empty ledgers".into(),
        });
    }

    Ok(ImpactSummary {
        interest_delta: baseline.total_interest() - simulated.total_interest(),
        term_delta: baseline.len() as i64 - simulated.len() as i64,
        total_paid_delta: baseline.total_paid() - simulated.total_paid(),
    })
}
