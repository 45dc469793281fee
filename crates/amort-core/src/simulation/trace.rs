use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::simulation::engine::ReductionMode;
use crate::types::{Money, Rate};

/// One structured diagnostic record emitted during schedule recomputation.
///
/// The trace is an explicit part of the engine's return value rather than an
/// ambient log, so the engine stays referentially transparent. It is consumed
/// by presentation layers only; correctness never depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TraceRecord {
    /// State of the targeted installment before the event is applied.
    TargetSnapshot {
        sequence_number: u32,
        due_date: NaiveDate,
        outstanding_balance: Money,
        installment_total: Money,
        principal_component: Money,
        interest_component: Money,
    },
    /// Rate configuration and event parameters driving the recomputation.
    RateParameters {
        annual_rate: Rate,
        monthly_rate: Rate,
        extra_amount: Money,
        reduction_mode: ReductionMode,
    },
    ExtraPaymentInserted {
        due_date: NaiveDate,
        amount: Money,
        balance_after: Money,
    },
    /// Reduce-term outcome: new term and the constant monthly principal.
    TermRecalculated {
        balance_after: Money,
        level_payment: Money,
        previous_remaining: usize,
        new_term: u32,
        monthly_principal: Money,
    },
    /// Reduce-installment outcome: new level payment over the unchanged term.
    InstallmentRecalculated {
        balance_after: Money,
        remaining_term: usize,
        level_payment: Money,
    },
    RowRecomputed {
        #[serde(skip_serializing_if = "Option::is_none")]
        sequence_number: Option<u32>,
        previous_balance: Money,
        principal_component: Money,
        interest_component: Money,
        installment_total: Money,
        outstanding_balance: Money,
    },
    /// The final recomputed row absorbed a truncation remainder so the
    /// schedule lands on exactly zero.
    FinalRowAdjusted {
        nominal_principal: Money,
        absorbed_principal: Money,
    },
    LedgerTruncated { dropped_rows: usize },
    Summary {
        original_rows: usize,
        simulated_rows: usize,
        original_installments: usize,
        simulated_installments: usize,
        original_total_paid: Money,
        simulated_total_paid: Money,
        original_total_interest: Money,
        simulated_total_interest: Money,
    },
}
