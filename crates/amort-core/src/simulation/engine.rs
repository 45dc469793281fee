//! Schedule recomputation after an extraordinary principal payment.
//!
//! Given a ledger, a target installment, an extra-payment amount, and a
//! reduction mode, [`recalculate`] inserts the extra payment and recomputes
//! every subsequent row under one of two policies:
//!
//! - **ReduceTerm** holds the payment level roughly constant and shortens
//!   the remaining term via the closed form `n' = S / (P - S*i)`, truncated
//!   to an integer, with constant monthly principal `A' = S / n'`.
//! - **ReduceInstallment** holds the remaining term constant and lowers the
//!   level payment to `PMT = S*i / (1 - (1+i)^-n)`.
//!
//! The function is pure: it never mutates its input and either returns a
//! fully consistent new ledger or an error. All math in
//! `rust_decimal::Decimal`.

use std::collections::BTreeMap;
use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::contract::ContractTerms;
use crate::error::AmortError;
use crate::impact::ImpactSummary;
use crate::ledger::apply_running_totals;
use crate::session::SimulationSession;
use crate::simulation::trace::TraceRecord;
use crate::types::{
    with_metadata, ComputationOutput, EntryKind, EntryStatus, Ledger, LedgerEntry, Money,
};
use crate::AmortResult;

/// Remainder size above which the final-row adjustment is surfaced as a
/// warning (one cent of the configured monetary precision).
const REMAINDER_WARN_THRESHOLD: Decimal = dec!(0.01);

/// Borrower-selectable outcome of an extra payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReductionMode {
    /// Keep the payment level roughly constant, shorten the remaining term.
    ReduceTerm,
    /// Keep the term constant, lower the future payment level.
    ReduceInstallment,
}

/// The borrower's input to one simulation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationEvent {
    /// Must reference an existing installment row.
    pub target_sequence_number: u32,
    /// Strictly positive, at most the outstanding balance at the target row.
    pub extra_amount: Money,
    pub reduction_mode: ReductionMode,
}

/// Result of one simulation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub ledger: Ledger,
    pub trace: Vec<TraceRecord>,
    pub warnings: Vec<String>,
}

/// How principal is assigned to each recomputed row.
#[derive(Clone, Copy)]
enum PrincipalPolicy {
    /// Constant monthly principal (reduce-term).
    Constant(Money),
    /// Level payment; principal is the payment net of interest
    /// (reduce-installment).
    LevelPayment(Money),
}

/// Recompute the schedule after applying `event` to `ledger`.
///
/// Rows up to and including the target installment are carried over
/// untouched; an extra-payment row is inserted directly after the target,
/// and every later row is recomputed in order against the running balance.
/// The final recomputed installment absorbs any truncation remainder so the
/// schedule lands on exactly zero.
pub fn recalculate(
    ledger: &Ledger,
    event: &AmortizationEvent,
    terms: &ContractTerms,
) -> AmortResult<SimulationOutcome> {
    let (target_idx, target) = ledger
        .find_by_sequence(event.target_sequence_number)
        .ok_or(AmortError::NotFound {
            sequence_number: event.target_sequence_number,
        })?;

    let balance_before = target.outstanding_balance;
    if event.extra_amount <= Decimal::ZERO {
        return Err(AmortError::Validation {
            field: "extra_amount".into(),
            reason: "Extra-payment amount must be strictly positive".into(),
        });
    }
    if event.extra_amount > balance_before {
        return Err(AmortError::Validation {
            field: "extra_amount".into(),
            reason: format!(
                "Extra-payment amount {} exceeds the outstanding balance {} at installment {}",
                event.extra_amount, balance_before, event.target_sequence_number
            ),
        });
    }

    let monthly_rate = terms.monthly_rate();
    let balance_after = balance_before - event.extra_amount;
    let mut warnings: Vec<String> = Vec::new();

    let mut trace = vec![
        TraceRecord::TargetSnapshot {
            sequence_number: event.target_sequence_number,
            due_date: target.due_date,
            outstanding_balance: balance_before,
            installment_total: target.installment_total,
            principal_component: target.principal_component,
            interest_component: target.interest_component,
        },
        TraceRecord::RateParameters {
            annual_rate: terms.annual_rate(),
            monthly_rate,
            extra_amount: event.extra_amount,
            reduction_mode: event.reduction_mode,
        },
    ];

    // Rows up to and including the target survive unchanged.
    let mut entries: Vec<LedgerEntry> = ledger.entries()[..=target_idx].to_vec();

    entries.push(LedgerEntry {
        sequence_number: None,
        due_date: target.due_date,
        principal_component: event.extra_amount,
        interest_component: Decimal::ZERO,
        ancillary_charges: BTreeMap::new(),
        installment_total: event.extra_amount,
        outstanding_balance: balance_after,
        status: EntryStatus::Amortized,
        kind: EntryKind::ExtraPayment,
        running_total_paid: Decimal::ZERO,
        running_total_principal: Decimal::ZERO,
        running_total_interest: Decimal::ZERO,
    });
    trace.push(TraceRecord::ExtraPaymentInserted {
        due_date: target.due_date,
        amount: event.extra_amount,
        balance_after,
    });

    let tail = &ledger.entries()[target_idx + 1..];
    let remaining_installments = tail.iter().filter(|e| e.is_installment()).count();

    let (keep_installments, policy) = match event.reduction_mode {
        ReductionMode::ReduceTerm => {
            let level_payment = target.installment_total;
            let denominator = level_payment - balance_after * monthly_rate;
            if denominator <= Decimal::ZERO {
                return Err(AmortError::ArithmeticDomain {
                    context: format!(
                        "level payment {} does not cover interest of {} on the remaining balance",
                        level_payment,
                        balance_after * monthly_rate
                    ),
                });
            }
            let new_term = (balance_after / denominator)
                .trunc()
                .to_u32()
                .filter(|n| *n > 0)
                .ok_or_else(|| AmortError::ArithmeticDomain {
                    context: format!(
                        "recomputed term for balance {} at payment {} is not a positive integer",
                        balance_after, level_payment
                    ),
                })?;
            let monthly_principal = balance_after / Decimal::from(new_term);

            trace.push(TraceRecord::TermRecalculated {
                balance_after,
                level_payment,
                previous_remaining: remaining_installments,
                new_term,
                monthly_principal,
            });

            (
                (new_term as usize).min(remaining_installments),
                PrincipalPolicy::Constant(monthly_principal),
            )
        }
        ReductionMode::ReduceInstallment => {
            if remaining_installments == 0 {
                return Err(AmortError::ArithmeticDomain {
                    context: "no installments remain after the target to spread the balance over"
                        .into(),
                });
            }
            let level_payment = if monthly_rate.is_zero() {
                balance_after / Decimal::from(remaining_installments as u64)
            } else {
                // PMT = S*i / (1 - (1+i)^-n), written with the positive power.
                let growth = (Decimal::ONE + monthly_rate).powu(remaining_installments as u64);
                let denominator = growth - Decimal::ONE;
                if denominator <= Decimal::ZERO {
                    return Err(AmortError::ArithmeticDomain {
                        context: format!(
                            "annuity factor vanished for rate {} over {} periods",
                            monthly_rate, remaining_installments
                        ),
                    });
                }
                balance_after * monthly_rate * growth / denominator
            };

            trace.push(TraceRecord::InstallmentRecalculated {
                balance_after,
                remaining_term: remaining_installments,
                level_payment,
            });

            (
                remaining_installments,
                PrincipalPolicy::LevelPayment(level_payment),
            )
        }
    };

    // Forward pass: every row after the inserted payment is recomputed
    // against the immediately preceding row's balance. Existing
    // extra-payment rows keep their amounts but re-derive their balances so
    // the recurrence holds for every row of the new ledger.
    let mut previous_balance = balance_after;
    let mut installments_done = 0usize;
    let mut dropped_rows = 0usize;
    let mut paid_off = false;

    for row in tail {
        if paid_off {
            dropped_rows += 1;
            continue;
        }

        if !row.is_installment() {
            let new_balance = previous_balance - row.installment_total;
            if new_balance < Decimal::ZERO {
                return Err(AmortError::ArithmeticDomain {
                    context: format!(
                        "scheduled extra payment of {} on {} exceeds the recomputed balance {}",
                        row.installment_total, row.due_date, previous_balance
                    ),
                });
            }
            let mut kept = row.clone();
            kept.outstanding_balance = new_balance;
            previous_balance = new_balance;
            entries.push(kept);
            continue;
        }

        installments_done += 1;
        let interest_component = previous_balance * monthly_rate;
        let nominal_principal = match policy {
            PrincipalPolicy::Constant(principal) => principal,
            PrincipalPolicy::LevelPayment(payment) => payment - interest_component,
        };

        // The closing row takes the whole remaining balance, absorbing the
        // integer-truncation remainder so the schedule ends on exactly zero.
        let is_final = installments_done == keep_installments
            || nominal_principal >= previous_balance;
        let principal_component = if is_final {
            previous_balance
        } else {
            nominal_principal
        };

        if is_final && principal_component != nominal_principal {
            trace.push(TraceRecord::FinalRowAdjusted {
                nominal_principal,
                absorbed_principal: principal_component,
            });
            if (principal_component - nominal_principal).abs() > REMAINDER_WARN_THRESHOLD {
                warnings.push(format!(
                    "Final installment principal adjusted from {} to {} to close the balance",
                    nominal_principal, principal_component
                ));
            }
        }

        let installment_total = principal_component + interest_component;
        let outstanding_balance = previous_balance - principal_component;

        let mut recomputed = row.clone();
        recomputed.principal_component = principal_component;
        recomputed.interest_component = interest_component;
        recomputed.installment_total = installment_total;
        recomputed.outstanding_balance = outstanding_balance;

        trace.push(TraceRecord::RowRecomputed {
            sequence_number: recomputed.sequence_number,
            previous_balance,
            principal_component,
            interest_component,
            installment_total,
            outstanding_balance,
        });

        previous_balance = outstanding_balance;
        entries.push(recomputed);

        if is_final {
            paid_off = true;
        }
    }

    if dropped_rows > 0 {
        trace.push(TraceRecord::LedgerTruncated { dropped_rows });
    }

    apply_running_totals(&mut entries);
    let simulated = Ledger::new(entries);

    trace.push(TraceRecord::Summary {
        original_rows: ledger.len(),
        simulated_rows: simulated.len(),
        original_installments: ledger.installment_count(),
        simulated_installments: simulated.installment_count(),
        original_total_paid: ledger.total_paid(),
        simulated_total_paid: simulated.total_paid(),
        original_total_interest: ledger.total_interest(),
        simulated_total_interest: simulated.total_interest(),
    });

    Ok(SimulationOutcome {
        ledger: simulated,
        trace,
        warnings,
    })
}

/// Run one simulation step wrapped in the standard output envelope.
pub fn simulate(
    ledger: &Ledger,
    event: &AmortizationEvent,
    terms: &ContractTerms,
) -> AmortResult<ComputationOutput<SimulationOutcome>> {
    let start = Instant::now();
    let outcome = recalculate(ledger, event, terms)?;
    let warnings = outcome.warnings.clone();
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Amortization Schedule Recalculation",
        &simulation_assumptions(terms, std::slice::from_ref(event)),
        warnings,
        elapsed,
        outcome,
    ))
}

/// Report of a full simulation run against a baseline schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub ledger: Ledger,
    pub trace: Vec<TraceRecord>,
    pub impact: ImpactSummary,
}

/// Fold a list of events through a session (each applied on top of the
/// previous result) and report the final ledger, the concatenated trace,
/// and the impact against the untouched baseline.
pub fn run_simulation(
    baseline: Ledger,
    events: &[AmortizationEvent],
    terms: &ContractTerms,
) -> AmortResult<ComputationOutput<SimulationReport>> {
    let start = Instant::now();
    let assumptions = simulation_assumptions(terms, events);

    let mut session = SimulationSession::new(baseline, terms.clone());
    let mut trace = Vec::new();
    let mut warnings = Vec::new();
    for event in events {
        let outcome = session.apply(event)?;
        trace.extend(outcome.trace);
        warnings.extend(outcome.warnings);
    }

    let impact = session.impact()?;
    let report = SimulationReport {
        ledger: session.into_current(),
        trace,
        impact,
    };
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Amortization Schedule Recalculation",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

fn simulation_assumptions(terms: &ContractTerms, events: &[AmortizationEvent]) -> serde_json::Value {
    serde_json::json!({
        "annual_rate": terms.annual_rate(),
        "monthly_rate": terms.monthly_rate(),
        "events": events,
    })
}
