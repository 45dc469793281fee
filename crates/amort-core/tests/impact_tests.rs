use std::collections::BTreeMap;

use amort_core::contract::{ContractDocument, ContractMetadata, ContractTerms, RawEvent};
use amort_core::impact::{compare, ImpactSummary};
use amort_core::ledger::{build_ledger, OperationClassifier};
use amort_core::simulation::{recalculate, AmortizationEvent, ReductionMode};
use amort_core::{AmortError, EntryStatus, Ledger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn installment(
    seq: u32,
    date: &str,
    principal: Decimal,
    interest: Decimal,
    balance: Decimal,
) -> RawEvent {
    RawEvent::Installment {
        sequence_number: seq,
        due_date: date.into(),
        principal,
        interest,
        ancillary_charges: BTreeMap::new(),
        installment_total: principal + interest,
        outstanding_balance: balance,
        status: EntryStatus::Scheduled,
    }
}

fn baseline() -> Ledger {
    let doc = ContractDocument {
        metadata: ContractMetadata::default(),
        events: vec![
            installment(1, "10/01/2024", dec!(300), dec!(10), dec!(700)),
            installment(2, "10/02/2024", dec!(300), dec!(10), dec!(400)),
            installment(3, "10/03/2024", dec!(400), dec!(10), dec!(0)),
        ],
    };
    build_ledger(&doc, &OperationClassifier::default()).unwrap()
}

#[test]
fn test_ledger_compared_against_itself_is_all_zero() {
    let ledger = baseline();
    let summary = compare(&ledger, &ledger).unwrap();
    assert_eq!(
        summary,
        ImpactSummary {
            interest_delta: dec!(0),
            term_delta: 0,
            total_paid_delta: dec!(0),
        }
    );
}

#[test]
fn test_empty_ledger_rejected() {
    let ledger = baseline();
    let empty = Ledger::new(Vec::new());

    let err = compare(&ledger, &empty).unwrap_err();
    assert!(matches!(err, AmortError::Validation { .. }));
    let err = compare(&empty, &ledger).unwrap_err();
    assert!(matches!(err, AmortError::Validation { .. }));
}

#[test]
fn test_reduce_term_simulation_saves_interest() {
    let base = baseline();
    let terms = ContractTerms::new(dec!(0.126825030131969720)).unwrap();
    let outcome = recalculate(
        &base,
        &AmortizationEvent {
            target_sequence_number: 1,
            extra_amount: dec!(300),
            reduction_mode: ReductionMode::ReduceTerm,
        },
        &terms,
    )
    .unwrap();

    let summary = compare(&base, &outcome.ledger).unwrap();
    // Two future installments collapse into one; the saved row's interest
    // and principal overshoot come back as a lower total paid.
    assert!(summary.interest_delta > dec!(0));
    assert!(summary.total_paid_delta > dec!(0));
    assert!(summary.term_delta >= 0);
}
