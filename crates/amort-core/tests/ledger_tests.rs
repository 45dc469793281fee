use amort_core::contract::{ContractDocument, ContractTerms, DEFAULT_ANNUAL_RATE};
use amort_core::ledger::{build_ledger, OperationClassifier};
use amort_core::{AmortError, EntryKind, EntryStatus};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// Document parsing
// ===========================================================================

fn sample_document_json() -> &'static str {
    r#"{
        "metadata": {
            "financed_principal": "815000.00",
            "annual_rate": "0.1049",
            "amortization_system": "SAC",
            "final_due_date": "10/01/2054"
        },
        "events": [
            {
                "type": "installment",
                "sequence_number": 1,
                "due_date": "10/01/2024",
                "principal": "300.00",
                "interest": "10.00",
                "ancillary_charges": {
                    "seguro_mip": "5.00",
                    "seguro_dfi": "3.00",
                    "taxa_adm": "2.00"
                },
                "installment_total": "320.00",
                "outstanding_balance": "700.00",
                "status": "Paga"
            },
            {
                "type": "operation",
                "description": "Amortizacaoreducaodeprazorecursoproprio",
                "date": "20/01/2024",
                "amount": "100.00",
                "pro_rata_interest": "1.25"
            },
            {
                "type": "operation",
                "description": "Incorporacao de encargos",
                "date": "25/01/2024",
                "amount": "42.00"
            },
            {
                "type": "installment",
                "sequence_number": 2,
                "due_date": "10/02/2024",
                "principal": "300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "400.00",
                "status": "Amortizado"
            },
            {
                "type": "installment",
                "sequence_number": 3,
                "due_date": "10/03/2024",
                "principal": "400.00",
                "interest": "10.00",
                "installment_total": "410.00",
                "outstanding_balance": "0.00",
                "status": "Em aberto"
            }
        ]
    }"#
}

fn sample_document() -> ContractDocument {
    serde_json::from_str(sample_document_json()).expect("sample document parses")
}

#[test]
fn test_document_metadata_feeds_contract_terms() {
    let doc = sample_document();
    let (terms, warnings) = ContractTerms::from_metadata(&doc.metadata).unwrap();
    assert_eq!(terms.annual_rate(), DEFAULT_ANNUAL_RATE);
    assert!(warnings.is_empty());
}

#[test]
fn test_status_accepts_statement_labels() {
    let doc = sample_document();
    let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

    assert_eq!(ledger.entries()[0].status, EntryStatus::Paid);
    assert_eq!(ledger.entries()[2].status, EntryStatus::Amortized);
    assert_eq!(ledger.entries()[3].status, EntryStatus::Scheduled);
}

// ===========================================================================
// Ledger construction
// ===========================================================================

#[test]
fn test_build_orders_and_filters_events() {
    let doc = sample_document();
    let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

    // Non-amortization operation is discarded: 3 installments + 1 extra.
    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.installment_count(), 3);

    let kinds: Vec<EntryKind> = ledger.entries().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Installment,
            EntryKind::ExtraPayment,
            EntryKind::Installment,
            EntryKind::Installment,
        ]
    );

    // Dates strictly ordered.
    for pair in ledger.entries().windows(2) {
        assert!(pair[0].due_date <= pair[1].due_date);
    }
}

#[test]
fn test_extra_payment_row_shape() {
    let doc = sample_document();
    let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

    let extra = &ledger.entries()[1];
    assert_eq!(extra.sequence_number, None);
    assert_eq!(extra.installment_total, dec!(100));
    assert_eq!(extra.principal_component, dec!(100));
    // Pro-rata interest carried from the operation record.
    assert_eq!(extra.interest_component, dec!(1.25));
    // Balance derived from the last installment: 700 - 100.
    assert_eq!(extra.outstanding_balance, dec!(600));
    assert_eq!(extra.status, EntryStatus::Amortized);
}

#[test]
fn test_ancillary_charges_preserved() {
    let doc = sample_document();
    let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

    let first = &ledger.entries()[0];
    assert_eq!(first.ancillary_charges.len(), 3);
    assert_eq!(first.ancillary_total(), dec!(10));
    assert_eq!(first.ancillary_charges["seguro_mip"], dec!(5));
}

#[test]
fn test_cumulative_fold_over_mixed_rows() {
    let doc = sample_document();
    let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();
    let entries = ledger.entries();

    assert_eq!(entries[0].running_total_paid, entries[0].installment_total);
    for i in 1..entries.len() {
        assert_eq!(
            entries[i].running_total_paid,
            entries[i - 1].running_total_paid + entries[i].installment_total
        );
        assert_eq!(
            entries[i].running_total_principal,
            entries[i - 1].running_total_principal + entries[i].principal_component
        );
        assert_eq!(
            entries[i].running_total_interest,
            entries[i - 1].running_total_interest + entries[i].interest_component
        );
    }

    // 320 + 100 + 310 + 410
    assert_eq!(ledger.total_paid(), dec!(1140));
}

// ===========================================================================
// Integrity failures
// ===========================================================================

#[test]
fn test_extra_payment_before_any_balance_fails() {
    let json = r#"{
        "events": [
            {
                "type": "operation",
                "description": "Amortizacao extraordinaria",
                "date": "01/01/2024",
                "amount": "100.00"
            },
            {
                "type": "installment",
                "sequence_number": 1,
                "due_date": "10/01/2024",
                "principal": "300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "700.00",
                "status": "Scheduled"
            }
        ]
    }"#;
    let doc: ContractDocument = serde_json::from_str(json).unwrap();
    let err = build_ledger(&doc, &OperationClassifier::default()).unwrap_err();
    assert!(matches!(err, AmortError::DataIntegrity(_)));
}

#[test]
fn test_malformed_date_fails() {
    let json = r#"{
        "events": [
            {
                "type": "installment",
                "sequence_number": 1,
                "due_date": "2024-01-10",
                "principal": "300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "700.00",
                "status": "Scheduled"
            }
        ]
    }"#;
    let doc: ContractDocument = serde_json::from_str(json).unwrap();
    let err = build_ledger(&doc, &OperationClassifier::default()).unwrap_err();
    assert!(matches!(err, AmortError::Date(_)));
}

#[test]
fn test_non_increasing_sequence_fails() {
    let json = r#"{
        "events": [
            {
                "type": "installment",
                "sequence_number": 2,
                "due_date": "10/01/2024",
                "principal": "300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "700.00",
                "status": "Scheduled"
            },
            {
                "type": "installment",
                "sequence_number": 2,
                "due_date": "10/02/2024",
                "principal": "300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "400.00",
                "status": "Scheduled"
            }
        ]
    }"#;
    let doc: ContractDocument = serde_json::from_str(json).unwrap();
    let err = build_ledger(&doc, &OperationClassifier::default()).unwrap_err();
    assert!(matches!(err, AmortError::DataIntegrity(_)));
}

#[test]
fn test_negative_amount_fails() {
    let json = r#"{
        "events": [
            {
                "type": "installment",
                "sequence_number": 1,
                "due_date": "10/01/2024",
                "principal": "-300.00",
                "interest": "10.00",
                "installment_total": "310.00",
                "outstanding_balance": "700.00",
                "status": "Scheduled"
            }
        ]
    }"#;
    let doc: ContractDocument = serde_json::from_str(json).unwrap();
    let err = build_ledger(&doc, &OperationClassifier::default()).unwrap_err();
    assert!(matches!(err, AmortError::DataIntegrity(_)));
}
