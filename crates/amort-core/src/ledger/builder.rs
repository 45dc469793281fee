//! Normalizes the heterogeneous raw event list into one chronologically
//! ordered ledger with derived balances and running totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::contract::{parse_due_date, ContractDocument, RawEvent};
use crate::error::AmortError;
use crate::ledger::classify::{OperationClass, OperationClassifier};
use crate::types::{EntryKind, EntryStatus, Ledger, LedgerEntry, Money};
use crate::AmortResult;

struct DraftRow {
    sequence_number: Option<u32>,
    due_date: NaiveDate,
    principal: Money,
    interest: Money,
    ancillary: BTreeMap<String, Money>,
    total: Money,
    /// Unset for extra-payment rows until the balance walk derives it.
    balance: Option<Money>,
    status: EntryStatus,
    kind: EntryKind,
}

/// Build the ordered ledger from the raw event list.
///
/// Operations whose description the classifier does not recognize as an
/// amortization are discarded. Installment rows carry their recorded
/// balance; extra-payment rows derive theirs from the last balance an
/// installment established before them, which is why an extra payment with
/// no preceding installment is a data-integrity failure.
pub fn build_ledger(
    document: &ContractDocument,
    classifier: &OperationClassifier,
) -> AmortResult<Ledger> {
    let mut rows: Vec<DraftRow> = Vec::with_capacity(document.events.len());

    for event in &document.events {
        match event {
            RawEvent::Installment {
                sequence_number,
                due_date,
                principal,
                interest,
                ancillary_charges,
                installment_total,
                outstanding_balance,
                status,
            } => {
                check_non_negative("principal", *principal)?;
                check_non_negative("interest", *interest)?;
                check_non_negative("installment_total", *installment_total)?;
                check_non_negative("outstanding_balance", *outstanding_balance)?;
                for (name, amount) in ancillary_charges {
                    check_non_negative(name, *amount)?;
                }

                rows.push(DraftRow {
                    sequence_number: Some(*sequence_number),
                    due_date: parse_due_date(due_date)?,
                    principal: *principal,
                    interest: *interest,
                    ancillary: ancillary_charges.clone(),
                    total: *installment_total,
                    balance: Some(*outstanding_balance),
                    status: *status,
                    kind: EntryKind::Installment,
                });
            }
            RawEvent::Operation {
                description,
                date,
                amount,
                pro_rata_interest,
            } => {
                if classifier.classify(description) != OperationClass::AmortizationExtra {
                    continue;
                }
                check_non_negative("amount", *amount)?;

                rows.push(DraftRow {
                    sequence_number: None,
                    due_date: parse_due_date(date)?,
                    principal: *amount,
                    interest: pro_rata_interest.unwrap_or(Decimal::ZERO),
                    ancillary: BTreeMap::new(),
                    total: *amount,
                    balance: None,
                    status: EntryStatus::Amortized,
                    kind: EntryKind::ExtraPayment,
                });
            }
        }
    }

    // Stable: same-date rows keep source order, installments ahead of the
    // extra payments the source lists after them.
    rows.sort_by_key(|r| r.due_date);

    let mut entries: Vec<LedgerEntry> = Vec::with_capacity(rows.len());
    let mut last_known_balance: Option<Money> = None;
    let mut last_sequence: Option<u32> = None;

    for row in rows {
        let balance = match (row.kind, row.balance) {
            (EntryKind::Installment, Some(recorded)) => {
                last_known_balance = Some(recorded);
                recorded
            }
            (EntryKind::ExtraPayment, _) => {
                let prior = last_known_balance.ok_or_else(|| {
                    AmortError::DataIntegrity(
                        "extra payment precedes any installment that establishes a balance".into(),
                    )
                })?;
                let derived = prior - row.total;
                if derived < Decimal::ZERO {
                    return Err(AmortError::DataIntegrity(format!(
                        "extra payment of {} on {} exceeds the outstanding balance of {}",
                        row.total, row.due_date, prior
                    )));
                }
                last_known_balance = Some(derived);
                derived
            }
            (EntryKind::Installment, None) => unreachable!("installments carry a recorded balance"),
        };

        if let Some(seq) = row.sequence_number {
            if last_sequence.is_some_and(|prev| seq <= prev) {
                return Err(AmortError::DataIntegrity(format!(
                    "installment sequence numbers must be strictly increasing; {} follows {}",
                    seq,
                    last_sequence.unwrap()
                )));
            }
            last_sequence = Some(seq);
        }

        entries.push(LedgerEntry {
            sequence_number: row.sequence_number,
            due_date: row.due_date,
            principal_component: row.principal,
            interest_component: row.interest,
            ancillary_charges: row.ancillary,
            installment_total: row.total,
            outstanding_balance: balance,
            status: row.status,
            kind: row.kind,
            running_total_paid: Decimal::ZERO,
            running_total_principal: Decimal::ZERO,
            running_total_interest: Decimal::ZERO,
        });
    }

    super::apply_running_totals(&mut entries);
    Ok(Ledger::new(entries))
}

fn check_non_negative(field: &str, amount: Money) -> AmortResult<()> {
    if amount < Decimal::ZERO {
        return Err(AmortError::DataIntegrity(format!(
            "{field} cannot be negative, got {amount}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractMetadata;
    use rust_decimal_macros::dec;

    fn installment(seq: u32, date: &str, balance: Money) -> RawEvent {
        RawEvent::Installment {
            sequence_number: seq,
            due_date: date.into(),
            principal: dec!(300),
            interest: dec!(10),
            ancillary_charges: BTreeMap::new(),
            installment_total: dec!(310),
            outstanding_balance: balance,
            status: EntryStatus::Scheduled,
        }
    }

    fn amortization_op(date: &str, amount: Money) -> RawEvent {
        RawEvent::Operation {
            description: "Amortizacao extraordinaria".into(),
            date: date.into(),
            amount,
            pro_rata_interest: None,
        }
    }

    fn document(events: Vec<RawEvent>) -> ContractDocument {
        ContractDocument {
            metadata: ContractMetadata::default(),
            events,
        }
    }

    #[test]
    fn test_extra_payment_balance_is_derived() {
        let doc = document(vec![
            installment(1, "10/01/2024", dec!(700)),
            amortization_op("20/01/2024", dec!(100)),
            installment(2, "10/02/2024", dec!(400)),
        ]);
        let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

        assert_eq!(ledger.len(), 3);
        let extra = &ledger.entries()[1];
        assert_eq!(extra.kind, EntryKind::ExtraPayment);
        assert_eq!(extra.outstanding_balance, dec!(600));
    }

    #[test]
    fn test_orphan_extra_payment_is_rejected() {
        let doc = document(vec![
            amortization_op("01/01/2024", dec!(100)),
            installment(1, "10/01/2024", dec!(700)),
        ]);
        let err = build_ledger(&doc, &OperationClassifier::default()).unwrap_err();
        assert!(matches!(err, AmortError::DataIntegrity(_)));
    }

    #[test]
    fn test_unrecognized_operation_is_discarded() {
        let doc = document(vec![
            installment(1, "10/01/2024", dec!(700)),
            RawEvent::Operation {
                description: "Incorporacao de encargos".into(),
                date: "15/01/2024".into(),
                amount: dec!(50),
                pro_rata_interest: None,
            },
        ]);
        let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_rows_sorted_by_date_with_stable_ties() {
        let doc = document(vec![
            installment(1, "10/01/2024", dec!(700)),
            installment(2, "10/02/2024", dec!(400)),
            amortization_op("10/02/2024", dec!(150)),
        ]);
        let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

        // Same-date extra payment stays after the installment it follows.
        assert_eq!(ledger.entries()[1].kind, EntryKind::Installment);
        assert_eq!(ledger.entries()[2].kind, EntryKind::ExtraPayment);
        assert_eq!(ledger.entries()[2].outstanding_balance, dec!(250));
    }

    #[test]
    fn test_running_totals_fold_forward() {
        let doc = document(vec![
            installment(1, "10/01/2024", dec!(700)),
            installment(2, "10/02/2024", dec!(400)),
        ]);
        let ledger = build_ledger(&doc, &OperationClassifier::default()).unwrap();

        assert_eq!(ledger.entries()[0].running_total_paid, dec!(310));
        assert_eq!(ledger.entries()[1].running_total_paid, dec!(620));
        assert_eq!(ledger.entries()[1].running_total_principal, dec!(600));
        assert_eq!(ledger.entries()[1].running_total_interest, dec!(20));
    }
}
