pub mod builder;
pub mod classify;

pub use builder::build_ledger;
pub use classify::{OperationClass, OperationClassifier};

use rust_decimal::Decimal;

use crate::types::LedgerEntry;

/// Fill the three running totals as a forward fold over the rows, in order.
pub(crate) fn apply_running_totals(entries: &mut [LedgerEntry]) {
    let mut paid = Decimal::ZERO;
    let mut principal = Decimal::ZERO;
    let mut interest = Decimal::ZERO;

    for entry in entries {
        paid += entry.installment_total;
        principal += entry.principal_component;
        interest += entry.interest_component;
        entry.running_total_paid = paid;
        entry.running_total_principal = principal;
        entry.running_total_interest = interest;
    }
}
