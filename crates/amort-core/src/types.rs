use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.1049 = 10.49%). Never as percentages.
pub type Rate = Decimal;

/// Payment state of a schedule row.
///
/// Deserialization also accepts the labels found in Brazilian mortgage
/// statements, since that is what the upstream document extractor emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(alias = "Em aberto", alias = "A vencer")]
    Scheduled,
    #[serde(alias = "Paga")]
    Paid,
    #[serde(alias = "Amortizado")]
    Amortized,
}

/// Discriminates regular installments from out-of-schedule extra payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Installment,
    ExtraPayment,
}

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Present only for regular installments; unique and increasing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<u32>,
    pub due_date: NaiveDate,
    /// Principal portion of the payment.
    pub principal_component: Money,
    /// Interest portion of the payment.
    pub interest_component: Money,
    /// Named optional charges (insurance premiums, admin fee).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ancillary_charges: BTreeMap<String, Money>,
    /// For installments: principal + interest + ancillary charges.
    /// For extra payments: the extra-payment amount itself.
    pub installment_total: Money,
    /// Remaining principal owed after this row is applied. Never negative.
    pub outstanding_balance: Money,
    pub status: EntryStatus,
    pub kind: EntryKind,
    pub running_total_paid: Money,
    pub running_total_principal: Money,
    pub running_total_interest: Money,
}

impl LedgerEntry {
    pub fn is_installment(&self) -> bool {
        self.kind == EntryKind::Installment
    }

    /// Sum of all ancillary charges on this row.
    pub fn ancillary_total(&self) -> Money {
        self.ancillary_charges.values().copied().sum()
    }
}

/// The ordered sequence of installment and extra-payment rows describing a
/// loan's full history and future schedule.
///
/// Rows are kept in non-decreasing due-date order (ties keep construction
/// order), balances follow the row-to-row recurrence, and the running totals
/// are a forward fold over the rows. Construction sites are responsible for
/// upholding these invariants; the ledger itself is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of regular installment rows only.
    pub fn installment_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_installment()).count()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Locate an installment row by its sequence number.
    pub fn find_by_sequence(&self, sequence_number: u32) -> Option<(usize, &LedgerEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.sequence_number == Some(sequence_number))
    }

    /// Total interest across all rows.
    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest_component).sum()
    }

    /// Cumulative amount paid over the whole ledger.
    pub fn total_paid(&self) -> Money {
        self.entries
            .last()
            .map(|e| e.running_total_paid)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
