//! Serde model of the upstream contract document and the contract-level
//! rate configuration.
//!
//! The document layout mirrors what the external statement extractor emits:
//! a `metadata` block of contract constants plus an `events` list of tagged
//! records, either scheduled installments or free-text operations. Dates
//! arrive as `DD/MM/YYYY` strings and monetary values as decimal strings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortError;
use crate::types::{EntryStatus, Money, Rate};
use crate::AmortResult;

/// Annual nominal rate assumed when the document metadata carries none.
pub const DEFAULT_ANNUAL_RATE: Decimal = dec!(0.1049);

const DUE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Contract-level constants extracted from the statement header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financed_principal: Option<Money>,
    /// Annual nominal rate as a decimal (0.1049 = 10.49%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_due_date: Option<String>,
}

/// One raw financial event from the external data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawEvent {
    /// A scheduled installment with its full component breakdown.
    Installment {
        sequence_number: u32,
        /// Due date as `DD/MM/YYYY`.
        due_date: String,
        principal: Money,
        interest: Money,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        ancillary_charges: BTreeMap<String, Money>,
        installment_total: Money,
        outstanding_balance: Money,
        status: EntryStatus,
    },
    /// An ad-hoc operation described in free text.
    Operation {
        description: String,
        /// Operation date as `DD/MM/YYYY`.
        date: String,
        amount: Money,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pro_rata_interest: Option<Money>,
    },
}

/// The full document consumed by the ledger builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDocument {
    #[serde(default)]
    pub metadata: ContractMetadata,
    pub events: Vec<RawEvent>,
}

/// Parse a `DD/MM/YYYY` date from the source document.
pub fn parse_due_date(raw: &str) -> AmortResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .map_err(|e| AmortError::Date(format!("invalid date '{raw}': {e}")))
}

/// Rate configuration of a fixed-rate amortizing contract.
///
/// The monthly rate is derived once from the annual nominal rate by compound
/// conversion: `(1 + annual)^(1/12) - 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTerms {
    annual_rate: Rate,
    monthly_rate: Rate,
}

impl ContractTerms {
    pub fn new(annual_rate: Rate) -> AmortResult<Self> {
        if annual_rate < Decimal::ZERO {
            return Err(AmortError::Validation {
                field: "annual_rate".into(),
                reason: "Annual nominal rate cannot be negative".into(),
            });
        }

        let monthly_rate = compound_monthly_rate(annual_rate);
        Ok(Self {
            annual_rate,
            monthly_rate,
        })
    }

    /// Build terms from document metadata, falling back to
    /// [`DEFAULT_ANNUAL_RATE`] when the metadata carries no rate. The
    /// fallback is reported as a warning so a mismatched contract is not
    /// silently priced at another contract's rate.
    pub fn from_metadata(metadata: &ContractMetadata) -> AmortResult<(Self, Vec<String>)> {
        let mut warnings = Vec::new();
        let annual_rate = match metadata.annual_rate {
            Some(rate) => rate,
            None => {
                warnings.push(format!(
                    "Document metadata carries no annual rate; assuming the default {}",
                    DEFAULT_ANNUAL_RATE
                ));
                DEFAULT_ANNUAL_RATE
            }
        };
        Ok((Self::new(annual_rate)?, warnings))
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }
}

fn compound_monthly_rate(annual_rate: Rate) -> Rate {
    if annual_rate.is_zero() {
        return Decimal::ZERO;
    }
    let base = Decimal::ONE + annual_rate;
    let exponent = Decimal::ONE / dec!(12);
    base.powd(exponent) - Decimal::ONE
}
