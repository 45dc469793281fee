pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Columns printed for schedule rows, in ledger order.
pub(crate) const LEDGER_COLUMNS: &[&str] = &[
    "sequence_number",
    "due_date",
    "kind",
    "status",
    "principal_component",
    "interest_component",
    "installment_total",
    "outstanding_balance",
    "running_total_paid",
    "running_total_interest",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}
