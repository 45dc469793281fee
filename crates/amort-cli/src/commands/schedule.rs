use clap::Args;
use serde_json::Value;

use amort_core::contract::ContractDocument;
use amort_core::ledger::{build_ledger, OperationClassifier};

use crate::input;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to the contract document JSON
    #[arg(long)]
    pub input: Option<String>,

    /// Description pattern recognized as an amortization operation
    /// (repeatable; replaces the built-in patterns)
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document = read_document(&args.input)?;
    let classifier = classifier_from(&args.patterns);
    let ledger = build_ledger(&document, &classifier)?;
    Ok(serde_json::to_value(ledger)?)
}

pub(crate) fn read_document(
    path: &Option<String>,
) -> Result<ContractDocument, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <contract.json> or stdin required".into())
    }
}

pub(crate) fn classifier_from(patterns: &[String]) -> OperationClassifier {
    if patterns.is_empty() {
        OperationClassifier::default()
    } else {
        OperationClassifier::new(patterns.iter().cloned())
    }
}
