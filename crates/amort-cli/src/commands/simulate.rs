use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use amort_core::contract::{ContractDocument, ContractTerms};
use amort_core::ledger::build_ledger;
use amort_core::simulation::{
    run_simulation, AmortizationEvent, ReductionMode, SimulationReport,
};
use amort_core::ComputationOutput;

use crate::commands::schedule::{classifier_from, read_document};
use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum Mode {
    /// Keep the payment level, shorten the remaining term
    ReduceTerm,
    /// Keep the term, lower the future payments
    ReduceInstallment,
}

impl From<Mode> for ReductionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::ReduceTerm => ReductionMode::ReduceTerm,
            Mode::ReduceInstallment => ReductionMode::ReduceInstallment,
        }
    }
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to the contract document JSON
    #[arg(long)]
    pub input: Option<String>,

    /// Sequence number of the installment the extra payment targets
    #[arg(long)]
    pub target: Option<u32>,

    /// Extra-payment amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Reduction policy applied to the remaining schedule
    #[arg(long, default_value = "reduce-term")]
    pub mode: Mode,

    /// Path to a JSON list of events applied in order
    /// (overrides --target/--amount/--mode)
    #[arg(long)]
    pub events: Option<String>,

    /// Override the annual nominal rate from the document metadata
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Include the diagnostic trace in the output
    #[arg(long)]
    pub trace: bool,

    /// Description pattern recognized as an amortization operation
    /// (repeatable; replaces the built-in patterns)
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,
}

#[derive(Args)]
pub struct ImpactArgs {
    /// Path to the contract document JSON
    #[arg(long)]
    pub input: Option<String>,

    /// Sequence number of the installment the extra payment targets
    #[arg(long)]
    pub target: Option<u32>,

    /// Extra-payment amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Reduction policy applied to the remaining schedule
    #[arg(long, default_value = "reduce-term")]
    pub mode: Mode,

    /// Path to a JSON list of events applied in order
    #[arg(long)]
    pub events: Option<String>,

    /// Override the annual nominal rate from the document metadata
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Description pattern recognized as an amortization operation
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_report(
        &args.input,
        args.annual_rate,
        &args.patterns,
        &args.events,
        args.target,
        args.amount,
        args.mode,
    )?;

    let mut value = serde_json::to_value(output)?;
    if !args.trace {
        if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
            result.remove("trace");
        }
    }
    Ok(value)
}

pub fn run_impact(args: ImpactArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = build_report(
        &args.input,
        args.annual_rate,
        &args.patterns,
        &args.events,
        args.target,
        args.amount,
        args.mode,
    )?;
    Ok(serde_json::to_value(output.result.impact)?)
}

fn build_report(
    input: &Option<String>,
    annual_rate: Option<Decimal>,
    patterns: &[String],
    events_path: &Option<String>,
    target: Option<u32>,
    amount: Option<Decimal>,
    mode: Mode,
) -> Result<ComputationOutput<SimulationReport>, Box<dyn std::error::Error>> {
    let document = read_document(input)?;
    let (terms, rate_warnings) = resolve_terms(&document, annual_rate)?;
    let baseline = build_ledger(&document, &classifier_from(patterns))?;
    let events = resolve_events(events_path, target, amount, mode)?;

    let mut output = run_simulation(baseline, &events, &terms)?;
    output.warnings.splice(0..0, rate_warnings);
    Ok(output)
}

fn resolve_terms(
    document: &ContractDocument,
    annual_rate: Option<Decimal>,
) -> Result<(ContractTerms, Vec<String>), Box<dyn std::error::Error>> {
    match annual_rate {
        Some(rate) => Ok((ContractTerms::new(rate)?, Vec::new())),
        None => Ok(ContractTerms::from_metadata(&document.metadata)?),
    }
}

fn resolve_events(
    events_path: &Option<String>,
    target: Option<u32>,
    amount: Option<Decimal>,
    mode: Mode,
) -> Result<Vec<AmortizationEvent>, Box<dyn std::error::Error>> {
    if let Some(path) = events_path {
        return input::file::read_json(path);
    }

    let target = target.ok_or("--target is required (or provide --events)")?;
    let amount = amount.ok_or("--amount is required (or provide --events)")?;
    Ok(vec![AmortizationEvent {
        target_sequence_number: target,
        extra_amount: amount,
        reduction_mode: mode.into(),
    }])
}
