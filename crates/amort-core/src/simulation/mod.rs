pub mod engine;
pub mod trace;

pub use engine::{
    recalculate, run_simulation, simulate, AmortizationEvent, ReductionMode, SimulationOutcome,
    SimulationReport,
};
pub use trace::TraceRecord;
