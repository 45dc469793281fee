pub mod contract;
pub mod error;
pub mod impact;
pub mod ledger;
pub mod session;
pub mod simulation;
pub mod types;

pub use error::AmortError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortResult<T> = Result<T, AmortError>;
