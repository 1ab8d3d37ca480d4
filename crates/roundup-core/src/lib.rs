pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "transactions")]
pub mod transactions;

#[cfg(feature = "transactions")]
pub mod periods;

#[cfg(feature = "returns")]
pub mod returns;

pub use error::SavingsError;
pub use types::*;

/// Result type for the fallible edges of the crate (timestamp parsing)
pub type SavingsResult<T> = Result<T, SavingsError>;
