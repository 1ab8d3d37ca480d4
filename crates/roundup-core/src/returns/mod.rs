pub mod projection;
pub mod tax;

pub use projection::{KPeriodResult, ReturnsInput, ReturnsOutput, ReturnsVariant};
