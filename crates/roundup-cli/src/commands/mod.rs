pub mod returns;
pub mod transactions;
