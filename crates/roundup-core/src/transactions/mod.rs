pub mod ceiling;
pub mod filter;
pub mod model;
pub mod parse;
pub mod validation;

pub use model::{
    ClassifiedTransactions, EnrichmentOutput, Expense, InvalidTransaction, Rejection, Transaction,
};
