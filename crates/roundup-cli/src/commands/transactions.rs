use clap::Args;
use serde_json::Value;

use roundup_core::transactions::filter::{self, FilterInput};
use roundup_core::transactions::parse;
use roundup_core::transactions::validation::{self, ValidatorInput};
use roundup_core::transactions::Expense;

use crate::input;

/// Arguments for expense enrichment
#[derive(Args)]
pub struct ParseArgs {
    /// Path to JSON file holding an array of {date, amount}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for transaction validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON file holding {wage, transactions}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for period filtering
#[derive(Args)]
pub struct FilterArgs {
    /// Path to JSON file holding {q, p, k, wage, transactions}
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_parse(args: ParseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let expenses: Option<Vec<Expense>> = input::read_request(args.input.as_deref(), "expense parsing")?;
    let result = parse::parse_expenses(expenses.as_deref().unwrap_or_default());
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: Option<ValidatorInput> =
        input::read_request(args.input.as_deref(), "transaction validation")?;
    let result = validation::validate_transactions(&request.unwrap_or_default());
    Ok(serde_json::to_value(result)?)
}

pub fn run_filter(args: FilterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: Option<FilterInput> = input::read_request(args.input.as_deref(), "transaction filtering")?;
    let result = filter::filter_transactions(&request.unwrap_or_default());
    Ok(serde_json::to_value(result)?)
}
