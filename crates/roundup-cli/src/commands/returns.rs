use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use roundup_core::returns::projection::{self, ReturnsInput, ReturnsVariant};
use roundup_core::returns::tax;
use roundup_core::time_value::round_money;
use roundup_core::types::with_metadata;

use crate::input;

/// Arguments for a returns projection
#[derive(Args)]
pub struct ReturnsArgs {
    /// Path to JSON file holding {age, wage, inflation, q, p, k, transactions}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the tax calculator
#[derive(Args)]
pub struct TaxArgs {
    /// Annual taxable income
    #[arg(long)]
    pub income: Decimal,

    /// Amount invested in NPS during the year
    #[arg(long)]
    pub invested: Option<Decimal>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxSummary {
    income: Decimal,
    tax: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    deduction: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_benefit: Option<Decimal>,
}

fn run_returns(args: ReturnsArgs, variant: ReturnsVariant) -> Result<Value, Box<dyn std::error::Error>> {
    let request: Option<ReturnsInput> = input::read_request(args.input.as_deref(), "returns projection")?;
    let result = projection::calculate_returns(&request.unwrap_or_default(), variant);
    Ok(serde_json::to_value(result)?)
}

pub fn run_returns_nps(args: ReturnsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    run_returns(args, ReturnsVariant::Nps)
}

pub fn run_returns_index(args: ReturnsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    run_returns(args, ReturnsVariant::Index)
}

pub fn run_tax(args: TaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();

    let summary = TaxSummary {
        income: args.income,
        tax: round_money(tax::income_tax(args.income)),
        deduction: args
            .invested
            .map(|invested| round_money(tax::nps_deduction(invested, args.income))),
        tax_benefit: args
            .invested
            .map(|invested| round_money(tax::tax_benefit(invested, args.income))),
    };

    let result = with_metadata(
        "Progressive slab tax; NPS deduction capped at 10% of income and 200,000",
        &tax::TAX_BRACKETS,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        summary,
    );
    Ok(serde_json::to_value(result)?)
}
