use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;

use super::ceiling::{self, ROUNDING_MULTIPLE};
use super::model::{sum_by, EnrichmentOutput, Expense, Transaction};
use crate::types::{with_metadata, ComputationOutput, Money};

#[derive(Serialize)]
struct EnrichmentAssumptions {
    rounding_multiple: Money,
    non_positive_amounts: &'static str,
}

/// Enrich a single expense with its ceiling and remanent.
pub fn to_transaction(expense: &Expense) -> Transaction {
    let round_up = ceiling::round_up(expense.amount);
    Transaction {
        date: expense.date,
        amount: expense.amount,
        ceiling: round_up.ceiling,
        remanent: round_up.remanent,
        in_k_period: None,
    }
}

/// Enrich raw expenses and total their amounts, ceilings and remanents.
pub fn enrich(expenses: &[Expense]) -> EnrichmentOutput {
    let transactions: Vec<Transaction> = expenses.iter().map(to_transaction).collect();

    EnrichmentOutput {
        total_amount: sum_by(&transactions, |t| t.amount),
        total_ceiling: sum_by(&transactions, |t| t.ceiling),
        total_remanent: sum_by(&transactions, |t| t.remanent),
        transactions,
    }
}

/// [`enrich`] wrapped in the standard computation envelope.
pub fn parse_expenses(expenses: &[Expense]) -> ComputationOutput<EnrichmentOutput> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let output = enrich(expenses);

    let non_positive = expenses.iter().filter(|e| e.amount <= Decimal::ZERO).count();
    if non_positive > 0 {
        warnings.push(format!(
            "{non_positive} expense(s) with non-positive amounts contribute no remanent"
        ));
    }
    tracing::info!(
        expenses = expenses.len(),
        total_remanent = %output.total_remanent,
        "enriched expenses"
    );

    let assumptions = EnrichmentAssumptions {
        rounding_multiple: ROUNDING_MULTIPLE,
        non_positive_amounts: "ceiling and remanent are zero",
    };

    with_metadata(
        "Round-up to next multiple of 100; remanent = ceiling - amount",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    )
}
