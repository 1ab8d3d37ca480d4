use std::collections::HashSet;
use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ceiling::{self, CONSISTENCY_TOLERANCE};
use super::model::{ClassifiedTransactions, Rejection, Transaction};
use crate::types::{with_metadata, ComputationOutput, Money, Timestamp};

/// Amounts at or above this are rejected.
pub const MAX_AMOUNT: Decimal = dec!(500_000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Validation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorInput {
    /// Monthly wage. Carried on the request; no rule reads it.
    #[serde(default)]
    pub wage: Money,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

#[derive(Serialize)]
struct ValidationAssumptions {
    max_amount: Money,
    ceiling_tolerance: Money,
    rule_order: [&'static str; 4],
}

// ---------------------------------------------------------------------------
// Accepted-date registry
// ---------------------------------------------------------------------------

/// Dates accepted so far within a single invocation.
#[derive(Debug, Default)]
pub(crate) struct SeenDates(HashSet<Timestamp>);

impl SeenDates {
    pub(crate) fn contains(&self, date: &Timestamp) -> bool {
        self.0.contains(date)
    }

    pub(crate) fn accept(&mut self, date: Timestamp) {
        self.0.insert(date);
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn full_rules(tx: &Transaction, seen: &SeenDates) -> Option<Rejection> {
    if tx.amount < Decimal::ZERO {
        return Some(Rejection::NegativeAmount);
    }
    if tx.amount >= MAX_AMOUNT {
        return Some(Rejection::AmountTooLarge);
    }
    if seen.contains(&tx.date) {
        return Some(Rejection::Duplicate);
    }
    if !ceiling::is_consistent(tx.amount, tx.ceiling, tx.remanent) {
        return Some(Rejection::InvalidCeiling);
    }
    None
}

fn screening_rules(tx: &Transaction, seen: &SeenDates) -> Option<Rejection> {
    if tx.amount < Decimal::ZERO {
        return Some(Rejection::NegativeAmount);
    }
    if seen.contains(&tx.date) {
        return Some(Rejection::Duplicate);
    }
    None
}

fn classify(
    transactions: &[Transaction],
    rules: fn(&Transaction, &SeenDates) -> Option<Rejection>,
) -> ClassifiedTransactions {
    let mut seen = SeenDates::default();
    let mut out = ClassifiedTransactions::default();

    for tx in transactions {
        match rules(tx, &seen) {
            Some(reason) => {
                tracing::debug!(date = %tx.date, amount = %tx.amount, %reason, "transaction rejected");
                out.invalid.push(tx.reject(reason));
            }
            None => {
                seen.accept(tx.date);
                out.valid.push(tx.clone());
            }
        }
    }

    out
}

/// Classify transactions under the sign, magnitude, duplicate-date and
/// ceiling-consistency rules, first matching rule wins.
///
/// Accepted transactions are passed through unchanged. `_wage` takes part in
/// no rule.
pub fn validate(_wage: Money, transactions: &[Transaction]) -> ClassifiedTransactions {
    classify(transactions, full_rules)
}

/// Sign and duplicate-date screen only. Used ahead of period reconciliation.
pub fn screen(transactions: &[Transaction]) -> ClassifiedTransactions {
    classify(transactions, screening_rules)
}

/// [`validate`] wrapped in the standard computation envelope.
pub fn validate_transactions(input: &ValidatorInput) -> ComputationOutput<ClassifiedTransactions> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let transactions = input.transactions.as_deref().unwrap_or_default();
    let output = validate(input.wage, transactions);

    if output.rejected_count() > 0 {
        warnings.push(format!(
            "{} of {} transactions rejected",
            output.rejected_count(),
            output.total_count()
        ));
    }
    tracing::info!(
        valid = output.valid.len(),
        invalid = output.invalid.len(),
        "validated transactions"
    );

    let assumptions = ValidationAssumptions {
        max_amount: MAX_AMOUNT,
        ceiling_tolerance: CONSISTENCY_TOLERANCE,
        rule_order: [
            Rejection::NegativeAmount.message(),
            Rejection::AmountTooLarge.message(),
            Rejection::Duplicate.message(),
            Rejection::InvalidCeiling.message(),
        ],
    };

    with_metadata(
        "Ordered rule check: sign, magnitude, duplicate date, ceiling consistency",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    )
}
