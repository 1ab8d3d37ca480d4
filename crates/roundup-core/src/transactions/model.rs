use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{timestamp, Money, Timestamp};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A raw expense as submitted for enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(with = "timestamp")]
    pub date: Timestamp,
    pub amount: Money,
}

/// An expense carrying its round-up ceiling and the remanent swept to savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(with = "timestamp")]
    pub date: Timestamp,
    pub amount: Money,
    #[serde(default)]
    pub ceiling: Money,
    #[serde(default)]
    pub remanent: Money,
    /// Set only by period filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_k_period: Option<bool>,
}

impl Transaction {
    /// Same transaction with a revised remanent.
    pub fn with_remanent(&self, remanent: Money) -> Self {
        Self {
            remanent,
            ..self.clone()
        }
    }

    /// Same transaction tagged with K-window membership.
    pub fn with_k_membership(&self, in_k_period: bool) -> Self {
        Self {
            in_k_period: Some(in_k_period),
            ..self.clone()
        }
    }

    pub fn reject(&self, reason: Rejection) -> InvalidTransaction {
        InvalidTransaction {
            date: self.date,
            amount: self.amount,
            ceiling: self.ceiling,
            remanent: self.remanent,
            in_k_period: self.in_k_period,
            message: reason.to_string(),
        }
    }
}

/// A transaction that failed a business rule. Terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidTransaction {
    #[serde(with = "timestamp")]
    pub date: Timestamp,
    pub amount: Money,
    pub ceiling: Money,
    pub remanent: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_k_period: Option<bool>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// Business rules a transaction can fail, in validation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NegativeAmount,
    AmountTooLarge,
    Duplicate,
    InvalidCeiling,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NegativeAmount => "No Negative amounts are allowed",
            Rejection::AmountTooLarge => "Amount too large for transaction",
            Rejection::Duplicate => "Transaction has already been seen",
            Rejection::InvalidCeiling => "Ceiling is not valid",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Operation outputs
// ---------------------------------------------------------------------------

/// Result of enriching raw expenses. Totals are unrounded sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentOutput {
    pub transactions: Vec<Transaction>,
    pub total_amount: Money,
    pub total_ceiling: Money,
    pub total_remanent: Money,
}

/// Valid/invalid partition produced by validation and filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransactions {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<InvalidTransaction>,
}

impl ClassifiedTransactions {
    pub fn rejected_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn total_count(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

pub(crate) fn sum_by(transactions: &[Transaction], field: impl Fn(&Transaction) -> Money) -> Money {
    transactions.iter().map(field).fold(Decimal::ZERO, Decimal::saturating_add)
}
