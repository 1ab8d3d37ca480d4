//! Time windows that reconcile a transaction's remanent.
//!
//! Q windows override the remanent with a fixed value, P windows add an
//! extra amount on top, K windows mark the accumulation buckets used for
//! filtering and returns projection. All bounds are inclusive.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transactions::Transaction;
use crate::types::{timestamp, Money, Timestamp};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Override window: remanent becomes `fixed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QPeriod {
    #[serde(with = "timestamp")]
    pub start: Timestamp,
    #[serde(with = "timestamp")]
    pub end: Timestamp,
    pub fixed: Money,
}

/// Additive window: `extra` is added to the remanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PPeriod {
    #[serde(with = "timestamp")]
    pub start: Timestamp,
    #[serde(with = "timestamp")]
    pub end: Timestamp,
    pub extra: Money,
}

/// Accumulation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KPeriod {
    #[serde(with = "timestamp")]
    pub start: Timestamp,
    #[serde(with = "timestamp")]
    pub end: Timestamp,
}

/// A closed time interval.
pub trait Window {
    fn start(&self) -> Timestamp;
    fn end(&self) -> Timestamp;

    /// Inclusive on both bounds.
    fn contains(&self, date: &Timestamp) -> bool {
        *date >= self.start() && *date <= self.end()
    }
}

macro_rules! impl_window {
    ($($ty:ty),*) => {
        $(impl Window for $ty {
            fn start(&self) -> Timestamp {
                self.start
            }

            fn end(&self) -> Timestamp {
                self.end
            }
        })*
    };
}

impl_window!(QPeriod, PPeriod, KPeriod);

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// The Q window governing `date`: latest start among the matches, and on a
/// tied start the one that appears first in `q`.
pub fn select_override<'a>(date: &Timestamp, q: &'a [QPeriod]) -> Option<&'a QPeriod> {
    let mut best: Option<&QPeriod> = None;

    for period in q.iter().filter(|period| period.contains(date)) {
        match best {
            Some(current) if period.start <= current.start => {}
            _ => best = Some(period),
        }
    }

    best
}

/// Sum of `extra` across every P window containing `date`.
pub fn total_extra(date: &Timestamp, p: &[PPeriod]) -> Money {
    p.iter()
        .filter(|period| period.contains(date))
        .fold(Decimal::ZERO, |acc, period| acc.saturating_add(period.extra))
}

/// Membership in at least one K window. An empty list places no restriction.
pub fn in_any_k_period(date: &Timestamp, k: &[KPeriod]) -> bool {
    k.is_empty() || k.iter().any(|period| period.contains(date))
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Apply the Q override then the P additions to one transaction.
pub fn reconcile(tx: &Transaction, q: &[QPeriod], p: &[PPeriod]) -> Transaction {
    let mut remanent = tx.remanent;

    if let Some(period) = select_override(&tx.date, q) {
        tracing::debug!(date = %tx.date, fixed = %period.fixed, "q override applied");
        remanent = period.fixed;
    }

    let extra = total_extra(&tx.date, p);
    if !extra.is_zero() {
        tracing::debug!(date = %tx.date, %extra, "p extra applied");
    }

    tx.with_remanent(remanent.saturating_add(extra))
}

/// Reconcile every transaction. Assumes the list was already screened.
pub fn apply_period_rules(transactions: &[Transaction], q: &[QPeriod], p: &[PPeriod]) -> Vec<Transaction> {
    transactions.iter().map(|tx| reconcile(tx, q, p)).collect()
}
