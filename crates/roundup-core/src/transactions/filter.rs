use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::model::{ClassifiedTransactions, Transaction};
use super::validation;
use crate::periods::{self, KPeriod, PPeriod, QPeriod};
use crate::types::{with_metadata, ComputationOutput, Money};

/// Filtering request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterInput {
    #[serde(default)]
    pub q: Option<Vec<QPeriod>>,
    #[serde(default)]
    pub p: Option<Vec<PPeriod>>,
    #[serde(default)]
    pub k: Option<Vec<KPeriod>>,
    #[serde(default)]
    pub wage: Money,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

#[derive(Serialize)]
struct FilterAssumptions {
    q_periods: usize,
    p_periods: usize,
    k_periods: usize,
    q_tie_break: &'static str,
    empty_k_membership: bool,
}

/// Screen out negative and duplicate-date transactions, then reconcile the
/// survivors against the Q/P windows and tag K membership.
pub fn filter(
    q: &[QPeriod],
    p: &[PPeriod],
    k: &[KPeriod],
    transactions: &[Transaction],
) -> ClassifiedTransactions {
    let screened = validation::screen(transactions);

    let valid = screened
        .valid
        .iter()
        .map(|tx| {
            periods::reconcile(tx, q, p).with_k_membership(periods::in_any_k_period(&tx.date, k))
        })
        .collect();

    ClassifiedTransactions {
        valid,
        invalid: screened.invalid,
    }
}

/// [`filter`] wrapped in the standard computation envelope.
pub fn filter_transactions(input: &FilterInput) -> ComputationOutput<ClassifiedTransactions> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let q = input.q.as_deref().unwrap_or_default();
    let p = input.p.as_deref().unwrap_or_default();
    let k = input.k.as_deref().unwrap_or_default();
    let transactions = input.transactions.as_deref().unwrap_or_default();

    let output = filter(q, p, k, transactions);

    if output.rejected_count() > 0 {
        warnings.push(format!(
            "{} of {} transactions rejected",
            output.rejected_count(),
            output.total_count()
        ));
    }
    if k.is_empty() && !output.valid.is_empty() {
        warnings.push("No K periods supplied; every transaction is treated as in-period".into());
    }
    tracing::info!(
        valid = output.valid.len(),
        invalid = output.invalid.len(),
        in_k = output.valid.iter().filter(|t| t.in_k_period == Some(true)).count(),
        "filtered transactions"
    );

    let assumptions = FilterAssumptions {
        q_periods: q.len(),
        p_periods: p.len(),
        k_periods: k.len(),
        q_tie_break: "latest start wins; equal starts keep the first listed",
        empty_k_membership: true,
    };

    with_metadata(
        "Negative/duplicate screen, Q override, P additions, K membership",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_timestamp, Timestamp};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    fn tx(date: &str, amount: Decimal, ceiling: Decimal, remanent: Decimal) -> Transaction {
        Transaction {
            date: ts(date),
            amount,
            ceiling,
            remanent,
            in_k_period: None,
        }
    }

    #[test]
    fn test_filter_reconciles_and_tags() {
        let q = vec![QPeriod {
            start: ts("2023-07-01 00:00:00"),
            end: ts("2023-07-31 23:59:59"),
            fixed: dec!(0),
        }];
        let p = vec![PPeriod {
            start: ts("2023-10-01 08:00:00"),
            end: ts("2023-12-31 19:59:59"),
            extra: dec!(25),
        }];
        let k = vec![KPeriod {
            start: ts("2023-01-01 00:00:00"),
            end: ts("2023-10-31 23:59:59"),
        }];
        let txs = vec![
            tx("2023-02-28 15:49:20", dec!(375), dec!(400), dec!(25)),
            tx("2023-07-15 10:00:00", dec!(620), dec!(700), dec!(80)),
            tx("2023-10-12 20:15:30", dec!(250), dec!(300), dec!(50)),
            tx("2023-12-17 08:09:45", dec!(480), dec!(500), dec!(20)),
        ];

        let out = filter(&q, &p, &k, &txs);
        assert!(out.invalid.is_empty());
        let remanents: Vec<Decimal> = out.valid.iter().map(|t| t.remanent).collect();
        assert_eq!(remanents, vec![dec!(25), dec!(0), dec!(75), dec!(45)]);
        let flags: Vec<Option<bool>> = out.valid.iter().map(|t| t.in_k_period).collect();
        assert_eq!(flags, vec![Some(true), Some(true), Some(true), Some(false)]);
    }

    #[test]
    fn test_filter_rejects_negative_and_duplicates_only() {
        let txs = vec![
            tx("2023-01-01 10:00:00", dec!(700_000), dec!(700_000), dec!(0)),
            tx("2023-01-01 10:00:00", dec!(100), dec!(100), dec!(0)),
            tx("2023-01-02 10:00:00", dec!(-5), dec!(0), dec!(0)),
            tx("2023-01-03 10:00:00", dec!(250), dec!(999), dec!(999)),
        ];
        let out = filter(&[], &[], &[], &txs);
        assert_eq!(out.valid.len(), 2);
        assert_eq!(out.invalid[0].message, "Transaction has already been seen");
        assert_eq!(out.invalid[1].message, "No Negative amounts are allowed");
        assert!(out.valid.iter().all(|t| t.in_k_period == Some(true)));
        assert!(out.invalid.iter().all(|t| t.in_k_period.is_none()));
    }

    #[test]
    fn test_filter_transactions_absent_lists() {
        let out = filter_transactions(&FilterInput::default());
        assert!(out.result.valid.is_empty());
        assert!(out.result.invalid.is_empty());
    }

    #[test]
    fn test_filter_input_from_wire() {
        let raw = r#"{
            "q": [{"fixed": 0, "start": "2023-07-01 00:00:00", "end": "2023-07-31 23:59:59"}],
            "p": null,
            "wage": 50000,
            "transactions": [
                {"date": "2023-07-10 12:00:00", "amount": 620, "ceiling": 700, "remanent": 80}
            ]
        }"#;
        let input: FilterInput = serde_json::from_str(raw).unwrap();
        let out = filter_transactions(&input);
        assert_eq!(out.result.valid[0].remanent, Decimal::ZERO);
        assert_eq!(out.result.valid[0].in_k_period, Some(true));
        assert_eq!(out.warnings.len(), 1);
    }
}
