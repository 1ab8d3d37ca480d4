use pretty_assertions::assert_eq;
use roundup_core::periods::{KPeriod, PPeriod, QPeriod};
use roundup_core::returns::projection::{self, ReturnsInput, ReturnsOutput, ReturnsVariant};
use roundup_core::returns::tax;
use roundup_core::time_value::{future_value, round_money};
use roundup_core::transactions::Transaction;
use roundup_core::types::{parse_timestamp, Money, Timestamp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Returns projection — NPS and index variants
// ===========================================================================

fn ts(s: &str) -> Timestamp {
    parse_timestamp(s).unwrap()
}

fn tx(date: &str, amount: Money, ceiling: Money, remanent: Money) -> Transaction {
    Transaction {
        date: ts(date),
        amount,
        ceiling,
        remanent,
        in_k_period: None,
    }
}

/// Four expenses plus a negative duplicate; one Q, one P and two K windows.
fn sample_input() -> ReturnsInput {
    ReturnsInput {
        age: 29,
        wage: dec!(50_000),
        inflation: dec!(0.055),
        q: Some(vec![QPeriod {
            start: ts("2023-07-01 00:00:00"),
            end: ts("2023-07-31 23:59:59"),
            fixed: dec!(0),
        }]),
        p: Some(vec![PPeriod {
            start: ts("2023-10-01 08:00:00"),
            end: ts("2023-12-31 19:59:59"),
            extra: dec!(25),
        }]),
        k: Some(vec![
            KPeriod {
                start: ts("2023-03-01 00:00:00"),
                end: ts("2023-11-30 23:59:59"),
            },
            KPeriod {
                start: ts("2023-01-01 00:00:00"),
                end: ts("2023-12-31 23:59:59"),
            },
        ]),
        transactions: Some(vec![
            tx("2023-02-28 15:49:20", dec!(375), dec!(400), dec!(25)),
            tx("2023-07-01 21:59:00", dec!(620), dec!(700), dec!(80)),
            tx("2023-10-12 20:15:30", dec!(250), dec!(300), dec!(50)),
            tx("2023-12-17 08:09:45", dec!(480), dec!(500), dec!(20)),
            tx("2023-12-17 08:09:45", dec!(-10), dec!(0), dec!(0)),
        ]),
    }
}

#[test]
fn test_totals_exclude_screened_transactions() {
    let out = projection::project(&sample_input(), ReturnsVariant::Index);
    assert_eq!(out.total_transaction_amount, dec!(1725));
    assert_eq!(out.total_ceiling, dec!(1900));
}

#[test]
fn test_k_aggregation_uses_reconciled_remanents() {
    let out = projection::project(&sample_input(), ReturnsVariant::Index);
    let amounts: Vec<Decimal> = out.savings_by_dates.iter().map(|r| r.amount).collect();
    // 25 + 0 (Q) + 75 (P) + 45 (P); the first window excludes Feb and Dec
    assert_eq!(amounts, vec![dec!(75), dec!(145)]);
    assert_eq!(out.savings_by_dates[1].start, ts("2023-01-01 00:00:00"));
}

#[test]
fn test_index_profit_known_values() {
    let out = projection::project(&sample_input(), ReturnsVariant::Index);
    assert_eq!(out.savings_by_dates[0].profit, dec!(-4029.41));
    assert_eq!(out.savings_by_dates[1].profit, dec!(-7790.20));
    assert!(out.savings_by_dates.iter().all(|r| r.tax_benefit.is_zero()));
}

#[test]
fn test_nps_profit_known_values() {
    let out = projection::project(&sample_input(), ReturnsVariant::Nps);
    assert_eq!(out.savings_by_dates[0].profit, dec!(-510.71));
    assert_eq!(out.savings_by_dates[1].profit, dec!(-987.38));
    // 600k annual income sits in the zero band
    assert!(out.savings_by_dates.iter().all(|r| r.tax_benefit.is_zero()));
}

#[test]
fn test_nps_tax_benefit_at_fifteen_percent_margin() {
    let mut input = sample_input();
    input.wage = dec!(100_000);
    let out = projection::project(&input, ReturnsVariant::Nps);
    // 1.2M income, 145 deducted at 15%
    assert_eq!(out.savings_by_dates[1].tax_benefit, dec!(21.75));
    assert_eq!(
        out.savings_by_dates[1].tax_benefit,
        round_money(tax::tax_benefit(dec!(145), dec!(1_200_000)))
    );
}

#[test]
fn test_retired_saver_zero_inflation_example() {
    let input = ReturnsInput {
        age: 60,
        wage: Decimal::ZERO,
        inflation: Decimal::ZERO,
        k: Some(vec![KPeriod {
            start: ts("2023-01-01 00:00:00"),
            end: ts("2023-12-31 23:59:59"),
        }]),
        transactions: Some(vec![tx("2023-04-01 12:00:00", dec!(4_000), dec!(4_000), dec!(1_000))]),
        ..Default::default()
    };
    let out = projection::project(&input, ReturnsVariant::Index);
    let row = &out.savings_by_dates[0];
    assert_eq!(row.amount, dec!(1_000));
    assert_eq!(row.profit, Decimal::ZERO);

    let final_amount = future_value(dec!(1_000), ReturnsVariant::Index.rate(), 5);
    assert_eq!(round_money(final_amount), dec!(1967.15));
}

#[test]
fn test_k_bucket_independent_of_filter_flag() {
    // Overlapping K windows both count the same transaction.
    let mut input = sample_input();
    input.k = Some(vec![
        KPeriod {
            start: ts("2023-10-01 00:00:00"),
            end: ts("2023-10-31 23:59:59"),
        },
        KPeriod {
            start: ts("2023-10-12 20:15:30"),
            end: ts("2023-10-12 20:15:30"),
        },
    ]);
    let out = projection::project(&input, ReturnsVariant::Index);
    assert_eq!(out.savings_by_dates[0].amount, dec!(75));
    assert_eq!(out.savings_by_dates[1].amount, dec!(75));
}

#[test]
fn test_empty_and_absent_transactions() {
    let mut input = sample_input();
    input.transactions = Some(vec![]);
    assert_eq!(projection::project(&input, ReturnsVariant::Nps), ReturnsOutput::default());

    input.transactions = None;
    assert_eq!(projection::project(&input, ReturnsVariant::Index), ReturnsOutput::default());
}

#[test]
fn test_request_from_wire() {
    let raw = r#"{
        "age": 29, "wage": 50000, "inflation": 0.055,
        "q": [{"fixed": 0, "start": "2023-07-01 00:00:00", "end": "2023-07-31 23:59:59"}],
        "p": [{"extra": 25, "start": "2023-10-01 08:00:00", "end": "2023-12-31 19:59:59"}],
        "k": [{"start": "2023-01-01 00:00:00", "end": "2023-12-31 23:59:59"}],
        "transactions": [
            {"date": "2023-02-28 15:49:20", "amount": 375, "ceiling": 400, "remanent": 25},
            {"date": "2023-07-01 21:59:00", "amount": 620, "ceiling": 700, "remanent": 80},
            {"date": "2023-10-12 20:15:30", "amount": 250, "ceiling": 300, "remanent": 50},
            {"date": "2023-12-17 08:09:45", "amount": 480, "ceiling": 500, "remanent": 20}
        ]
    }"#;
    let input: ReturnsInput = serde_json::from_str(raw).unwrap();
    let out = projection::calculate_returns(&input, ReturnsVariant::Nps);
    assert_eq!(out.result.savings_by_dates[0].amount, dec!(145));
    assert_eq!(out.result.savings_by_dates[0].profit, dec!(-987.38));
    assert_eq!(out.assumptions["variant"], "nps");
    assert!(out.warnings.iter().any(|w| w.contains("inflation")));
}

#[test]
fn test_engine_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReturnsInput>();
    assert_send_sync::<ReturnsOutput>();
    assert_send_sync::<Transaction>();
}

#[test]
fn test_extreme_inflation_never_faults() {
    let mut input = sample_input();
    input.age = 0;
    for inflation in [dec!(-0.65), dec!(-0.95), dec!(-1), dec!(5)] {
        input.inflation = inflation;
        let out = projection::calculate_returns(&input, ReturnsVariant::Index);
        assert_eq!(out.result.savings_by_dates.len(), 2, "inflation {inflation}");
        assert_eq!(out.result.total_ceiling, dec!(1900));
        assert!(out.warnings.iter().any(|w| w.contains("decimal range")), "inflation {inflation}");
    }
}
