use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::tax;
use crate::periods::{self, KPeriod, PPeriod, QPeriod, Window};
use crate::time_value::{compound, future_value, inflation_adjust, is_saturated, round_money};
use crate::transactions::model::sum_by;
use crate::transactions::validation;
use crate::transactions::Transaction;
use crate::types::{timestamp, with_metadata, ComputationOutput, Money, Rate, Timestamp, TIMESTAMP_FORMAT};

/// Annual growth assumed for NPS holdings.
pub const NPS_RATE: Rate = dec!(0.0711);

/// Annual growth assumed for index-fund holdings.
pub const INDEX_RATE: Rate = dec!(0.1449);

/// Compounding periods per year.
pub const COMPOUNDING_FREQUENCY: u32 = 1;

pub const RETIREMENT_AGE: u32 = 60;

/// Horizon used once the saver has reached retirement age.
pub const MIN_INVESTMENT_YEARS: u32 = 5;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Investment product the savings are projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnsVariant {
    /// National Pension System: lower growth, tax-deductible contributions.
    Nps,
    /// Equity index fund: higher growth, no tax treatment.
    Index,
}

impl ReturnsVariant {
    pub fn rate(self) -> Rate {
        match self {
            ReturnsVariant::Nps => NPS_RATE,
            ReturnsVariant::Index => INDEX_RATE,
        }
    }

    pub fn has_tax_benefit(self) -> bool {
        matches!(self, ReturnsVariant::Nps)
    }
}

/// Returns projection request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnsInput {
    #[serde(default)]
    pub age: u32,
    /// Monthly wage.
    #[serde(default)]
    pub wage: Money,
    #[serde(default)]
    pub inflation: Rate,
    #[serde(default)]
    pub q: Option<Vec<QPeriod>>,
    #[serde(default)]
    pub p: Option<Vec<PPeriod>>,
    #[serde(default)]
    pub k: Option<Vec<KPeriod>>,
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
}

/// Savings accumulated inside one K window and their projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KPeriodResult {
    #[serde(with = "timestamp")]
    pub start: Timestamp,
    #[serde(with = "timestamp")]
    pub end: Timestamp,
    /// Invested remanent total.
    pub amount: Money,
    /// Real minus nominal final value.
    pub profit: Money,
    pub tax_benefit: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsOutput {
    pub total_transaction_amount: Money,
    pub total_ceiling: Money,
    pub savings_by_dates: Vec<KPeriodResult>,
}

#[derive(Serialize)]
struct ReturnsAssumptions {
    variant: ReturnsVariant,
    annual_rate: Rate,
    compounding_frequency: u32,
    investment_years: u32,
    annual_income: Money,
    inflation: Rate,
    retirement_age: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn annual_income(monthly_wage: Money) -> Money {
    monthly_wage.saturating_mul(MONTHS_PER_YEAR)
}

/// Years until retirement, or the minimum horizon once retired.
pub fn investment_years(age: u32) -> u32 {
    if age >= RETIREMENT_AGE {
        MIN_INVESTMENT_YEARS
    } else {
        RETIREMENT_AGE - age
    }
}

fn invested_in(period: &KPeriod, transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|tx| period.contains(&tx.date))
        .fold(Decimal::ZERO, |acc, tx| acc.saturating_add(tx.remanent))
}

/// Nominal value at retirement and its inflation-deflated counterpart.
fn grow(invested: Money, variant: ReturnsVariant, years: u32, inflation: Rate) -> (Money, Money) {
    let final_amount = future_value(invested, variant.rate(), years);
    let real_amount = inflation_adjust(final_amount, inflation, years);
    (final_amount, real_amount)
}

fn project_period(
    period: &KPeriod,
    transactions: &[Transaction],
    variant: ReturnsVariant,
    years: u32,
    inflation: Rate,
    annual_income: Money,
) -> KPeriodResult {
    let invested = invested_in(period, transactions);

    let (final_amount, real_amount) = grow(invested, variant, years, inflation);
    let profit = real_amount.saturating_sub(final_amount);

    let tax_benefit = if variant.has_tax_benefit() {
        tax::tax_benefit(invested, annual_income)
    } else {
        Decimal::ZERO
    };

    KPeriodResult {
        start: period.start,
        end: period.end,
        amount: round_money(invested),
        profit: round_money(profit),
        tax_benefit: round_money(tax_benefit),
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project screened, reconciled savings per K window.
///
/// Transactions pass the negative/duplicate screen and the Q/P windows
/// first. Each K window then sums the remanents dated inside it, compounds
/// that sum annually to retirement and deflates it by inflation. An absent or
/// empty transaction list yields an all-zero result.
///
/// Total over its input: growth or deflation that leaves the Decimal range
/// saturates at `Decimal::MAX`/`Decimal::MIN` instead of failing.
pub fn project(input: &ReturnsInput, variant: ReturnsVariant) -> ReturnsOutput {
    let transactions = match input.transactions.as_deref() {
        Some(txs) if !txs.is_empty() => txs,
        _ => return ReturnsOutput::default(),
    };
    let q = input.q.as_deref().unwrap_or_default();
    let p = input.p.as_deref().unwrap_or_default();
    let k = input.k.as_deref().unwrap_or_default();

    let screened = validation::screen(transactions);
    let reconciled = periods::apply_period_rules(&screened.valid, q, p);

    let annual_income = annual_income(input.wage);
    let years = investment_years(input.age);

    let savings_by_dates = k
        .iter()
        .map(|period| project_period(period, &reconciled, variant, years, input.inflation, annual_income))
        .collect();

    ReturnsOutput {
        total_transaction_amount: round_money(sum_by(&reconciled, |t| t.amount)),
        total_ceiling: round_money(sum_by(&reconciled, |t| t.ceiling)),
        savings_by_dates,
    }
}

/// [`project`] wrapped in the standard computation envelope.
pub fn calculate_returns(
    input: &ReturnsInput,
    variant: ReturnsVariant,
) -> ComputationOutput<ReturnsOutput> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = project(input, variant);
    let years = investment_years(input.age);

    let submitted = input.transactions.as_ref().map_or(0, Vec::len);
    let k_count = input.k.as_ref().map_or(0, Vec::len);

    if submitted > 0 && k_count == 0 {
        warnings.push("No K periods supplied; savingsByDates is empty".into());
    }
    if input.inflation > Decimal::ZERO && !output.savings_by_dates.is_empty() {
        warnings.push("Profit is real minus nominal value and is negative whenever inflation > 0".into());
    }
    if input.inflation <= dec!(-1) && !output.savings_by_dates.is_empty() {
        warnings.push("Inflation at or below -100% has no meaningful real value".into());
    }
    let deflator = compound(input.inflation, u64::from(years));
    let out_of_range = output.savings_by_dates.iter().any(|r| {
        let (final_amount, real_amount) = grow(r.amount, variant, years, input.inflation);
        let clamped = [deflator, final_amount, real_amount].into_iter().any(is_saturated);
        !r.amount.is_zero() && (deflator.is_zero() || clamped)
    });
    if out_of_range {
        warnings.push(format!(
            "Growth or deflation over {years} years leaves the decimal range; affected figures are clamped"
        ));
    }
    for result in output.savings_by_dates.iter().filter(|r| r.amount.is_zero()) {
        warnings.push(format!(
            "K period {} .. {} holds no savings",
            result.start.format(TIMESTAMP_FORMAT),
            result.end.format(TIMESTAMP_FORMAT)
        ));
    }
    tracing::info!(
        ?variant,
        transactions = submitted,
        k_periods = output.savings_by_dates.len(),
        total_ceiling = %output.total_ceiling,
        "projected returns"
    );

    let assumptions = ReturnsAssumptions {
        variant,
        annual_rate: variant.rate(),
        compounding_frequency: COMPOUNDING_FREQUENCY,
        investment_years: years,
        annual_income: annual_income(input.wage),
        inflation: input.inflation,
        retirement_age: RETIREMENT_AGE,
    };

    with_metadata(
        "Annual compound growth to retirement, deflated by inflation; NPS adds a progressive-tax deduction benefit",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    )
}
