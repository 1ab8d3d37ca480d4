use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Share of annual income deductible through NPS contributions.
pub const NPS_DEDUCTION_INCOME_SHARE: Rate = dec!(0.10);

/// Absolute cap on the NPS deduction.
pub const NPS_DEDUCTION_CAP: Money = dec!(200_000);

/// One marginal band of the income-tax schedule. `upper: None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate: Rate,
}

pub const TAX_BRACKETS: [TaxBracket; 5] = [
    TaxBracket { lower: dec!(0), upper: Some(dec!(700_000)), rate: dec!(0) },
    TaxBracket { lower: dec!(700_000), upper: Some(dec!(1_000_000)), rate: dec!(0.10) },
    TaxBracket { lower: dec!(1_000_000), upper: Some(dec!(1_200_000)), rate: dec!(0.15) },
    TaxBracket { lower: dec!(1_200_000), upper: Some(dec!(1_500_000)), rate: dec!(0.20) },
    TaxBracket { lower: dec!(1_500_000), upper: None, rate: dec!(0.30) },
];

/// Progressive income tax over [`TAX_BRACKETS`]. Non-positive income pays nothing.
pub fn income_tax(income: Money) -> Money {
    TAX_BRACKETS
        .iter()
        .filter(|band| income > band.lower)
        .map(|band| {
            let top = band.upper.map_or(income, |upper| income.min(upper));
            (top - band.lower) * band.rate
        })
        .fold(Decimal::ZERO, |acc, t| acc + t)
}

/// Deductible NPS contribution: the invested amount, capped at 10% of annual
/// income and at 200,000.
pub fn nps_deduction(invested: Money, annual_income: Money) -> Money {
    invested.min((annual_income * NPS_DEDUCTION_INCOME_SHARE).min(NPS_DEDUCTION_CAP))
}

/// Tax saved by deducting the NPS contribution from annual income.
pub fn tax_benefit(invested: Money, annual_income: Money) -> Money {
    let deduction = nps_deduction(invested, annual_income);
    income_tax(annual_income) - income_tax(annual_income.saturating_sub(deduction))
}
