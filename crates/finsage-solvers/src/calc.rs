// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure deterministic financial calculations.
//!
//! Every function here is total over well-typed numeric input: no panics,
//! no I/O, bounded iteration. Money outputs are rounded to cents so results
//! are stable across platforms.

use serde::{Deserialize, Serialize};

/// US federal corporate rate used when the query names no rate.
pub const DEFAULT_CORPORATE_RATE: f64 = 0.21;

/// Iterations for the IRR bisection. 128 halvings of the initial bracket
/// put the answer well below basis-point precision.
const IRR_ITERATIONS: u32 = 128;

/// Round a money amount to cents.
fn to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Corporate income tax at a flat rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateTaxResult {
    pub taxable_income: f64,
    pub rate: f64,
    pub tax_owed: f64,
    pub after_tax_income: f64,
}

/// Compute flat-rate corporate tax. Negative income owes nothing.
pub fn corporate_tax(taxable_income: f64, rate: Option<f64>) -> CorporateTaxResult {
    let rate = rate.unwrap_or(DEFAULT_CORPORATE_RATE).max(0.0);
    let tax_owed = to_cents((taxable_income.max(0.0)) * rate);
    CorporateTaxResult {
        taxable_income,
        rate,
        tax_owed,
        after_tax_income: to_cents(taxable_income - tax_owed),
    }
}

/// Net present value of a cash flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpvResult {
    pub discount_rate: f64,
    pub cash_flows: Vec<f64>,
    pub npv: f64,
}

/// NPV with the first flow at t=0: sum of cf_t / (1 + r)^t.
///
/// A discount rate at or below -100% has no meaningful present value; the
/// result is reported as 0 rather than a non-finite number.
pub fn npv(discount_rate: f64, cash_flows: &[f64]) -> NpvResult {
    let value = if discount_rate <= -1.0 {
        0.0
    } else {
        cash_flows
            .iter()
            .enumerate()
            .map(|(t, cf)| cf / (1.0 + discount_rate).powi(t as i32))
            .sum()
    };
    NpvResult {
        discount_rate,
        cash_flows: cash_flows.to_vec(),
        npv: to_cents(value),
    }
}

/// Internal rate of return of a cash flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrResult {
    pub cash_flows: Vec<f64>,
    /// Annualized rate as a fraction (0.12 = 12%).
    pub irr: f64,
}

/// IRR via bisection on the NPV sign change over (-99.99%, 1000%].
///
/// Returns `None` when the series has fewer than two flows, no sign change
/// among the flows, or no root inside the bracket. Bounded at
/// [`IRR_ITERATIONS`] halvings, so it can neither diverge nor spin.
pub fn irr(cash_flows: &[f64]) -> Option<IrrResult> {
    if cash_flows.len() < 2 {
        return None;
    }
    let has_positive = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_negative = cash_flows.iter().any(|cf| *cf < 0.0);
    if !has_positive || !has_negative {
        return None;
    }

    let npv_at = |rate: f64| -> f64 {
        cash_flows
            .iter()
            .enumerate()
            .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
            .sum()
    };

    let mut lo = -0.9999;
    let mut hi = 10.0;
    let (npv_lo, npv_hi) = (npv_at(lo), npv_at(hi));
    if npv_lo.signum() == npv_hi.signum() {
        return None;
    }

    for _ in 0..IRR_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let v = npv_at(mid);
        if v == 0.0 {
            lo = mid;
            hi = mid;
            break;
        }
        if v.signum() == npv_lo.signum() {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let rate = (lo + hi) / 2.0;
    Some(IrrResult {
        cash_flows: cash_flows.to_vec(),
        irr: (rate * 10_000.0).round() / 10_000.0,
    })
}

/// Straight-line depreciation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationResult {
    pub cost: f64,
    pub salvage_value: f64,
    pub useful_life_years: u32,
    pub annual_expense: f64,
    /// Book value at the end of each year of the useful life.
    pub year_end_book_values: Vec<f64>,
}

/// Straight-line depreciation: (cost - salvage) / life per year.
///
/// A zero-year life produces an empty schedule and no annual expense.
pub fn straight_line_depreciation(
    cost: f64,
    salvage_value: f64,
    useful_life_years: u32,
) -> DepreciationResult {
    if useful_life_years == 0 {
        return DepreciationResult {
            cost,
            salvage_value,
            useful_life_years,
            annual_expense: 0.0,
            year_end_book_values: Vec::new(),
        };
    }

    let depreciable = (cost - salvage_value).max(0.0);
    let annual = depreciable / useful_life_years as f64;
    let book_values = (1..=useful_life_years)
        .map(|year| to_cents(cost - annual * year as f64))
        .collect();

    DepreciationResult {
        cost,
        salvage_value,
        useful_life_years,
        annual_expense: to_cents(annual),
        year_end_book_values: book_values,
    }
}

/// Fixed-payment loan amortization summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub principal: f64,
    /// Annual nominal rate as a fraction.
    pub annual_rate: f64,
    pub term_years: u32,
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

/// Standard annuity payment on a monthly-compounded loan.
///
/// A zero rate divides the principal evenly; a zero term owes the principal
/// immediately with no interest.
pub fn amortization(principal: f64, annual_rate: f64, term_years: u32) -> AmortizationResult {
    let n = term_years * 12;
    if n == 0 {
        return AmortizationResult {
            principal,
            annual_rate,
            term_years,
            monthly_payment: to_cents(principal),
            total_paid: to_cents(principal),
            total_interest: 0.0,
        };
    }

    let monthly_rate = annual_rate / 12.0;
    let payment = if monthly_rate == 0.0 {
        principal / n as f64
    } else {
        let factor = (1.0 + monthly_rate).powi(n as i32);
        principal * monthly_rate * factor / (factor - 1.0)
    };

    let total = payment * n as f64;
    AmortizationResult {
        principal,
        annual_rate,
        term_years,
        monthly_payment: to_cents(payment),
        total_paid: to_cents(total),
        total_interest: to_cents(total - principal),
    }
}
