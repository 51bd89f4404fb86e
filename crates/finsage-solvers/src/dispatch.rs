// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex-triggered solver dispatch.
//!
//! Runs after query enrichment (document text merged in). For each solver in
//! the fixed trigger set, attempts parameter extraction from the enriched
//! query text; on success invokes the pure calculation and stores the result
//! under the solver's key. Multiple solvers may fire for one query. No
//! extraction at all yields `None`, which is an empty result, not an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::calc::{
    amortization, corporate_tax, irr, npv, straight_line_depreciation, AmortizationResult,
    CorporateTaxResult, DepreciationResult, IrrResult, NpvResult,
};

/// The fixed set of deterministic solvers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    CorporateTax,
    Npv,
    Irr,
    Depreciation,
    Amortization,
}

/// Every solver, in dispatch order.
pub const ALL_SOLVERS: &[SolverKind] = &[
    SolverKind::CorporateTax,
    SolverKind::Npv,
    SolverKind::Irr,
    SolverKind::Depreciation,
    SolverKind::Amortization,
];

/// Results of all solvers that fired for one query, keyed by solver name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corporate_tax: Option<CorporateTaxResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npv: Option<NpvResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr: Option<IrrResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<DepreciationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amortization: Option<AmortizationResult>,
}

impl CalculationResults {
    pub fn is_empty(&self) -> bool {
        self.corporate_tax.is_none()
            && self.npv.is_none()
            && self.irr.is_none()
            && self.depreciation.is_none()
            && self.amortization.is_none()
    }

    /// The solvers that produced a result.
    pub fn fired(&self) -> Vec<SolverKind> {
        let mut fired = Vec::new();
        if self.corporate_tax.is_some() {
            fired.push(SolverKind::CorporateTax);
        }
        if self.npv.is_some() {
            fired.push(SolverKind::Npv);
        }
        if self.irr.is_some() {
            fired.push(SolverKind::Irr);
        }
        if self.depreciation.is_some() {
            fired.push(SolverKind::Depreciation);
        }
        if self.amortization.is_some() {
            fired.push(SolverKind::Amortization);
        }
        fired
    }
}

static MONEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s*([0-9][0-9,]*(?:\.[0-9]+)?)").unwrap());
static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*%").unwrap());
static RATE_PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rate\s*(?:of|is|:|at)?\s*([0-9]+(?:\.[0-9]+)?)\s*%").unwrap()
});
static YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:over|for|across)\s+([0-9]{1,3})\s*(?:years?|yrs?)|([0-9]{1,3})\s*[-\s]year")
        .unwrap()
});
static SALVAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"salvage\s+(?:value\s+)?(?:of\s+)?\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)").unwrap()
});
static INCOME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:income|profits?|earnings)\s*(?:of|is|:|at)?\s*\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)")
        .unwrap()
});
static CASH_FLOW_LEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cash\s?flows?(?:\s+of)?").unwrap());
static SIGNED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?)\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)(%?)").unwrap()
});
static INVESTMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"invest(?:ment|ing|s)?\s*(?:of)?\s*\$?\s*([0-9][0-9,]*(?:\.[0-9]+)?)").unwrap()
});

/// Parse a number that may carry thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// First dollar amount in the text, if any.
fn first_money(lower: &str) -> Option<f64> {
    MONEY
        .captures(lower)
        .and_then(|c| parse_number(&c[1]))
}

/// First percentage in the text, preferring one attached to the word "rate".
fn best_rate(lower: &str) -> Option<f64> {
    RATE_PERCENT
        .captures(lower)
        .or_else(|| PERCENT.captures(lower))
        .and_then(|c| parse_number(&c[1]))
        .map(|p| p / 100.0)
}

/// A year count phrased as "over N years" or "N-year".
fn term_years(lower: &str) -> Option<u32> {
    YEARS.captures(lower).and_then(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    })
}

/// Numeric series following a "cash flows" phrase, excluding percentages.
/// An "investment of N" amount is prepended as the negative t=0 flow when
/// the series itself contains no negative entry.
fn cash_flow_series(lower: &str) -> Vec<f64> {
    let Some(lead) = CASH_FLOW_LEAD.find(lower) else {
        return Vec::new();
    };
    let tail = &lower[lead.end()..];

    let mut flows: Vec<f64> = SIGNED_NUMBER
        .captures_iter(tail)
        .filter(|c| c[3].is_empty()) // a trailing % marks a rate, not a flow
        .filter_map(|c| {
            parse_number(&c[2]).map(|n| if &c[1] == "-" { -n } else { n })
        })
        .collect();

    if !flows.is_empty() && !flows.iter().any(|f| *f < 0.0)
        && let Some(invest) = INVESTMENT
            .captures(lower)
            .and_then(|c| parse_number(&c[1]))
    {
        flows.insert(0, -invest);
    }

    flows
}

/// Attempt every solver trigger against the enriched query text.
///
/// Returns `None` when no solver fired at all.
pub fn run_solvers(enriched_query: &str) -> Option<CalculationResults> {
    let lower = enriched_query.to_lowercase();
    let mut results = CalculationResults::default();

    if lower.contains("corporate tax") || lower.contains("corporation tax") {
        let income = INCOME
            .captures(&lower)
            .and_then(|c| parse_number(&c[1]))
            .or_else(|| first_money(&lower));
        if let Some(income) = income {
            results.corporate_tax = Some(corporate_tax(income, best_rate(&lower)));
        }
    }

    if lower.contains("npv") || lower.contains("net present value") {
        let flows = cash_flow_series(&lower);
        if let (Some(rate), false) = (best_rate(&lower), flows.is_empty()) {
            results.npv = Some(npv(rate, &flows));
        }
    }

    if lower.contains("irr") || lower.contains("internal rate of return") {
        let flows = cash_flow_series(&lower);
        // irr() itself rejects series without a sign change.
        results.irr = irr(&flows);
    }

    if lower.contains("depreciat") {
        let cost = first_money(&lower);
        let life = term_years(&lower);
        if let (Some(cost), Some(life)) = (cost, life) {
            let salvage = SALVAGE
                .captures(&lower)
                .and_then(|c| parse_number(&c[1]))
                .unwrap_or(0.0);
            results.depreciation = Some(straight_line_depreciation(cost, salvage, life));
        }
    }

    if lower.contains("amortiz") || lower.contains("mortgage") || lower.contains("loan payment") {
        let principal = first_money(&lower);
        let rate = best_rate(&lower);
        let term = term_years(&lower);
        if let (Some(principal), Some(rate), Some(term)) = (principal, rate, term) {
            results.amortization = Some(amortization(principal, rate, term));
        }
    }

    if results.is_empty() {
        None
    } else {
        debug!(fired = ?results.fired(), "solvers fired");
        Some(results)
    }
}
