// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic financial calculations and solver dispatch.
//!
//! The calculations in [`calc`] are pure functions with bounded iteration;
//! [`dispatch`] triggers them from regex parameter extraction over enriched
//! query text. Nothing here performs I/O or can fail a request: a query that
//! matches no solver simply produces no calculation results.

pub mod calc;
pub mod dispatch;

pub use calc::{
    amortization, corporate_tax, irr, npv, straight_line_depreciation, AmortizationResult,
    CorporateTaxResult, DepreciationResult, IrrResult, NpvResult,
};
pub use dispatch::{run_solvers, CalculationResults, SolverKind, ALL_SOLVERS};
