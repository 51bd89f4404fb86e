// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Finsage orchestration engine.
//!
//! Entry point for one query: classify it, decide whether to clarify or
//! answer, run deterministic solvers, and walk a health-ordered provider
//! fallback chain until a response is obtained or the chain is exhausted.
//! Raw provider errors never escape [`Orchestrator::handle`]; every terminal
//! outcome is an [`OrchestrationResult`].

mod assemble;
mod invoke;
mod orchestrator;
mod result;

pub use orchestrator::Orchestrator;
pub use result::{
    ChatMode, OrchestrationResult, OrchestratorRequest, ResponseMetadata, ResponseType,
};
