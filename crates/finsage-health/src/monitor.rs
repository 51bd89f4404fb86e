// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider health tracking.
//!
//! One entry per provider in a sharded concurrent map, so updates to one
//! provider never serialize against updates to another. All score
//! arithmetic is deterministic; methods taking an explicit `now` exist so
//! cooldown behavior can be tested without sleeping.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use finsage_config::model::HealthConfig;
use finsage_core::ProviderErrorKind;
use serde::Serialize;
use tracing::{debug, warn};

/// Upper bound of the health score range.
pub const MAX_HEALTH_SCORE: f64 = 100.0;

/// Score regained by one successful call.
const RECOVERY_STEP: f64 = 10.0;

/// Score lost per failure, scaled by severity. Auth failures score worst:
/// they will not heal without operator action.
fn penalty(kind: ProviderErrorKind) -> f64 {
    match kind {
        ProviderErrorKind::Auth => 30.0,
        ProviderErrorKind::Timeout => 20.0,
        ProviderErrorKind::RateLimit => 15.0,
        ProviderErrorKind::Generic => 10.0,
    }
}

/// Mutable per-provider state. Lives inside the map, guarded by its shard.
#[derive(Debug)]
struct ProviderHealth {
    health_score: f64,
    consecutive_failures: u32,
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
    rate_limit_until: Option<Instant>,
    /// Consecutive rate-limit hits; drives cooldown escalation.
    rate_limit_streak: u32,
}

impl ProviderHealth {
    fn new() -> Self {
        Self {
            health_score: MAX_HEALTH_SCORE,
            consecutive_failures: 0,
            last_success_at: None,
            last_failure_at: None,
            rate_limit_until: None,
            rate_limit_streak: 0,
        }
    }
}

/// Read-only snapshot of one provider's health, for audit and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderHealthMetrics {
    pub provider: String,
    pub health_score: f64,
    pub consecutive_failures: u32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
    /// Remaining cooldown, if the provider is currently rate-limited.
    pub cooldown_remaining_ms: Option<u64>,
}

/// Process-wide, concurrently updated reliability table per provider.
///
/// Construct one per process and share it behind an `Arc`; tests construct
/// isolated instances instead of touching shared global state.
#[derive(Debug)]
pub struct ProviderHealthMonitor {
    entries: DashMap<String, ProviderHealth>,
    healthy_threshold: f64,
    cooldown_base: Duration,
    cooldown_cap: Duration,
}

impl ProviderHealthMonitor {
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            entries: DashMap::new(),
            healthy_threshold: config.healthy_threshold,
            cooldown_base: Duration::from_secs(config.cooldown_base_secs),
            cooldown_cap: Duration::from_secs(config.cooldown_cap_secs),
        }
    }

    /// Monitor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(&HealthConfig::default())
    }

    /// Record a successful call: failures reset, score recovers one step,
    /// any active cooldown clears.
    pub fn record_success(&self, provider: &str) {
        let mut entry = self
            .entries
            .entry(provider.to_string())
            .or_insert_with(ProviderHealth::new);
        entry.consecutive_failures = 0;
        entry.health_score = (entry.health_score + RECOVERY_STEP).min(MAX_HEALTH_SCORE);
        entry.rate_limit_until = None;
        entry.rate_limit_streak = 0;
        entry.last_success_at = Some(Utc::now());
        debug!(provider, score = entry.health_score, "provider success recorded");
    }

    /// Record a failed call with its classified kind.
    pub fn record_failure(&self, provider: &str, kind: ProviderErrorKind) {
        self.record_failure_at(provider, kind, Instant::now());
    }

    /// [`Self::record_failure`] with an explicit clock, for deterministic tests.
    pub fn record_failure_at(&self, provider: &str, kind: ProviderErrorKind, now: Instant) {
        let mut entry = self
            .entries
            .entry(provider.to_string())
            .or_insert_with(ProviderHealth::new);
        entry.consecutive_failures += 1;
        entry.health_score = (entry.health_score - penalty(kind)).max(0.0);
        entry.last_failure_at = Some(Utc::now());

        if kind == ProviderErrorKind::RateLimit {
            entry.rate_limit_streak += 1;
            let backoff = self
                .cooldown_base
                .saturating_mul(1u32 << (entry.rate_limit_streak - 1).min(10))
                .min(self.cooldown_cap);
            entry.rate_limit_until = Some(now + backoff);
            warn!(
                provider,
                streak = entry.rate_limit_streak,
                backoff_secs = backoff.as_secs(),
                "provider rate limited, cooling down"
            );
        } else {
            warn!(
                provider,
                %kind,
                failures = entry.consecutive_failures,
                score = entry.health_score,
                "provider failure recorded"
            );
        }
    }

    /// Whether the provider is above the health threshold and outside any
    /// rate-limit cooldown. Unknown providers are presumed healthy.
    pub fn is_healthy(&self, provider: &str) -> bool {
        self.is_healthy_at(provider, Instant::now())
    }

    /// [`Self::is_healthy`] with an explicit clock.
    pub fn is_healthy_at(&self, provider: &str, now: Instant) -> bool {
        match self.entries.get(provider) {
            Some(entry) => {
                entry.health_score > self.healthy_threshold
                    && !in_cooldown(entry.rate_limit_until, now)
            }
            None => true,
        }
    }

    /// Whether the provider is inside an active rate-limit cooldown.
    pub fn in_cooldown(&self, provider: &str) -> bool {
        self.in_cooldown_at(provider, Instant::now())
    }

    /// [`Self::in_cooldown`] with an explicit clock. O(1).
    pub fn in_cooldown_at(&self, provider: &str, now: Instant) -> bool {
        self.entries
            .get(provider)
            .is_some_and(|entry| in_cooldown(entry.rate_limit_until, now))
    }

    /// Current health score, used only to order candidates. Unknown
    /// providers score the maximum.
    pub fn health_score(&self, provider: &str) -> f64 {
        self.entries
            .get(provider)
            .map(|entry| entry.health_score)
            .unwrap_or(MAX_HEALTH_SCORE)
    }

    /// Snapshot one provider's metrics, if it has been seen.
    pub fn snapshot(&self, provider: &str) -> Option<ProviderHealthMetrics> {
        self.snapshot_at(provider, Instant::now())
    }

    fn snapshot_at(&self, provider: &str, now: Instant) -> Option<ProviderHealthMetrics> {
        self.entries.get(provider).map(|entry| ProviderHealthMetrics {
            provider: provider.to_string(),
            health_score: entry.health_score,
            consecutive_failures: entry.consecutive_failures,
            last_success_at: entry.last_success_at,
            last_failure_at: entry.last_failure_at,
            cooldown_remaining_ms: entry.rate_limit_until.and_then(|until| {
                until
                    .checked_duration_since(now)
                    .map(|d| d.as_millis() as u64)
            }),
        })
    }

    /// Snapshot every tracked provider.
    pub fn snapshot_all(&self) -> Vec<ProviderHealthMetrics> {
        let now = Instant::now();
        let mut all: Vec<ProviderHealthMetrics> = self
            .entries
            .iter()
            .filter_map(|entry| self.snapshot_at(entry.key(), now))
            .collect();
        all.sort_by(|a, b| a.provider.cmp(&b.provider));
        all
    }
}

fn in_cooldown(rate_limit_until: Option<Instant>, now: Instant) -> bool {
    rate_limit_until.is_some_and(|until| now < until)
}
