//! Route comparison across travel modes.
//!
//! Aggregates per-mode fetch outcomes into one comparison set with derived
//! sortable fields, and decides whether the comparison succeeded, partly
//! failed, or failed outright.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::{RouteSummary, TravelMode};

use super::error::{CompareError, ModeFailure};
use super::fetch::FetchResults;

/// One successful mode in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    #[serde(flatten)]
    pub summary: RouteSummary,

    /// Position of this mode in the request.
    pub request_index: usize,

    /// Duration in whole minutes, rounded half away from zero.
    pub duration_minutes: u64,

    /// Distance in kilometers, rounded to one decimal.
    pub distance_km: f64,

    /// Fare amount, or 0 when no fare was quoted.
    pub cost_yen: f64,

    pub step_count: usize,

    /// Whether any step rides public transport. A transit request can
    /// come back as a walk when the stops are close.
    pub uses_transit: bool,

    pub label: &'static str,
    pub icon: &'static str,
}

impl ComparisonEntry {
    fn new(summary: RouteSummary, request_index: usize) -> Self {
        let mode = summary.mode;
        Self {
            request_index,
            duration_minutes: minutes(summary.duration_seconds),
            distance_km: kilometers(summary.distance_meters),
            cost_yen: summary.fare.as_ref().map_or(0.0, |fare| fare.amount),
            step_count: summary.step_count(),
            uses_transit: summary.uses_transit(),
            label: mode.label(),
            icon: mode.icon(),
            summary,
        }
    }

    pub fn mode(&self) -> TravelMode {
        self.summary.mode
    }
}

fn minutes(seconds: u64) -> u64 {
    (seconds as f64 / 60.0).round() as u64
}

fn kilometers(meters: u64) -> f64 {
    (meters as f64 / 100.0).round() / 10.0
}

/// Modes that failed while others succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialFailure {
    pub failures: Vec<ModeFailure>,
}

impl PartialFailure {
    pub fn failed_modes(&self) -> Vec<TravelMode> {
        self.failures.iter().map(|f| f.mode).collect()
    }

    /// Localized warning naming the failed modes.
    pub fn message(&self) -> String {
        let labels: Vec<_> = self.failures.iter().map(|f| f.mode.label()).collect();
        format!(
            "一部の移動手段で経路が見つかりませんでした: {}",
            labels.join("、")
        )
    }
}

/// Sort order for comparison entries. All sorts are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    RequestOrder,
    Duration,
    Distance,
    Cost,
}

/// Routes for every mode that succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub entries: Vec<ComparisonEntry>,
    pub partial_failure: Option<PartialFailure>,
}

impl Comparison {
    /// Re-order entries by `key`. Ties keep their current relative order.
    pub fn sort_by(&mut self, key: SortKey) {
        self.entries.sort_by(|a, b| compare_entries(a, b, key));
    }

    /// Consume and return the comparison sorted by `key`.
    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort_by(key);
        self
    }

    /// Entry for one mode, if it succeeded.
    pub fn get(&self, mode: TravelMode) -> Option<&ComparisonEntry> {
        self.entries.iter().find(|e| e.mode() == mode)
    }

    /// The fastest route.
    pub fn fastest(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .min_by(|a, b| compare_entries(a, b, SortKey::Duration))
    }
}

fn compare_entries(a: &ComparisonEntry, b: &ComparisonEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::RequestOrder => a.request_index.cmp(&b.request_index),
        SortKey::Duration => a.summary.duration_seconds.cmp(&b.summary.duration_seconds),
        SortKey::Distance => a.summary.distance_meters.cmp(&b.summary.distance_meters),
        SortKey::Cost => a.cost_yen.total_cmp(&b.cost_yen),
    }
}

/// Build the comparison from per-mode outcomes.
///
/// Entries keep request order. Fails when nothing was requested or when
/// every requested mode failed.
pub fn compare(results: &FetchResults) -> Result<Comparison, CompareError> {
    if results.is_empty() {
        return Err(CompareError::NoModesRequested);
    }

    let entries: Vec<ComparisonEntry> = results
        .iter()
        .enumerate()
        .filter_map(|(index, result)| {
            result
                .outcome
                .as_ref()
                .ok()
                .map(|summary| ComparisonEntry::new(summary.clone(), index))
        })
        .collect();

    let failures = results.failures();

    if entries.is_empty() {
        return Err(CompareError::AllModesFailed { failures });
    }

    let partial_failure = (!failures.is_empty()).then_some(PartialFailure { failures });

    Ok(Comparison {
        entries,
        partial_failure,
    })
}
