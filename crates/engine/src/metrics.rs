// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prometheus text-exposition-format metrics. No HTTP listener is bound
//! here — `render_prometheus_text` is a pure function an external server
//! would call from its own `/metrics` handler.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Default histogram bucket upper bounds (seconds), matching Prometheus's
/// own client library defaults.
pub const DEFAULT_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

#[derive(Default)]
struct Histogram {
    buckets: Vec<(f64, u64)>,
    sum: f64,
    count: u64,
}

impl Histogram {
    fn new(bounds: &[f64]) -> Self {
        Self { buckets: bounds.iter().map(|b| (*b, 0)).collect(), sum: 0.0, count: 0 }
    }

    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        for (bound, count) in self.buckets.iter_mut() {
            if value <= *bound {
                *count += 1;
            }
        }
    }
}

/// Process-wide counters, gauges, and histograms the dispatcher updates as
/// it runs, and an external exporter reads via [`MetricsRegistry::render_prometheus_text`].
#[derive(Default)]
pub struct MetricsRegistry {
    counters: Mutex<HashMap<(&'static str, Vec<(&'static str, String)>), u64>>,
    gauges: Mutex<HashMap<&'static str, f64>>,
    histograms: Mutex<HashMap<&'static str, Histogram>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr_counter(&self, name: &'static str, labels: &[(&'static str, &str)]) {
        let key = (name, labels.iter().map(|(k, v)| (*k, v.to_string())).collect());
        *self.counters.lock().entry(key).or_insert(0) += 1;
    }

    pub fn set_gauge(&self, name: &'static str, value: f64) {
        self.gauges.lock().insert(name, value);
    }

    pub fn observe_duration(&self, name: &'static str, seconds: f64) {
        self.histograms
            .lock()
            .entry(name)
            .or_insert_with(|| Histogram::new(DEFAULT_BUCKETS))
            .observe(seconds);
    }

    /// Renders every recorded metric in Prometheus text exposition format.
    pub fn render_prometheus_text(&self) -> String {
        let mut out = String::new();

        let counters = self.counters.lock();
        let mut counter_names: Vec<_> = counters.keys().map(|(name, _)| *name).collect();
        counter_names.sort_unstable();
        counter_names.dedup();
        for name in counter_names {
            let _ = writeln!(out, "# TYPE {name} counter");
            let mut entries: Vec<_> = counters.iter().filter(|((n, _), _)| *n == name).collect();
            entries.sort_by(|a, b| format!("{:?}", a.0 .1).cmp(&format!("{:?}", b.0 .1)));
            for ((_, labels), value) in entries {
                let _ = writeln!(out, "{name}{} {value}", render_labels(labels));
            }
        }

        let gauges = self.gauges.lock();
        let mut gauge_names: Vec<_> = gauges.keys().copied().collect();
        gauge_names.sort_unstable();
        for name in gauge_names {
            let _ = writeln!(out, "# TYPE {name} gauge");
            let _ = writeln!(out, "{name} {}", gauges[name]);
        }

        let histograms = self.histograms.lock();
        let mut hist_names: Vec<_> = histograms.keys().copied().collect();
        hist_names.sort_unstable();
        for name in hist_names {
            let h = &histograms[name];
            let _ = writeln!(out, "# TYPE {name} histogram");
            for (bound, count) in &h.buckets {
                let _ = writeln!(out, "{name}_bucket{{le=\"{bound}\"}} {count}");
            }
            let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {}", h.count);
            let _ = writeln!(out, "{name}_sum {}", h.sum);
            let _ = writeln!(out, "{name}_count {}", h.count);
        }

        out
    }
}

fn render_labels(labels: &[(&'static str, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let body = labels.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect::<Vec<_>>().join(",");
    format!("{{{body}}}")
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
