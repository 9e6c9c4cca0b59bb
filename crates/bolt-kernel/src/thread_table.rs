//! A small thread table standing in for the host's thread database.
//!
//! Sizes are stored in centimetres, the host's internal length unit.

use bolt_types::ThreadSpec;

/// Thread family name used by the built-in table.
pub const ISO_METRIC: &str = "ISO Metric profile";

/// Relative tolerance when matching a diameter against a nominal size.
const SIZE_TOLERANCE: f64 = 0.02;

/// One row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadEntry {
    pub designation: String,
    pub nominal_diameter: f64,
    pub pitch: f64,
}

/// Table of thread sizes for a single thread family.
#[derive(Debug, Clone)]
pub struct ThreadTable {
    thread_type: String,
    entries: Vec<ThreadEntry>,
}

impl ThreadTable {
    /// ISO metric coarse series, M1.6 through M24.
    pub fn iso_metric_coarse() -> Self {
        // (nominal mm, pitch mm)
        let rows: [(f64, f64); 13] = [
            (1.6, 0.35),
            (2.0, 0.4),
            (2.5, 0.45),
            (3.0, 0.5),
            (4.0, 0.7),
            (5.0, 0.8),
            (6.0, 1.0),
            (8.0, 1.25),
            (10.0, 1.5),
            (12.0, 1.75),
            (16.0, 2.0),
            (20.0, 2.5),
            (24.0, 3.0),
        ];
        let entries = rows
            .iter()
            .map(|&(d, p)| ThreadEntry {
                designation: format!("M{}x{}", d, p),
                nominal_diameter: d / 10.0,
                pitch: p / 10.0,
            })
            .collect();
        Self {
            thread_type: ISO_METRIC.to_string(),
            entries,
        }
    }

    /// A table with no sizes. Every query misses.
    pub fn empty() -> Self {
        Self {
            thread_type: ISO_METRIC.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn thread_type(&self) -> &str {
        &self.thread_type
    }

    /// Find the size whose nominal diameter matches `diameter`.
    pub fn lookup(&self, diameter: f64, is_internal: bool, thread_type: &str) -> Option<ThreadSpec> {
        if thread_type != self.thread_type || !diameter.is_finite() || diameter <= 0.0 {
            return None;
        }
        self.entries
            .iter()
            .filter(|e| (e.nominal_diameter - diameter).abs() <= e.nominal_diameter * SIZE_TOLERANCE)
            .min_by(|a, b| {
                let da = (a.nominal_diameter - diameter).abs();
                let db = (b.nominal_diameter - diameter).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| ThreadSpec {
                thread_type: self.thread_type.clone(),
                designation: e.designation.clone(),
                class: if is_internal { "6H" } else { "6g" }.to_string(),
                nominal_diameter: e.nominal_diameter,
                pitch: e.pitch,
                is_internal,
            })
    }
}

impl Default for ThreadTable {
    fn default() -> Self {
        Self::iso_metric_coarse()
    }
}
