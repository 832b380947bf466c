//! Per-section summaries for local consumers.

use crate::Snapshot;

const MILLIS_PER_SECOND: f64 = 1000.0;

/// Structured summary of a finalized session, one [`ReportSection`] per measured section.
///
/// The report is meant for hosts that want to display or log the timing data locally.
/// It is not transmitted anywhere and building it has no side effects.
///
/// # Examples
///
/// ```
/// use collated_time::Session;
///
/// let session = Session::new();
/// session.open("-total");
/// session.open("parse");
/// session.close("parse");
/// session.close("-total");
///
/// let report = session.to_report();
/// for section in report.sections() {
///     println!(
///         "{}: {} calls, {:.3} ms ({:.1}%)",
///         section.name(),
///         section.calls(),
///         section.elapsed_ms(),
///         section.percent()
///     );
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    sections: Vec<ReportSection>,
    total_elapsed_ms: f64,
}

/// Timing summary for one section in a [`Report`]. Times are in milliseconds.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportSection {
    name: String,
    calls: u64,
    elapsed_ms: f64,
    min_ms: f64,
    max_ms: f64,
    percent: f64,
}

impl Report {
    /// Builds the report from collated data.
    ///
    /// Percentages are relative to the sum of `elapsed` over all sections and are computed
    /// from scratch on every call. If that sum is zero, every percentage is zero.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut sections: Vec<_> = snapshot
            .entries()
            .map(|(name, entry)| ReportSection {
                name: name.to_string(),
                calls: entry.count(),
                elapsed_ms: entry.wall_total() * MILLIS_PER_SECOND,
                min_ms: entry.wall_min() * MILLIS_PER_SECOND,
                max_ms: entry.wall_max() * MILLIS_PER_SECOND,
                percent: 0.0,
            })
            .collect();

        let total_elapsed_ms: f64 = sections.iter().map(|section| section.elapsed_ms).sum();

        if total_elapsed_ms > 0.0 {
            for section in &mut sections {
                section.percent = 100.0 * section.elapsed_ms / total_elapsed_ms;
            }
        }

        Self {
            sections,
            total_elapsed_ms,
        }
    }

    /// The per-section summaries, in the order the sections were first closed.
    pub fn sections(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections.iter()
    }

    /// Sum of `elapsed` over all sections, in milliseconds.
    #[must_use]
    pub fn total_elapsed_ms(&self) -> f64 {
        self.total_elapsed_ms
    }

    /// Whether the report contains no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl ReportSection {
    /// The section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many times the section was closed.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Total wall-clock time spent in the section over all calls.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Shortest wall-clock time of a single call.
    #[must_use]
    pub fn min_ms(&self) -> f64 {
        self.min_ms
    }

    /// Longest wall-clock time of a single call.
    #[must_use]
    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// Share of the report total taken by this section, from 0 to 100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Memory usage is not tracked. Always zero.
    #[must_use]
    #[allow(clippy::unused_self, reason = "reported alongside the tracked fields")]
    pub fn memory(&self) -> u64 {
        0
    }

    /// Profiling overhead is not tracked. Always zero.
    #[must_use]
    #[allow(clippy::unused_self, reason = "reported alongside the tracked fields")]
    pub fn overhead(&self) -> f64 {
        0.0
    }

    /// Time-windowed breakdowns are not tracked. Always empty.
    #[must_use]
    #[allow(clippy::unused_self, reason = "reported alongside the tracked fields")]
    pub fn periods(&self) -> &[f64] {
        &[]
    }
}
