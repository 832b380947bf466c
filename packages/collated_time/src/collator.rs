//! Collation of repeated section measurements.

use foldhash::{HashMap, HashMapExt};

use crate::RunningStat;

/// Timing data collated for one section.
///
/// Most sections are hit exactly once per request, so the first sample is kept as plain
/// values. The second sample promotes the entry to a pair of [`RunningStat`] accumulators,
/// after which memory use stays constant no matter how often the section is hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entry {
    count: u64,
    timings: Timings,
}

/// The representation of an [`Entry`], depending on how many samples it has.
///
/// All values are in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Timings {
    /// The section has been measured exactly once.
    Single {
        /// Processor time of the only sample.
        cpu: f64,

        /// Wall-clock time of the only sample.
        wall: f64,
    },

    /// The section has been measured more than once.
    Running {
        /// Statistics over the processor time samples.
        cpu: RunningStat,

        /// Statistics over the wall-clock time samples.
        wall: RunningStat,
    },
}

impl Entry {
    fn single(cpu: f64, wall: f64) -> Self {
        Self {
            count: 1,
            timings: Timings::Single { cpu, wall },
        }
    }

    fn push(&mut self, cpu: f64, wall: f64) {
        match &mut self.timings {
            Timings::Single {
                cpu: first_cpu,
                wall: first_wall,
            } => {
                let mut cpu_stat = RunningStat::new();
                cpu_stat.push(*first_cpu);
                cpu_stat.push(cpu);

                let mut wall_stat = RunningStat::new();
                wall_stat.push(*first_wall);
                wall_stat.push(wall);

                self.timings = Timings::Running {
                    cpu: cpu_stat,
                    wall: wall_stat,
                };
            }
            Timings::Running {
                cpu: cpu_stat,
                wall: wall_stat,
            } => {
                cpu_stat.push(cpu);
                wall_stat.push(wall);
            }
        }

        self.count = self.count.saturating_add(1);
    }

    /// Number of balanced closes recorded for the section.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The raw or accumulated timing data.
    #[must_use]
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Mean wall-clock seconds per close.
    #[must_use]
    pub fn wall_mean(&self) -> f64 {
        match &self.timings {
            Timings::Single { wall, .. } => *wall,
            Timings::Running { wall, .. } => wall.mean(),
        }
    }

    /// Shortest wall-clock time of any close, in seconds.
    #[must_use]
    pub fn wall_min(&self) -> f64 {
        match &self.timings {
            Timings::Single { wall, .. } => *wall,
            Timings::Running { wall, .. } => wall.min(),
        }
    }

    /// Longest wall-clock time of any close, in seconds.
    #[must_use]
    pub fn wall_max(&self) -> f64 {
        match &self.timings {
            Timings::Single { wall, .. } => *wall,
            Timings::Running { wall, .. } => wall.max(),
        }
    }

    /// Sum of wall-clock time over all closes, in seconds.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "close counts beyond 2^53 are not realistic for a single request"
    )]
    pub fn wall_total(&self) -> f64 {
        self.wall_mean() * self.count as f64
    }

    /// Mean processor seconds per close.
    #[must_use]
    pub fn cpu_mean(&self) -> f64 {
        match &self.timings {
            Timings::Single { cpu, .. } => *cpu,
            Timings::Running { cpu, .. } => cpu.mean(),
        }
    }
}

/// Maps section names to collated timing data, remembering first-seen order.
#[derive(Debug, Default)]
pub(crate) struct Collator {
    index: HashMap<String, usize>,
    entries: Vec<(String, Entry)>,
}

impl Collator {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, name: String, elapsed_cpu: f64, elapsed_wall: f64) {
        if let Some(entry) = self
            .index
            .get(&name)
            .and_then(|&position| self.entries.get_mut(position))
        {
            entry.1.push(elapsed_cpu, elapsed_wall);
            return;
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries
            .push((name, Entry::single(elapsed_cpu, elapsed_wall)));
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            entries: self.entries.clone(),
        }
    }
}

/// Read-only copy of the collated data of a finalized [`Session`](crate::Session).
///
/// Entries are in the order in which their sections were first closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, Entry)>,
}

impl Snapshot {
    /// Iterates over section names and their collated data in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Looks up the collated data of one section.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, entry)| entry)
    }

    /// Number of distinct sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no section has been measured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
