//! Stack of currently open timing sections.

use std::time::Duration;

use crate::diagnostics::unbalanced_message;
use crate::pal::Platform;

/// Identifies one `open()` of a section, unique within its stack.
///
/// Frames removed by a mismatched close or by [`SectionStack::force_close()`] can be told
/// apart from later frames that happen to reuse the same name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FrameId(u64);

/// A section that has been opened but not yet closed.
#[derive(Debug)]
struct OpenSection {
    id: FrameId,
    name: String,

    // Number of sections already open when this one was opened. Informational only.
    depth: usize,

    start_wall: Duration,
    start_cpu: Duration,
}

/// A balanced close, ready to be folded into the collated statistics.
#[derive(Debug, PartialEq)]
pub(crate) struct ClosedSection {
    pub(crate) name: String,

    /// Seconds of processor time spent inside the section.
    pub(crate) elapsed_cpu: f64,

    /// Seconds of wall-clock time spent inside the section.
    pub(crate) elapsed_wall: f64,
}

/// A close that did not match the top of the stack. Its measurement is discarded.
#[derive(Debug, PartialEq)]
pub(crate) struct Unbalanced {
    /// The section that was on top of the stack, if any.
    pub(crate) opened: Option<String>,
    pub(crate) closed: String,
}

impl Unbalanced {
    pub(crate) fn message(&self) -> String {
        unbalanced_message(self.opened.as_deref(), &self.closed)
    }
}

/// Strict LIFO stack of open sections.
///
/// A close must name the section on top of the stack. If it does not, the top frame is
/// still removed but the measurement is discarded and the mismatch is returned to the
/// caller for reporting.
#[derive(Debug, Default)]
pub(crate) struct SectionStack {
    frames: Vec<OpenSection>,
    next_id: u64,
}

impl SectionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&mut self, name: String, platform: &impl Platform) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let depth = self.frames.len();

        self.frames.push(OpenSection {
            id,
            name,
            depth,
            start_wall: platform.wall_time(),
            start_cpu: platform.cpu_time(),
        });

        id
    }

    /// Pops the top section. Returns the measurement only if the names match.
    pub(crate) fn close(
        &mut self,
        name: &str,
        platform: &impl Platform,
    ) -> Result<ClosedSection, Unbalanced> {
        let Some(open) = self.frames.pop() else {
            return Err(Unbalanced {
                opened: None,
                closed: name.to_string(),
            });
        };

        if open.name != name {
            return Err(Unbalanced {
                opened: Some(open.name),
                closed: name.to_string(),
            });
        }

        let elapsed_cpu = platform.cpu_time().saturating_sub(open.start_cpu);
        let elapsed_wall = platform.wall_time().saturating_sub(open.start_wall);

        tracing::trace!(
            section = %open.name,
            depth = open.depth,
            ?elapsed_wall,
            ?elapsed_cpu,
            "closed section"
        );

        Ok(ClosedSection {
            name: open.name,
            elapsed_cpu: elapsed_cpu.as_secs_f64(),
            elapsed_wall: elapsed_wall.as_secs_f64(),
        })
    }

    /// Whether the frame created by the `open()` that returned `id` is still on the stack.
    pub(crate) fn contains(&self, id: FrameId) -> bool {
        self.frames.iter().any(|frame| frame.id == id)
    }

    /// Collapses the stack to its bottom-most entry so the root section can still be
    /// closed cleanly. The discarded intermediate sections are never measured.
    ///
    /// Returns the name of the root section, if any section is open.
    pub(crate) fn force_close(&mut self) -> Option<String> {
        if self.frames.len() > 1 {
            tracing::debug!(
                discarded = self.frames.len().saturating_sub(1),
                "collapsing unbalanced sections to the root section"
            );
            self.frames.truncate(1);
        }

        self.frames.first().map(|root| root.name.clone())
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::pal::FakePlatform;

    #[test]
    fn balanced_close_measures_elapsed_time() {
        let platform = FakePlatform::new();
        platform.set_wall_time(Duration::from_millis(10));
        platform.set_cpu_time(Duration::from_millis(4));

        let mut stack = SectionStack::new();
        stack.open("work".to_string(), &platform);
        assert_eq!(stack.depth(), 1);

        platform.advance(Duration::from_millis(250), Duration::from_millis(125));

        let closed = stack.close("work", &platform).unwrap();

        assert_eq!(
            closed,
            ClosedSection {
                name: "work".to_string(),
                elapsed_cpu: 0.125,
                elapsed_wall: 0.25,
            }
        );
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn records_depth_at_push_time() {
        let platform = FakePlatform::new();
        let mut stack = SectionStack::new();

        stack.open("a".to_string(), &platform);
        stack.open("b".to_string(), &platform);
        stack.open("c".to_string(), &platform);

        let depths: Vec<_> = stack.frames.iter().map(|frame| frame.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn mismatched_close_pops_and_reports() {
        let platform = FakePlatform::new();
        let mut stack = SectionStack::new();
        stack.open("X".to_string(), &platform);

        let unbalanced = stack.close("Y", &platform).unwrap_err();

        assert_eq!(
            unbalanced,
            Unbalanced {
                opened: Some("X".to_string()),
                closed: "Y".to_string(),
            }
        );
        assert!(unbalanced.message().contains("'X'"));
        assert!(unbalanced.message().contains("'Y'"));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn close_on_empty_stack_reports() {
        let platform = FakePlatform::new();
        let mut stack = SectionStack::new();

        let unbalanced = stack.close("orphan", &platform).unwrap_err();

        assert_eq!(unbalanced.opened, None);
        assert_eq!(unbalanced.closed, "orphan");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn frame_ids_are_not_reused() {
        let platform = FakePlatform::new();
        let mut stack = SectionStack::new();

        let first = stack.open("-total".to_string(), &platform);
        assert!(stack.contains(first));
        stack.close("-total", &platform).unwrap();
        assert!(!stack.contains(first));

        let second = stack.open("-total".to_string(), &platform);
        assert_ne!(first, second);
        assert!(stack.contains(second));
        assert!(!stack.contains(first));
    }

    #[test]
    fn force_close_keeps_only_root() {
        let platform = FakePlatform::new();
        let mut stack = SectionStack::new();
        let root = stack.open("-total".to_string(), &platform);
        let a = stack.open("a".to_string(), &platform);
        let b = stack.open("b".to_string(), &platform);

        assert_eq!(stack.force_close().as_deref(), Some("-total"));
        assert_eq!(stack.depth(), 1);
        assert!(stack.contains(root));
        assert!(!stack.contains(a));
        assert!(!stack.contains(b));

        assert!(stack.close("-total", &platform).is_ok());
    }

    #[test]
    fn force_close_on_empty_stack() {
        let mut stack = SectionStack::new();

        assert_eq!(stack.force_close(), None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn clock_going_backwards_saturates_to_zero() {
        let platform = FakePlatform::new();
        platform.set_wall_time(Duration::from_secs(5));
        platform.set_cpu_time(Duration::from_secs(5));

        let mut stack = SectionStack::new();
        stack.open("skew".to_string(), &platform);

        platform.set_wall_time(Duration::from_secs(1));
        platform.set_cpu_time(Duration::from_secs(1));

        let closed = stack.close("skew", &platform).unwrap();
        assert!(closed.elapsed_wall.abs() < f64::EPSILON);
        assert!(closed.elapsed_cpu.abs() < f64::EPSILON);
    }
}
