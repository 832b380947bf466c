//! Side channel for reporting instrumentation problems.

use std::fmt::Debug;

/// Channel on which mismatched `open()`/`close()` pairs are reported.
pub const CHANNEL_UNBALANCED: &str = "unbalanced_sections";

/// Receives diagnostics about measurements that were discarded.
///
/// Implementations must not panic and must not block meaningfully. Diagnostics are emitted
/// inline on the thread executing the profiled code.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
///
/// use collated_time::{DiagnosticSink, Session};
///
/// #[derive(Debug, Default)]
/// struct Collect(RefCell<Vec<String>>);
///
/// impl DiagnosticSink for Collect {
///     fn emit(&self, channel: &str, message: &str) {
///         self.0.borrow_mut().push(format!("{channel}: {message}"));
///     }
/// }
///
/// let session = Session::with_diagnostics(Collect::default());
/// session.open("outer");
/// session.close("inner");
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink: Debug {
    /// Records one diagnostic `message` on the named `channel`.
    fn emit(&self, channel: &str, message: &str);
}

/// Emits diagnostics as `tracing` events at the `WARN` level.
///
/// This is the sink used by [`Session::new()`](crate::Session::new).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    #[cfg_attr(test, mutants::skip)] // Nothing observable without installing a subscriber.
    fn emit(&self, channel: &str, message: &str) {
        tracing::warn!(channel, detail = message, "discarded profiling measurement");
    }
}

pub(crate) fn unbalanced_message(opened: Option<&str>, closed: &str) -> String {
    match opened {
        Some(opened) => format!("opened '{opened}' but closed '{closed}'"),
        None => format!("closed '{closed}' with no open section"),
    }
}
