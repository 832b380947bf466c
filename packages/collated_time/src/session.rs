use std::cell::RefCell;
use std::marker::PhantomData;

use crate::collator::Collator;
use crate::pal::PlatformFacade;
use crate::diagnostics::CHANNEL_UNBALANCED;
use crate::section_stack::{FrameId, SectionStack};
use crate::{Delivery, DiagnosticSink, Report, Snapshot, TracingDiagnostics, Transmitter};

/// Timing state of one request: the stack of open sections and the collated data of
/// closed ones.
///
/// A session is owned by the thread executing the profiled code for its entire lifetime.
/// Independent sessions share no state, so concurrent requests each get their own.
///
/// Nothing a session does can fail. Mismatched closes are dropped and reported through the
/// [`DiagnosticSink`], unbalanced opens are discarded when the session is finalized and
/// transmission problems are silently absorbed.
///
/// # Examples
///
/// ```
/// use collated_time::Session;
///
/// let session = Session::new();
///
/// session.open("-total");
/// for _ in 0..3 {
///     let _section = session.section("render_row");
///     // Work being timed.
/// }
/// session.close("-total");
///
/// let snapshot = session.finalize();
/// assert_eq!(snapshot.get("render_row").unwrap().count(), 3);
/// assert_eq!(snapshot.get("-total").unwrap().count(), 1);
/// ```
#[derive(Debug)]
pub struct Session {
    state: RefCell<State>,
    platform: PlatformFacade,
    diagnostics: Box<dyn DiagnosticSink>,

    _single_threaded: PhantomData<*const ()>,
}

#[derive(Debug)]
struct State {
    stack: SectionStack,
    collator: Collator,
}

impl Session {
    /// Creates a session that reports discarded measurements as `tracing` events.
    #[expect(
        clippy::new_without_default,
        reason = "each session is a distinct measurement scope, not a default value"
    )]
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(TracingDiagnostics)
    }

    /// Creates a session that reports discarded measurements to `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(diagnostics: impl DiagnosticSink + 'static) -> Self {
        Self::with_parts(PlatformFacade::real(), Box::new(diagnostics))
    }

    #[cfg(test)]
    pub(crate) fn with_platform(
        platform: PlatformFacade,
        diagnostics: impl DiagnosticSink + 'static,
    ) -> Self {
        Self::with_parts(platform, Box::new(diagnostics))
    }

    fn with_parts(platform: PlatformFacade, diagnostics: Box<dyn DiagnosticSink>) -> Self {
        Self {
            state: RefCell::new(State {
                stack: SectionStack::new(),
                collator: Collator::new(),
            }),
            platform,
            diagnostics,
            _single_threaded: PhantomData,
        }
    }

    /// Starts timing a section. Sections may nest arbitrarily deep.
    pub fn open(&self, name: impl Into<String>) {
        self.state
            .borrow_mut()
            .stack
            .open(name.into(), &self.platform);
    }

    /// Stops timing the most recently opened section.
    ///
    /// `name` must match the name the section was opened with. If it does not, the
    /// section is still removed from the stack but its measurement is discarded and a
    /// diagnostic naming both sections is emitted.
    pub fn close(&self, name: &str) {
        let unbalanced = {
            let mut state = self.state.borrow_mut();

            match state.stack.close(name, &self.platform) {
                Ok(closed) => {
                    state
                        .collator
                        .record(closed.name, closed.elapsed_cpu, closed.elapsed_wall);
                    return;
                }
                Err(unbalanced) => unbalanced,
            }
        };

        // The sink may call back into this session, so the state must not be borrowed here.
        self.diagnostics.emit(CHANNEL_UNBALANCED, &unbalanced.message());
    }

    // Closes the frame a guard opened, unless finalize or a mismatched close already
    // removed it. Those cases were accounted for when the frame was removed.
    fn close_frame(&self, name: &str, id: FrameId) {
        if !self.state.borrow().stack.contains(id) {
            return;
        }

        self.close(name);
    }

    /// Opens a section that is closed when the returned guard is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use collated_time::Session;
    ///
    /// let session = Session::new();
    /// {
    ///     let _outer = session.section("outer");
    ///     let _inner = session.section("inner");
    /// } // Closes "inner", then "outer".
    ///
    /// assert_eq!(session.finalize().len(), 2);
    /// ```
    pub fn section(&self, name: impl Into<String>) -> Section<'_> {
        let name = name.into();
        let id = self
            .state
            .borrow_mut()
            .stack
            .open(name.clone(), &self.platform);

        Section {
            session: self,
            name,
            id,
        }
    }

    /// Number of sections currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.borrow().stack.depth()
    }

    /// Closes whatever is still open and returns the collated data.
    ///
    /// If more than one section is still open, everything above the bottom-most (root)
    /// section is discarded without being measured, then the root section is closed.
    /// Calling this again only takes a new snapshot.
    ///
    /// Guards from [`section()`](Self::section) whose sections were closed or discarded
    /// here do nothing when they are dropped later.
    #[must_use]
    pub fn finalize(&self) -> Snapshot {
        let root = self.state.borrow_mut().stack.force_close();

        if let Some(root) = root {
            self.close(&root);
        }

        self.state.borrow().collator.snapshot()
    }

    /// Finalizes the session and summarizes each section.
    #[must_use]
    pub fn to_report(&self) -> Report {
        Report::from_snapshot(&self.finalize())
    }

    /// Finalizes the session and sends the collated data to the aggregator.
    ///
    /// Never fails. See [`Transmitter::transmit()`].
    pub fn transmit(&self, transmitter: &Transmitter) -> Delivery {
        transmitter.transmit(&self.finalize())
    }
}

/// A section of a [`Session`] that is open until this guard is dropped.
///
/// Created by [`Session::section()`].
#[derive(Debug)]
#[must_use = "The section is closed when the guard is dropped"]
pub struct Section<'a> {
    session: &'a Session,
    name: String,
    id: FrameId,
}

impl Section<'_> {
    /// The name the section was opened with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        self.session.close_frame(&self.name, self.id);
    }
}
