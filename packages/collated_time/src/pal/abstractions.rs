//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::io;
use std::time::Duration;

use crate::AggregatorAddress;

/// Provides the time sources that section timing is based on.
pub(crate) trait Platform: Debug + 'static {
    /// Monotonic wall-clock time since an arbitrary fixed origin.
    fn wall_time(&self) -> Duration;

    /// Processor time consumed by the current thread.
    ///
    /// This is thread time rather than whole-process time: a session is owned by one thread,
    /// so time other threads spend concurrently is not attributed to its sections.
    ///
    /// Returns zero if the platform cannot report processor time.
    fn cpu_time(&self) -> Duration;
}

/// Creates connected datagram transports.
///
/// Connecting is the capability check for the whole transmission: if it fails,
/// nothing is encoded or sent.
pub(crate) trait Network: Debug + Send + Sync + 'static {
    type Transport: Transport;

    fn connect(&self, address: &AggregatorAddress) -> io::Result<Self::Transport>;
}

/// A connected, unreliable datagram transport.
///
/// The underlying resource is released when the transport is dropped.
pub(crate) trait Transport: Debug {
    /// Sends one datagram. Delivery is not guaranteed even if this succeeds.
    fn send(&mut self, frame: &[u8]) -> io::Result<usize>;
}
