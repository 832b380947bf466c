//! Fake platform implementation for testing.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::AggregatorAddress;
use crate::pal::abstractions::{Network, Platform, Transport};

const ERR_POISONED_FAKE: &str = "fake platform state lock should not be poisoned";

#[derive(Debug)]
struct FakePlatformState {
    wall_time: Duration,
    cpu_time: Duration,
}

/// Fake clocks controlled by the test.
///
/// Clones share the same state, so a test can keep one clone and advance time
/// while the code under test holds another.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                wall_time: Duration::ZERO,
                cpu_time: Duration::ZERO,
            })),
        }
    }

    pub(crate) fn set_wall_time(&self, time: Duration) {
        self.state.lock().expect(ERR_POISONED_FAKE).wall_time = time;
    }

    pub(crate) fn set_cpu_time(&self, time: Duration) {
        self.state.lock().expect(ERR_POISONED_FAKE).cpu_time = time;
    }

    /// Moves both clocks forward.
    pub(crate) fn advance(&self, wall: Duration, cpu: Duration) {
        let mut state = self.state.lock().expect(ERR_POISONED_FAKE);
        state.wall_time = state.wall_time.saturating_add(wall);
        state.cpu_time = state.cpu_time.saturating_add(cpu);
    }
}

impl Platform for FakePlatform {
    fn wall_time(&self) -> Duration {
        self.state.lock().expect(ERR_POISONED_FAKE).wall_time
    }

    fn cpu_time(&self) -> Duration {
        self.state.lock().expect(ERR_POISONED_FAKE).cpu_time
    }
}

#[derive(Debug, Default)]
struct FakeNetworkState {
    unavailable: bool,
    connect_attempts: usize,
    open_transports: usize,
    frames: Vec<Vec<u8>>,
}

/// Fake network that records every frame sent through any of its transports.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeNetwork {
    state: Arc<Mutex<FakeNetworkState>>,
}

impl FakeNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A network on which every connection attempt fails.
    pub(crate) fn unavailable() -> Self {
        let network = Self::new();
        network.state.lock().expect(ERR_POISONED_FAKE).unavailable = true;
        network
    }

    pub(crate) fn frames(&self) -> Vec<Vec<u8>> {
        self.state.lock().expect(ERR_POISONED_FAKE).frames.clone()
    }

    pub(crate) fn connect_attempts(&self) -> usize {
        self.state.lock().expect(ERR_POISONED_FAKE).connect_attempts
    }

    /// Number of transports created but not yet dropped.
    pub(crate) fn open_transports(&self) -> usize {
        self.state.lock().expect(ERR_POISONED_FAKE).open_transports
    }
}

impl Network for FakeNetwork {
    type Transport = FakeTransport;

    fn connect(&self, _address: &AggregatorAddress) -> io::Result<FakeTransport> {
        let mut state = self.state.lock().expect(ERR_POISONED_FAKE);
        state.connect_attempts = state.connect_attempts.saturating_add(1);

        if state.unavailable {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "fake network is unavailable",
            ));
        }

        state.open_transports = state.open_transports.saturating_add(1);

        Ok(FakeTransport {
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeNetworkState>>,
}

impl Transport for FakeTransport {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.state
            .lock()
            .expect(ERR_POISONED_FAKE)
            .frames
            .push(frame.to_vec());
        Ok(frame.len())
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        let mut state = self.state.lock().expect(ERR_POISONED_FAKE);
        state.open_transports = state.open_transports.saturating_sub(1);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_time() {
        let platform = FakePlatform::new();
        assert_eq!(platform.wall_time(), Duration::ZERO);
        assert_eq!(platform.cpu_time(), Duration::ZERO);
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        platform1.set_wall_time(Duration::from_millis(100));
        assert_eq!(platform2.wall_time(), Duration::from_millis(100));

        platform2.set_cpu_time(Duration::from_millis(200));
        assert_eq!(platform1.cpu_time(), Duration::from_millis(200));

        platform1.advance(Duration::from_millis(5), Duration::from_millis(1));
        assert_eq!(platform2.wall_time(), Duration::from_millis(105));
        assert_eq!(platform2.cpu_time(), Duration::from_millis(201));
    }

    #[test]
    fn records_frames_and_tracks_open_transports() {
        let network = FakeNetwork::new();
        let address = AggregatorAddress::default();

        {
            let mut transport = network.connect(&address).unwrap();
            assert_eq!(network.open_transports(), 1);

            transport.send(b"one").unwrap();
            transport.send(b"two").unwrap();
        }

        assert_eq!(network.open_transports(), 0);
        assert_eq!(network.connect_attempts(), 1);
        assert_eq!(network.frames(), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn unavailable_network_refuses_connections() {
        let network = FakeNetwork::unavailable();

        network.connect(&AggregatorAddress::default()).unwrap_err();

        assert_eq!(network.connect_attempts(), 1);
        assert_eq!(network.open_transports(), 0);
    }
}
