//! Facades for switching between real and fake implementations.

use std::io;
use std::time::Duration;

use crate::AggregatorAddress;
use crate::pal::abstractions::{Network, Platform, Transport};
#[cfg(test)]
use crate::pal::fake::{FakeNetwork, FakePlatform, FakeTransport};
use crate::pal::real::{RealPlatform, UdpNetwork, UdpTransport};

/// Either the real clocks or fake clocks controlled by a test.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    Real(RealPlatform),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform::new())
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }
}

impl Platform for PlatformFacade {
    fn wall_time(&self) -> Duration {
        match self {
            Self::Real(platform) => platform.wall_time(),
            #[cfg(test)]
            Self::Fake(platform) => platform.wall_time(),
        }
    }

    fn cpu_time(&self) -> Duration {
        match self {
            Self::Real(platform) => platform.cpu_time(),
            #[cfg(test)]
            Self::Fake(platform) => platform.cpu_time(),
        }
    }
}

/// Either the operating system UDP stack or a recording fake.
#[derive(Clone, Debug)]
pub(crate) enum NetworkFacade {
    Udp(UdpNetwork),

    #[cfg(test)]
    Fake(FakeNetwork),
}

impl NetworkFacade {
    pub(crate) fn udp() -> Self {
        Self::Udp(UdpNetwork)
    }

    #[cfg(test)]
    pub(crate) fn fake(network: FakeNetwork) -> Self {
        Self::Fake(network)
    }
}

impl Network for NetworkFacade {
    type Transport = TransportFacade;

    fn connect(&self, address: &AggregatorAddress) -> io::Result<TransportFacade> {
        match self {
            Self::Udp(network) => network.connect(address).map(TransportFacade::Udp),
            #[cfg(test)]
            Self::Fake(network) => network.connect(address).map(TransportFacade::Fake),
        }
    }
}

#[derive(Debug)]
pub(crate) enum TransportFacade {
    Udp(UdpTransport),

    #[cfg(test)]
    Fake(FakeTransport),
}

impl Transport for TransportFacade {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        match self {
            Self::Udp(transport) => transport.send(frame),
            #[cfg(test)]
            Self::Fake(transport) => transport.send(frame),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn platform_facade_forwards_to_fake() {
        let fake = FakePlatform::new();
        fake.set_wall_time(Duration::from_millis(300));
        fake.set_cpu_time(Duration::from_millis(120));

        let facade = PlatformFacade::fake(fake);

        assert_eq!(facade.wall_time(), Duration::from_millis(300));
        assert_eq!(facade.cpu_time(), Duration::from_millis(120));
    }

    #[test]
    fn network_facade_forwards_to_fake() {
        let fake = FakeNetwork::new();
        let facade = NetworkFacade::fake(fake.clone());

        let mut transport = facade.connect(&AggregatorAddress::default()).unwrap();
        transport.send(b"abc").unwrap();

        assert!(matches!(transport, TransportFacade::Fake(_)));
        assert_eq!(fake.frames(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn network_facade_propagates_connect_failure() {
        let facade = NetworkFacade::fake(FakeNetwork::unavailable());

        facade.connect(&AggregatorAddress::default()).unwrap_err();
    }
}
