//! Real platform implementation using the operating system.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use cpu_time::ThreadTime;

use crate::AggregatorAddress;
use crate::pal::abstractions::{Network, Platform, Transport};

/// Real clocks: a monotonic wall clock anchored at creation time and the
/// thread processor time reported by the `cpu_time` crate.
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform {
    origin: Instant,
}

impl RealPlatform {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Platform for RealPlatform {
    fn wall_time(&self) -> Duration {
        self.origin.elapsed()
    }

    #[cfg_attr(test, mutants::skip)] // Real processor time is not controllable from tests.
    fn cpu_time(&self) -> Duration {
        // Some platforms cannot report thread time. Timing must not fail the host.
        ThreadTime::try_now().map_or(Duration::ZERO, |time| time.as_duration())
    }
}

/// UDP over the operating system network stack.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct UdpNetwork;

impl Network for UdpNetwork {
    type Transport = UdpTransport;

    fn connect(&self, address: &AggregatorAddress) -> io::Result<UdpTransport> {
        let remote = (address.host(), address.port())
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("aggregator host '{}' did not resolve", address.host()),
                )
            })?;

        let local = match remote {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };

        let socket = UdpSocket::bind(local)?;
        socket.connect(remote)?;

        Ok(UdpTransport { socket })
    }
}

/// A UDP socket connected to the aggregator. Closed on drop.
#[derive(Debug)]
pub(crate) struct UdpTransport {
    socket: UdpSocket,
}

impl Transport for UdpTransport {
    fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        self.socket.send(frame)
    }
}
