//! Platform abstraction layer for clocks and the connectionless transport.
//!
//! This module allows switching between the real platform (monotonic wall clock,
//! thread processor time via the `cpu_time` package, UDP sockets) and fake implementations
//! for testing purposes.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::{Network, Platform, Transport};
pub(crate) use facade::{NetworkFacade, PlatformFacade, TransportFacade};
#[cfg(test)]
pub(crate) use fake::{FakeNetwork, FakePlatform};
