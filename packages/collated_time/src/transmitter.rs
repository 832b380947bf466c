//! Best-effort delivery of collated data to the profiling aggregator.

use crate::batch::FrameBatcher;
use crate::error::{Error, Result};
use crate::pal::{Network, NetworkFacade, Transport, TransportFacade};
use crate::wire::Message;
use crate::{AggregatorAddress, MAX_FRAME_LEN, Snapshot};

/// Sends collated section data to a profiling aggregator as UDP datagrams.
///
/// Each section becomes one MessagePack message (see [`wire`](crate::wire) for the layout).
/// Messages are packed into datagrams of at most [`MAX_FRAME_LEN`] bytes.
///
/// Delivery is best-effort: there is no acknowledgement, no retry and no ordering guarantee.
/// Transmission never fails from the caller's point of view. If the transport cannot be
/// created, nothing is sent and [`Delivery::Skipped`] is returned.
///
/// A transmitter holds only configuration and may be shared by any number of sessions.
///
/// # Examples
///
/// ```
/// use collated_time::{Session, Transmitter};
///
/// let transmitter = Transmitter::builder()
///     .host("127.0.0.1")
///     .port(3811)
///     .build();
///
/// let session = Session::new();
/// {
///     let _total = session.section("-total");
///     let _parse = session.section("parse");
/// }
///
/// // Fire and forget. Whether anything arrives is not observable here.
/// let _delivery = session.transmit(&transmitter);
/// ```
#[derive(Debug)]
pub struct Transmitter {
    address: AggregatorAddress,
    network: NetworkFacade,
}

/// Outcome of one [`Transmitter::transmit()`] call.
///
/// This is informational. A successful send does not imply the data was received.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Delivery {
    /// The transport could not be created, so nothing was encoded or sent.
    Skipped,

    /// The data was handed to the transport.
    Sent {
        /// Number of datagrams sent.
        frames: usize,

        /// Total payload bytes over all datagrams.
        bytes: usize,

        /// Sections left out because they could not be encoded or their message
        /// alone exceeds [`MAX_FRAME_LEN`].
        dropped: usize,
    },
}

impl Transmitter {
    /// Creates a transmitter that sends to the given aggregator.
    #[must_use]
    pub fn new(address: AggregatorAddress) -> Self {
        Self {
            address,
            network: NetworkFacade::udp(),
        }
    }

    /// Starts building a transmitter. Unset properties take the
    /// [`AggregatorAddress::default()`] values.
    pub fn builder() -> TransmitterBuilder {
        TransmitterBuilder::new()
    }

    #[cfg(test)]
    pub(crate) fn with_network(address: AggregatorAddress, network: NetworkFacade) -> Self {
        Self { address, network }
    }

    /// The aggregator this transmitter sends to.
    #[must_use]
    pub fn address(&self) -> &AggregatorAddress {
        &self.address
    }

    /// Encodes every entry of the snapshot and sends the resulting frames.
    ///
    /// A fresh transport is created for each call and released before returning,
    /// whichever way the call ends.
    pub fn transmit(&self, snapshot: &Snapshot) -> Delivery {
        if snapshot.is_empty() {
            return Delivery::Sent {
                frames: 0,
                bytes: 0,
                dropped: 0,
            };
        }

        let mut transport = match self.connect() {
            Ok(transport) => transport,
            Err(error) => {
                tracing::debug!(%error, "profiling data transmission skipped");
                return Delivery::Skipped;
            }
        };

        let mut frames = 0_usize;
        let mut bytes = 0_usize;
        let mut dropped = 0_usize;

        let mut send = |frame: &[u8]| {
            frames = frames.saturating_add(1);
            bytes = bytes.saturating_add(frame.len());

            // Datagrams may be lost anyway. A local send failure is no different.
            if let Err(error) = transport.send(frame) {
                tracing::trace!(%error, len = frame.len(), "profiling frame send failed");
            }
        };

        let mut batcher = FrameBatcher::new(MAX_FRAME_LEN);
        let mut encoded = Vec::new();

        for (name, entry) in snapshot.entries() {
            encoded.clear();

            if let Err(error) = Message::from_entry(name, entry).encode_into(&mut encoded) {
                tracing::debug!(%error, "profiling section dropped");
                dropped = dropped.saturating_add(1);
                continue;
            }

            if !batcher.push(&encoded, &mut send) {
                tracing::debug!(
                    section = name,
                    len = encoded.len(),
                    max_len = MAX_FRAME_LEN,
                    "profiling section dropped: message exceeds frame ceiling"
                );
                dropped = dropped.saturating_add(1);
            }
        }

        batcher.finish(&mut send);

        Delivery::Sent {
            frames,
            bytes,
            dropped,
        }
    }

    fn connect(&self) -> Result<TransportFacade> {
        self.network
            .connect(&self.address)
            .map_err(|source| Error::Connect {
                address: self.address.to_string(),
                source,
            })
    }
}

/// Creates instances of [`Transmitter`].
///
/// Use `Transmitter::builder()` to create a new instance of this builder.
#[derive(Debug)]
#[must_use]
pub struct TransmitterBuilder {
    host: String,
    port: u16,
}

impl TransmitterBuilder {
    fn new() -> Self {
        let address = AggregatorAddress::default();

        Self {
            host: address.host().to_string(),
            port: address.port(),
        }
    }

    /// Sets the aggregator host name or IP address.
    pub fn host(self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self
        }
    }

    /// Sets the aggregator UDP port.
    pub fn port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    /// Sets both host and port from an existing address.
    pub fn address(self, address: &AggregatorAddress) -> Self {
        Self {
            host: address.host().to_string(),
            port: address.port(),
        }
    }

    /// Creates the transmitter. No network resources are allocated until
    /// [`Transmitter::transmit()`] is called.
    #[must_use]
    pub fn build(self) -> Transmitter {
        Transmitter::new(AggregatorAddress::new(self.host, self.port))
    }
}
