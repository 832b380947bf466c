//! Wire messages sent to the profiling data aggregator.
//!
//! Each message is a MessagePack array whose first element is a type discriminator.
//! Field order is fixed and consumers decode positionally:
//!
//! * [`TYPE_SINGLE`]: `[1, name, cpu, wall]`
//! * [`TYPE_RUNNING`]: `[2, name, count, cpu_m1, cpu_m2, cpu_min, cpu_max, wall_m1, wall_m2,
//!   wall_min, wall_max]`
//!
//! Times are seconds encoded as 64-bit floats. Messages carry no length prefix. A datagram
//! holds zero or more of them back to back.

use rmp::encode;

use crate::error::{Error, Result};
use crate::{Entry, RunningStat, Timings};

/// Discriminator of a message describing a section measured exactly once.
pub const TYPE_SINGLE: u8 = 1;

/// Discriminator of a message carrying running statistics of a section measured many times.
pub const TYPE_RUNNING: u8 = 2;

/// Maximum number of bytes in one datagram.
///
/// Standard Ethernet frames carry 1500 bytes; the rest is left for IP and UDP headers.
pub const MAX_FRAME_LEN: usize = 1450;

const SINGLE_FIELDS: u32 = 4;
const RUNNING_FIELDS: u32 = 11;

#[derive(Debug, PartialEq)]
pub(crate) enum Message<'a> {
    Single {
        name: &'a str,
        cpu: f64,
        wall: f64,
    },
    Running {
        name: &'a str,
        count: u64,
        cpu: RunningStat,
        wall: RunningStat,
    },
}

impl<'a> Message<'a> {
    pub(crate) fn from_entry(name: &'a str, entry: &Entry) -> Self {
        match *entry.timings() {
            Timings::Single { cpu, wall } => Self::Single { name, cpu, wall },
            Timings::Running { cpu, wall } => Self::Running {
                name,
                count: entry.count(),
                cpu,
                wall,
            },
        }
    }

    pub(crate) fn name(&self) -> &'a str {
        match self {
            Self::Single { name, .. } | Self::Running { name, .. } => *name,
        }
    }

    /// Appends the encoded message to `buffer`.
    pub(crate) fn encode_into(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let encode_error = |source| Error::Encode {
            section: self.name().to_string(),
            source,
        };

        match self {
            Self::Single { name, cpu, wall } => {
                encode::write_array_len(buffer, SINGLE_FIELDS).map_err(encode_error)?;
                encode::write_uint(buffer, TYPE_SINGLE.into()).map_err(encode_error)?;
                encode::write_str(buffer, name).map_err(encode_error)?;
                encode::write_f64(buffer, *cpu).map_err(encode_error)?;
                encode::write_f64(buffer, *wall).map_err(encode_error)?;
            }
            Self::Running {
                name,
                count,
                cpu,
                wall,
            } => {
                encode::write_array_len(buffer, RUNNING_FIELDS).map_err(encode_error)?;
                encode::write_uint(buffer, TYPE_RUNNING.into()).map_err(encode_error)?;
                encode::write_str(buffer, name).map_err(encode_error)?;
                encode::write_uint(buffer, *count).map_err(encode_error)?;

                for stat in [cpu, wall] {
                    for value in [stat.mean(), stat.m2(), stat.min(), stat.max()] {
                        encode::write_f64(buffer, value).map_err(encode_error)?;
                    }
                }
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }
}
