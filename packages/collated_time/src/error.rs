use std::io;

use thiserror::Error;

/// Failures inside the transmission path.
///
/// These never reach the caller. They are logged and converted into a
/// [`Delivery`](crate::Delivery) outcome, so the profiled operation is unaffected.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// The transport to the aggregator could not be created.
    #[error("cannot reach profiling aggregator at {address}: {source}")]
    Connect {
        address: String,

        #[source]
        source: io::Error,
    },

    /// A section could not be serialized into a wire message.
    #[error("cannot encode message for section '{section}': {source}")]
    Encode {
        section: String,

        #[source]
        source: rmp::encode::ValueWriteError,
    },
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
