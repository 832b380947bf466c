use std::fmt;

/// Host name or IP address used when no aggregator host is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// UDP port used when no aggregator port is configured.
pub const DEFAULT_PORT: u16 = 3811;

/// Network location of the profiling data aggregator.
///
/// The host may be an IP address or a name to be resolved at transmission time.
///
/// # Examples
///
/// ```
/// use collated_time::AggregatorAddress;
///
/// let address = AggregatorAddress::new("10.64.0.12", 3811);
/// assert_eq!(address.to_string(), "10.64.0.12:3811");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AggregatorAddress {
    host: String,
    port: u16,
}

impl AggregatorAddress {
    /// Creates an address from a host and a UDP port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The aggregator host name or IP address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The aggregator UDP port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for AggregatorAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for AggregatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
