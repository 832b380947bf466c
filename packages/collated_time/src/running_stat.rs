//! Online accumulation of sample statistics.

/// Accumulates count, mean, variance, minimum and maximum of a stream of samples
/// without retaining the samples themselves.
///
/// Uses Welford's algorithm, which stays numerically stable as the sample count grows
/// and when samples span several orders of magnitude.
///
/// The raw moment state ([`mean()`](Self::mean) and [`m2()`](Self::m2)) is exposed so that
/// a remote aggregator can merge accumulators from many collectors and arrive at exactly
/// the same derived values as computed locally.
///
/// # Examples
///
/// ```
/// use collated_time::RunningStat;
///
/// let mut stat = RunningStat::new();
/// stat.push(1.0);
/// stat.push(2.0);
/// stat.push(6.0);
///
/// assert_eq!(stat.count(), 3);
/// assert_eq!(stat.min(), 1.0);
/// assert_eq!(stat.max(), 6.0);
/// assert!((stat.mean() - 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunningStat {
    n: u64,

    // Running mean.
    m1: f64,

    // Sum of squared deviations from the running mean.
    m2: f64,

    min: f64,
    max: f64,
}

impl RunningStat {
    /// Creates an empty accumulator.
    ///
    /// Until the first sample is pushed, the derived values are meaningless
    /// (the mean is zero, the minimum is positive infinity and the maximum is negative infinity).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            n: 0,
            m1: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Reconstructs an accumulator from its raw moment state, as carried on the wire.
    #[must_use]
    pub const fn from_parts(n: u64, m1: f64, m2: f64, min: f64, max: f64) -> Self {
        Self {
            n,
            m1,
            m2,
            min,
            max,
        }
    }

    /// Folds one sample into the accumulator in constant time.
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts beyond 2^53 are not realistic for a single request"
    )]
    pub fn push(&mut self, x: f64) {
        self.n = self.n.saturating_add(1);

        let delta = x - self.m1;
        self.m1 += delta / self.n as f64;
        self.m2 += delta * (x - self.m1);

        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Combines the samples of `other` into this accumulator, as if every sample
    /// pushed into `other` had been pushed here instead.
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts beyond 2^53 are not realistic for a single request"
    )]
    pub fn merge(&mut self, other: &Self) {
        if other.n == 0 {
            return;
        }

        if self.n == 0 {
            *self = *other;
            return;
        }

        let n = self.n.saturating_add(other.n);
        let (a, b, total) = (self.n as f64, other.n as f64, n as f64);

        let delta = other.m1 - self.m1;
        self.m1 += delta * b / total;
        self.m2 += other.m2 + delta * delta * a * b / total;
        self.n = n;

        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Number of samples pushed so far.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.n
    }

    /// Arithmetic mean of all samples (the first moment).
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.m1
    }

    /// Sum of squared deviations from the mean (the second moment, in Welford form).
    #[must_use]
    pub const fn m2(&self) -> f64 {
        self.m2
    }

    /// Smallest sample seen.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample seen.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Population variance. Zero if no samples have been pushed.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts beyond 2^53 are not realistic for a single request"
    )]
    pub fn variance(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.m2 / self.n as f64
        }
    }

    /// Sample (Bessel-corrected) variance. Zero if fewer than two samples have been pushed.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts beyond 2^53 are not realistic for a single request"
    )]
    pub fn sample_variance(&self) -> f64 {
        if self.n < 2 {
            0.0
        } else {
            self.m2 / self.n.saturating_sub(1) as f64
        }
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl Default for RunningStat {
    fn default() -> Self {
        Self::new()
    }
}
