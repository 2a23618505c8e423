//! Fluent builder for constructing a [`YardEnv`].

use log::info;

use yard_core::{SimRng, YardConfig};
use yard_feed::ArrivalRecord;

use crate::{Admission, SimError, SimResult, StrategySource, Yard, YardEnv};

/// Fluent builder for [`YardEnv<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                         |
/// |--------------------|---------------------------------|
/// | `.strategy(s)`     | `SimRng::new(config.seed)`      |
/// | `.arrivals(v)`     | No arrivals                     |
///
/// # Example
///
/// ```rust,ignore
/// let records = load_arrivals_csv(Path::new("arrivals.csv"))?;
/// let mut env = YardEnvBuilder::new(YardConfig::default())
///     .arrivals(records)
///     .build()?;
/// let step = env.step(1)?;
/// ```
pub struct YardEnvBuilder<S: StrategySource = SimRng> {
    config:   YardConfig,
    strategy: S,
    arrivals: Vec<ArrivalRecord>,
}

impl YardEnvBuilder<SimRng> {
    pub fn new(config: YardConfig) -> Self {
        Self {
            strategy: SimRng::new(config.seed),
            config,
            arrivals: Vec::new(),
        }
    }
}

impl<S: StrategySource> YardEnvBuilder<S> {
    /// Replace the conflict strategy source.
    pub fn strategy<T: StrategySource>(self, strategy: T) -> YardEnvBuilder<T> {
        YardEnvBuilder {
            config:   self.config,
            strategy,
            arrivals: self.arrivals,
        }
    }

    /// Items to admit, in feed order, before the first step.
    pub fn arrivals(mut self, records: Vec<ArrivalRecord>) -> Self {
        self.arrivals = records;
        self
    }

    /// Validate the configuration, admit the arrivals, and return a ready
    /// environment.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] for an invalid configuration or when no
    ///   boundary road is enabled.
    /// - [`SimError::CapacityExceeded`] if more items are due at the start
    ///   date than the yard can hold.
    /// - [`SimError::Layout`] for an item too long for any row or lying
    ///   outside the yard's width.
    pub fn build(self) -> SimResult<YardEnv<S>> {
        self.config.validate()?;
        if !self.config.roads.any() {
            return Err(SimError::Config("at least one boundary road must be enabled".into()));
        }

        let mut env = YardEnv::from_parts(Yard::new(self.config), self.strategy);

        let (mut placed, mut cached) = (0usize, 0usize);
        for record in self.arrivals {
            match env.arrive(record)? {
                Admission::Placed { .. } => placed += 1,
                Admission::Cached | Admission::Deferred { .. } => cached += 1,
                Admission::Duplicate => {}
            }
        }
        info!(
            "yard {}x{} ready: {placed} placed, {cached} cached, start {}",
            env.yard.width(),
            env.yard.height(),
            env.yard.clock
        );
        Ok(env)
    }
}
