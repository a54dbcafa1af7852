use indexmap::IndexMap;

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Simulation record of a single river.
///
/// `intrinsic_flow`, `incoming_flow` and `dam_factor` describe the current day
/// only and are reset by [`RiverState::start_day`]. `dam_level` is the volume
/// held behind the dam and carries over from day to day.
#[derive(Debug, Clone, PartialEq)]
pub struct RiverState {
    intrinsic_flow: f64,
    incoming_flow:  f64,
    dam_factor:     f64,
    dam_level:      f64,
}

impl Default for RiverState {
    fn default() -> Self {
        Self { intrinsic_flow: 0.0,
               incoming_flow:  0.0,
               dam_factor:     1.0,
               dam_level:      0.0, }
    }
}

impl RiverState {
    /// Resets the per-day fields, keeping the reservoir level.
    pub const fn start_day(&mut self) {
        self.intrinsic_flow = 0.0;
        self.incoming_flow = 0.0;
        self.dam_factor = 1.0;
    }

    /// The river's own contribution for the day.
    #[must_use]
    pub const fn intrinsic_flow(&self) -> f64 {
        self.intrinsic_flow
    }

    /// Flow transferred in from other rivers today.
    #[must_use]
    pub const fn incoming_flow(&self) -> f64 {
        self.incoming_flow
    }

    /// The fraction of inflow passing the dam.
    #[must_use]
    pub const fn dam_factor(&self) -> f64 {
        self.dam_factor
    }

    /// The reservoir volume, never negative.
    #[must_use]
    pub const fn dam_level(&self) -> f64 {
        self.dam_level
    }

    /// Everything reaching the river today, before the dam.
    #[must_use]
    pub fn inflow(&self) -> f64 {
        self.intrinsic_flow + self.incoming_flow
    }

    /// What leaves the river today, after the dam.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::river::RiverState;
    ///
    /// let mut state = RiverState::default();
    /// state.set_intrinsic_flow(10.0);
    /// state.add_incoming_flow(2.0);
    /// state.set_dam_factor(0.5, "A", 1).unwrap();
    ///
    /// assert_eq!(state.inflow(), 12.0);
    /// assert_eq!(state.current_flow(), 6.0);
    /// ```
    #[must_use]
    pub fn current_flow(&self) -> f64 {
        self.inflow() * self.dam_factor
    }

    /// Overwrites the intrinsic flow.
    pub const fn set_intrinsic_flow(&mut self, flow: f64) {
        self.intrinsic_flow = flow;
    }

    /// Adds a transfer to the incoming flow. Transfers accumulate.
    pub fn add_incoming_flow(&mut self, flow: f64) {
        self.incoming_flow += flow;
    }

    /// Sets the dam factor.
    ///
    /// The factor must be a non-negative number; anything else is rejected
    /// and leaves the state untouched.
    ///
    /// # Parameters
    /// - `factor`: The new pass-through fraction.
    /// - `river`: Name of this river, for the error.
    /// - `line`: Line number for error reporting.
    pub fn set_dam_factor(&mut self, factor: f64, river: &str, line: usize) -> EvalResult<()> {
        if factor.is_nan() || factor < 0.0 {
            return Err(RuntimeError::InvalidDamFactor { river: river.to_string(),
                                                        factor,
                                                        line });
        }
        self.dam_factor = factor;
        Ok(())
    }

    /// Moves the reservoir level by `delta`, never below zero.
    pub fn update_dam_level(&mut self, delta: f64) {
        self.dam_level = (self.dam_level + delta).max(0.0);
    }
}

/// All rivers known to a simulation, in order of first reference.
///
/// Rivers are created on demand as zero-state records and are never removed.
/// The registry outlives individual days; only the evaluator of the running
/// day mutates it.
#[derive(Debug, Default)]
pub struct RiverRegistry {
    rivers: IndexMap<String, RiverState>,
}

impl RiverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `name`, creating it if unseen.
    pub fn entry(&mut self, name: &str) -> &mut RiverState {
        if !self.rivers.contains_key(name) {
            tracing::trace!(river = name, "creating river");
        }
        self.rivers.entry(name.to_string()).or_default()
    }

    /// Returns the current flow of `name`, creating the river if unseen.
    ///
    /// # Example
    /// ```
    /// use wflow::interpreter::river::RiverRegistry;
    ///
    /// let mut rivers = RiverRegistry::new();
    ///
    /// assert_eq!(rivers.current_flow("Rhine"), 0.0);
    /// assert!(rivers.contains("Rhine"));
    /// ```
    pub fn current_flow(&mut self, name: &str) -> f64 {
        self.entry(name).current_flow()
    }

    /// Looks up a river without creating it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RiverState> {
        self.rivers.get(name)
    }

    /// Returns `true` if the river has been referenced before.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rivers.contains_key(name)
    }

    /// Resets the per-day fields of every river.
    pub fn start_day(&mut self) {
        self.rivers.values_mut().for_each(RiverState::start_day);
    }

    /// Iterates over the rivers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RiverState)> {
        self.rivers.iter().map(|(name, state)| (name.as_str(), state))
    }

    /// Number of known rivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rivers.len()
    }

    /// Returns `true` if no river has been referenced yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rivers.is_empty()
    }
}
