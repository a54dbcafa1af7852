use std::io::Write;

use crate::{
    ast::Statement,
    error::RuntimeError,
    interpreter::{evaluator::core::Context, river::RiverRegistry},
};

/// Run parameters of a simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Number of days to simulate. At least one.
    pub days:     u32,
    /// Rainfall in millimetres, the same on every day. Never negative.
    pub rainfall: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { days:     1,
               rainfall: 1.0, }
    }
}

impl SimulationConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// A usage message if `days` is zero or `rainfall` is negative or not a
    /// number.
    ///
    /// # Example
    /// ```
    /// use wflow::simulation::SimulationConfig;
    ///
    /// assert!(SimulationConfig::new(3, 12.5).is_ok());
    /// assert!(SimulationConfig::new(0, 12.5).is_err());
    /// assert!(SimulationConfig::new(3, -1.0).is_err());
    /// ```
    pub fn new(days: u32, rainfall: f64) -> Result<Self, String> {
        if days == 0 {
            return Err("Days must be a positive integer.".to_string());
        }
        if rainfall.is_nan() || rainfall < 0.0 {
            return Err("Rainfall must be a non-negative number.".to_string());
        }
        Ok(Self { days, rainfall })
    }
}

/// A multi-day run of one program.
///
/// The simulation owns the river registry; every day borrows it for the
/// duration of one [`Context`]. Reservoir levels therefore carry over from one
/// day to the next while everything else is reset.
#[derive(Debug, Default)]
pub struct Simulation {
    config: SimulationConfig,
    rivers: RiverRegistry,
}

impl Simulation {
    /// Creates a simulation with no rivers.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self { config,
               rivers: RiverRegistry::new() }
    }

    /// The configuration this simulation runs with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The rivers known so far.
    #[must_use]
    pub const fn rivers(&self) -> &RiverRegistry {
        &self.rivers
    }

    /// Runs every configured day in order.
    ///
    /// The first runtime error aborts its day and the run; later days are not
    /// simulated.
    ///
    /// # Parameters
    /// - `program`: The parsed statements.
    /// - `out`: Sink for headers, program output and summaries.
    ///
    /// # Example
    /// ```
    /// use wflow::simulation::{Simulation, SimulationConfig};
    ///
    /// let program = wflow::parse_program("river A\ndam A close").unwrap();
    /// let mut simulation = Simulation::new(SimulationConfig::new(3, 2.0).unwrap());
    ///
    /// simulation.run(&program, &mut std::io::sink()).unwrap();
    ///
    /// assert_eq!(simulation.rivers().get("A").unwrap().dam_level(), 12.0);
    /// ```
    pub fn run(&mut self, program: &[Statement], out: &mut dyn Write) -> Result<(), RuntimeError> {
        for day in 1..=self.config.days {
            self.run_day(program, day, out)?;
        }
        Ok(())
    }

    /// Runs a single day: header, statements, then the summary.
    ///
    /// No summary is written when a statement fails.
    ///
    /// # Parameters
    /// - `program`: The parsed statements.
    /// - `day`: The 1-based day index.
    /// - `out`: Output sink.
    pub fn run_day(&mut self,
                   program: &[Statement],
                   day: u32,
                   out: &mut dyn Write)
                   -> Result<(), RuntimeError> {
        let SimulationConfig { days, rainfall } = self.config;
        tracing::debug!(day, days, rainfall, "starting day");

        writeln!(out, "\n=== Day {day} of {days} with {rainfall:.1} mm rainfall ===")
            .map_err(|e| RuntimeError::io(&e, 0))?;

        let result = Context::new(&mut self.rivers, rainfall, day, out).execute(program);
        if let Err(error) = &result {
            tracing::debug!(day, line = error.line(), "day aborted by runtime error");
        }
        result?;

        self.write_summary(day, out).map_err(|e| RuntimeError::io(&e, 0))?;
        tracing::debug!(day, rivers = self.rivers.len(), "finished day");
        Ok(())
    }

    /// Writes the per-river summary of a finished day.
    fn write_summary(&self, day: u32, out: &mut dyn Write) -> std::io::Result<()> {
        if self.rivers.is_empty() {
            return writeln!(out, "No river flows computed.");
        }

        writeln!(out, "\n== River flows after day {day} ==")?;
        for (name, river) in self.rivers.iter() {
            writeln!(out,
                     "{name:<20} {:.2} L/s (dam {:.2}x, level {:.2} m3)",
                     river.current_flow(),
                     river.dam_factor(),
                     river.dam_level())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parse_program;

    /// Collects formatted log lines for inspection.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn simulate(source: &str, days: u32, rainfall: f64) -> (Simulation, Result<(), RuntimeError>, String) {
        let program = parse_program(source).expect("test program should parse");
        let mut simulation = Simulation::new(SimulationConfig::new(days, rainfall).unwrap());
        let mut out = Vec::new();
        let result = simulation.run(&program, &mut out);
        (simulation, result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn writes_header_output_and_summary() {
        let (_, result, out) = simulate("river A = 10\noutput A", 1, 5.0);

        assert!(result.is_ok());
        assert_eq!(out,
                   "\n=== Day 1 of 1 with 5.0 mm rainfall ===\n\
                    A flow: 10.00 L/s\n\
                    \n== River flows after day 1 ==\n\
                    A                    10.00 L/s (dam 1.00x, level 0.00 m3)\n");
    }

    #[test]
    fn reports_when_no_rivers_exist() {
        let (_, result, out) = simulate("print day", 2, 0.0);

        assert!(result.is_ok());
        assert_eq!(out,
                   "\n=== Day 1 of 2 with 0.0 mm rainfall ===\n1\nNo river flows computed.\n\
                    \n=== Day 2 of 2 with 0.0 mm rainfall ===\n2\nNo river flows computed.\n");
    }

    #[test]
    fn runtime_error_stops_the_run() {
        let (_, result, out) = simulate("river A\nprint z", 3, 1.0);

        assert!(matches!(result, Err(RuntimeError::UndefinedVariable { .. })));
        assert_eq!(out, "\n=== Day 1 of 3 with 1.0 mm rainfall ===\n");
    }

    #[test]
    fn aborted_day_is_not_logged_at_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::WARN)
                                                  .with_writer(move || writer.clone())
                                                  .finish();

        let (_, result, _) =
            tracing::subscriber::with_default(subscriber, || simulate("print z", 1, 1.0));

        assert!(result.is_err());
        assert!(logs.0.lock().unwrap().is_empty());
    }

    #[test]
    fn dam_level_carries_over_days() {
        let (simulation, result, _) = simulate("river A = 4\ndam A adjust 0.5", 3, 1.0);

        assert!(result.is_ok());
        // Each day adds rainfall plus the held-back half of the inflow.
        assert_eq!(simulation.rivers().get("A").unwrap().dam_level(), 9.0);
    }

    #[test]
    fn flows_repeat_identically_across_days() {
        let source = "river A = 3\nriver B\nflow A -> B\ncombine C = A + B\noutput C";
        let (_, result, out) = simulate(source, 3, 2.0);

        assert!(result.is_ok());
        assert_eq!(out.matches("C flow: 8.00 L/s").count(), 3);
    }

    #[test]
    fn rejects_invalid_config() {
        assert!(SimulationConfig::new(0, 1.0).is_err());
        assert!(SimulationConfig::new(1, f64::NAN).is_err());
        assert_eq!(SimulationConfig::default(), SimulationConfig::new(1, 1.0).unwrap());
    }
}
