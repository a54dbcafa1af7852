use crate::{
    ast::{DamMode, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::Value,
    },
};

impl Context<'_> {
    /// Executes `river name [= expr]`.
    ///
    /// Sets the intrinsic flow of `name`, creating the river if needed. Without
    /// an initializer the day's rainfall is used.
    pub(crate) fn eval_river(&mut self,
                             name: &str,
                             flow_rate: Option<&Expr>,
                             line: usize)
                             -> EvalResult<()> {
        let flow = match flow_rate {
            Some(expr) => self.eval(expr)?.as_number("river", line)?,
            None => self.rainfall(),
        };
        tracing::trace!(river = name, flow, line, "setting intrinsic flow");
        self.rivers_mut().entry(name).set_intrinsic_flow(flow);
        Ok(())
    }

    /// Executes `output name`, reporting the river's current flow.
    pub(crate) fn eval_output(&mut self, river: &str, line: usize) -> EvalResult<()> {
        let flow = self.rivers_mut().current_flow(river);
        self.emit(format_args!("{river} flow: {flow:.2} L/s"), line)
    }

    /// Executes `combine name = a + b + ...`.
    ///
    /// The current flows of the sources are summed in source order and become
    /// the intrinsic flow of `name`.
    pub(crate) fn eval_combine(&mut self, name: &str, sources: &[String]) {
        let rivers = self.rivers_mut();
        let total: f64 = sources.iter().map(|source| rivers.current_flow(source)).sum();

        tracing::trace!(river = name, total, "combining flows");
        rivers.entry(name).set_intrinsic_flow(total);
    }

    /// Executes `flow from -> to`.
    ///
    /// Transfers accumulate: each `flow` adds the source's flow at the moment
    /// it runs.
    pub(crate) fn eval_flow(&mut self, from: &str, to: &str) {
        let rivers = self.rivers_mut();
        let flow = rivers.current_flow(from);

        tracing::trace!(from, to, flow, "transferring flow");
        rivers.entry(to).add_incoming_flow(flow);
    }

    /// Executes `dam river open | close | adjust expr`.
    ///
    /// After the factor is accepted the reservoir takes in the day's rainfall
    /// and whatever the dam holds back:
    /// `level = max(0, level + rainfall + inflow - inflow * factor)`.
    ///
    /// # Errors
    /// - `InvalidDamFactor` if the factor is negative or not a number. The
    ///   river is left unchanged.
    /// - Any error raised while evaluating the adjustment expression.
    pub(crate) fn eval_dam(&mut self, river: &str, mode: &DamMode, line: usize) -> EvalResult<()> {
        let factor = match mode {
            DamMode::Open => 1.0,
            DamMode::Close => 0.0,
            DamMode::Adjust(expr) => self.eval_dam_adjustment(river, expr, line)?,
        };

        let rainfall = self.rainfall();
        let state = self.rivers_mut().entry(river);
        let inflow = state.inflow();

        state.set_dam_factor(factor, river, line)?;
        state.update_dam_level(rainfall + inflow - inflow * factor);

        tracing::trace!(river,
                        factor,
                        level = state.dam_level(),
                        line,
                        "dam adjusted");
        Ok(())
    }

    /// Evaluates an `adjust` expression with `inflow` and `damLevel` bound in
    /// a child scope that is dropped afterwards.
    fn eval_dam_adjustment(&mut self, river: &str, expr: &Expr, line: usize) -> EvalResult<f64> {
        let state = self.rivers_mut().entry(river);
        let (inflow, level) = (state.inflow(), state.dam_level());

        self.with_scope(|context| {
                context.define("inflow", Value::Number(inflow));
                context.define("damLevel", Value::Number(level));
                context.eval(expr)?.as_number("adjust", line)
            })
    }
}
