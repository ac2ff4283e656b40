use super::levy::LevyFlight;
use super::{Bounds, Swarm};
use crate::config::{BudgetPolicy, Config};
use crate::error::{LcResult, LotusError};
use crate::scorer::types::ParameterVector;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub trait Objective: Sync {
    fn cost(&self, position: &ParameterVector) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&ParameterVector) -> f64 + Sync,
{
    fn cost(&self, position: &ParameterVector) -> f64 {
        self(position)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub population_size: usize,
    pub max_evaluations: usize,
    pub bounds: Bounds,
    pub step_coeff: f64,
    pub levy_beta: f64,
    pub levy_scale: f64,
    pub budget_policy: BudgetPolicy,
    pub parallel: bool,
    pub max_time: Option<Duration>,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_evaluations: 1000,
            bounds: Bounds::default(),
            step_coeff: 0.5,
            levy_beta: 1.5,
            levy_scale: 0.01,
            budget_policy: BudgetPolicy::Shared,
            parallel: false,
            max_time: None,
        }
    }
}

impl TryFrom<&Config> for OptimizationOptions {
    type Error = LotusError;

    fn try_from(cfg: &Config) -> LcResult<Self> {
        let s = &cfg.search;
        let options = Self {
            population_size: s.population_size,
            max_evaluations: s.max_evaluations,
            bounds: Bounds {
                lower: s.get_lower_bound()?,
                upper: s.get_upper_bound()?,
            },
            step_coeff: s.step_coeff,
            levy_beta: s.levy_beta,
            levy_scale: s.levy_scale,
            budget_policy: s.budget_policy,
            parallel: s.parallel,
            max_time: s.max_time_secs.map(Duration::from_secs),
        };
        options.validate()?;
        Ok(options)
    }
}

impl OptimizationOptions {
    pub fn validate(&self) -> LcResult<()> {
        if self.population_size == 0 {
            return Err(LotusError::Config(
                "Population size must be greater than 0".to_string(),
            ));
        }
        if self.max_evaluations == 0 {
            return Err(LotusError::Config(
                "Evaluation budget must be greater than 0".to_string(),
            ));
        }
        if !self.step_coeff.is_finite() {
            return Err(LotusError::Config(format!(
                "Step coefficient must be finite, got {}",
                self.step_coeff
            )));
        }
        self.bounds.validate()?;
        LevyFlight::new(self.levy_beta, self.levy_scale)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub best: ParameterVector,
    pub best_cost: f64,
    pub evaluations: usize,
    pub fitness_calls: usize,
    pub iterations: usize,
    pub improvements: usize,
    pub history: Vec<f64>,
}

/// Returning false stops the search.
pub trait ProgressCallback {
    fn on_progress(&self, iteration: usize, evaluations: usize, best_cost: f64) -> bool;
}

impl<T: ProgressCallback + ?Sized> ProgressCallback for &T {
    fn on_progress(&self, iteration: usize, evaluations: usize, best_cost: f64) -> bool {
        (**self).on_progress(iteration, evaluations, best_cost)
    }
}

pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_progress(&self, _iteration: usize, _evaluations: usize, _best_cost: f64) -> bool {
        true
    }
}

pub struct Optimizer {
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(options: OptimizationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    pub fn run<O, CB>(
        &self,
        objective: &O,
        seed: Option<u64>,
        callback: CB,
    ) -> LcResult<OptimizationResult>
    where
        O: Objective + ?Sized,
        CB: ProgressCallback,
    {
        let opts = &self.options;
        let mut swarm = Swarm::new(opts, seed)?;

        info!(
            "Lotus search: population {}, budget {} ({}), seed {:?}",
            opts.population_size, opts.max_evaluations, opts.budget_policy, seed
        );

        let start_time = Instant::now();
        let mut iterations = 0;

        while !swarm.budget_exhausted() {
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    info!("Time limit reached after {} iterations", iterations);
                    break;
                }
            }

            swarm.move_population();
            swarm.evaluate_population(objective);
            iterations += 1;

            if iterations % 10 == 0 {
                debug!(
                    "Iter {:4} | Evals {:5}/{} | Best cost {:.6}",
                    iterations, swarm.evaluations, opts.max_evaluations, swarm.best_cost
                );
            }

            if !callback.on_progress(iterations, swarm.evaluations, swarm.best_cost) {
                break;
            }
        }

        let best = swarm.best();
        info!(
            "Lotus search done: {} budget units, {} objective calls, best cost {:.6}",
            swarm.evaluations, swarm.fitness_calls, swarm.best_cost
        );

        Ok(OptimizationResult {
            best,
            best_cost: swarm.best_cost,
            evaluations: swarm.evaluations,
            fitness_calls: swarm.fitness_calls,
            iterations,
            improvements: swarm.improvements,
            history: swarm.history,
        })
    }
}
