pub mod levy;
pub mod runner;

pub use self::runner::{
    Objective, OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback,
    SilentProgress,
};

use self::levy::LevyFlight;
use crate::config::BudgetPolicy;
use crate::error::{LcResult, LotusError};
use crate::scorer::types::{ParameterVector, DIMENSIONS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: [f64; DIMENSIONS],
    pub upper: [f64; DIMENSIONS],
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: [0.0; DIMENSIONS],
            upper: [1.0; DIMENSIONS],
        }
    }
}

impl Bounds {
    pub fn new(lower: [f64; DIMENSIONS], upper: [f64; DIMENSIONS]) -> LcResult<Self> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> LcResult<()> {
        for d in 0..DIMENSIONS {
            let (lo, hi) = (self.lower[d], self.upper[d]);
            if !lo.is_finite() || !hi.is_finite() {
                return Err(LotusError::Config(format!(
                    "Bounds of dimension {} must be finite ({}, {})",
                    d, lo, hi
                )));
            }
            if lo > hi {
                return Err(LotusError::Config(format!(
                    "Lower bound {} exceeds upper bound {} in dimension {}",
                    lo, hi, d
                )));
            }
            if !(hi - lo).is_finite() {
                return Err(LotusError::Config(format!(
                    "Range of dimension {} overflows ({}, {})",
                    d, lo, hi
                )));
            }
        }
        Ok(())
    }

    pub fn clip(&self, mut position: [f64; DIMENSIONS]) -> [f64; DIMENSIONS] {
        for (d, x) in position.iter_mut().enumerate() {
            *x = x.clamp(self.lower[d], self.upper[d]);
        }
        position
    }

    pub fn contains(&self, position: &[f64; DIMENSIONS]) -> bool {
        position
            .iter()
            .enumerate()
            .all(|(d, x)| *x >= self.lower[d] && *x <= self.upper[d])
    }
}

pub struct Swarm {
    pub positions: Vec<[f64; DIMENSIONS]>,
    pub best_position: [f64; DIMENSIONS],
    pub best_cost: f64,

    // Budget units consumed, see BudgetPolicy
    pub evaluations: usize,
    pub fitness_calls: usize,
    pub improvements: usize,
    pub history: Vec<f64>,

    bounds: Bounds,
    step_coeff: f64,
    levy: LevyFlight,
    budget_policy: BudgetPolicy,
    max_evaluations: usize,
    parallel: bool,
    rng: StdRng,
}

impl Swarm {
    pub fn new(options: &OptimizationOptions, seed: Option<u64>) -> LcResult<Self> {
        options.validate()?;
        let levy = LevyFlight::new(options.levy_beta, options.levy_scale)?;

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let bounds = options.bounds;
        let positions: Vec<[f64; DIMENSIONS]> = (0..options.population_size)
            .map(|_| {
                let mut p = [0.0; DIMENSIONS];
                for (d, x) in p.iter_mut().enumerate() {
                    *x = rng.gen_range(bounds.lower[d]..=bounds.upper[d]);
                }
                p
            })
            .collect();

        Ok(Self {
            best_position: positions[0],
            best_cost: f64::INFINITY,
            positions,
            evaluations: 0,
            fitness_calls: 0,
            improvements: 0,
            history: Vec::new(),
            bounds,
            step_coeff: options.step_coeff,
            levy,
            budget_policy: options.budget_policy,
            max_evaluations: options.max_evaluations,
            parallel: options.parallel,
            rng,
        })
    }

    pub fn budget_exhausted(&self) -> bool {
        self.evaluations >= self.max_evaluations
    }

    pub fn best(&self) -> ParameterVector {
        ParameterVector::from_array(self.best_position)
    }

    // Under Shared each move costs one budget unit.
    pub fn move_population(&mut self) {
        for i in 0..self.positions.len() {
            if self.budget_exhausted() {
                return;
            }
            let jump: [f64; DIMENSIONS] = self.levy.step(&mut self.rng);
            let mut next = self.positions[i];
            for d in 0..DIMENSIONS {
                next[d] += self.step_coeff * (self.best_position[d] - next[d]) + jump[d];
            }
            self.positions[i] = self.bounds.clip(next);

            if self.budget_policy == BudgetPolicy::Shared {
                self.evaluations += 1;
            }
        }
    }

    // Best vector updated sequentially so scheduling never matters.
    pub fn evaluate_population<O: Objective + ?Sized>(&mut self, objective: &O) {
        let remaining = self.max_evaluations.saturating_sub(self.evaluations);
        let n = remaining.min(self.positions.len());
        if n == 0 {
            return;
        }

        let batch = &self.positions[..n];
        let costs: Vec<f64> = if self.parallel {
            batch
                .par_iter()
                .map(|p| objective.cost(&ParameterVector::from_array(*p)))
                .collect()
        } else {
            batch
                .iter()
                .map(|p| objective.cost(&ParameterVector::from_array(*p)))
                .collect()
        };

        for (i, cost) in costs.into_iter().enumerate() {
            self.evaluations += 1;
            self.fitness_calls += 1;
            if cost < self.best_cost {
                self.best_cost = cost;
                self.best_position = self.positions[i];
                self.improvements += 1;
            }
        }
        self.history.push(self.best_cost);
    }
}
