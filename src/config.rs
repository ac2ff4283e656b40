use crate::error::{LcResult, LotusError};
use crate::scorer::types::{ParameterVector, DIMENSIONS};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::{Display, EnumIter, EnumString};

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub fitness: FitnessWeights,
    #[command(flatten)]
    pub reassign: ReassignParams,
}

/// How the optimizer charges its evaluation budget.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BudgetPolicy {
    /// Position updates and fitness calls draw from the same counter.
    #[default]
    Shared,
    /// Only fitness calls are counted.
    FitnessOnly,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 30)]
    pub population_size: usize,
    #[arg(long, default_value_t = 1000)]
    pub max_evaluations: usize,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    /// Comma-separated `alpha,overlap_tau,transfer_tau` lower bounds. Only alpha is
    /// clamped to [0, 1] during reassignment; thresholds outside it are used as given.
    #[arg(long, default_value = "0.0,0.0,0.0")]
    pub lower_bound: String,
    #[arg(long, default_value = "1.0,1.0,1.0")]
    pub upper_bound: String,
    #[arg(long, default_value_t = 0.5)]
    pub step_coeff: f64,
    #[arg(long, default_value_t = 1.5)]
    pub levy_beta: f64,
    #[arg(long, default_value_t = 0.01)]
    pub levy_scale: f64,
    #[arg(long, default_value_t = BudgetPolicy::Shared)]
    pub budget_policy: BudgetPolicy,
    #[arg(long, default_value_t = false)]
    pub parallel: bool,
    #[arg(long)]
    pub max_time_secs: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_evaluations: 1000,
            seed: None,
            lower_bound: "0.0,0.0,0.0".to_string(),
            upper_bound: "1.0,1.0,1.0".to_string(),
            step_coeff: 0.5,
            levy_beta: 1.5,
            levy_scale: 0.01,
            budget_policy: BudgetPolicy::Shared,
            parallel: false,
            max_time_secs: None,
        }
    }
}

impl SearchParams {
    pub fn get_lower_bound(&self) -> LcResult<[f64; DIMENSIONS]> {
        parse_f64_array::<DIMENSIONS>(&self.lower_bound, "lower_bound")
    }

    pub fn get_upper_bound(&self) -> LcResult<[f64; DIMENSIONS]> {
        parse_f64_array::<DIMENSIONS>(&self.upper_bound, "upper_bound")
    }
}

/// Penalty weights of the fitness composite.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FitnessWeights {
    #[arg(long, default_value_t = 1.0)]
    pub lambda_inter: f64,
    #[arg(long, default_value_t = 0.5)]
    pub lambda_fragment: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            lambda_inter: 1.0,
            lambda_fragment: 0.5,
        }
    }
}

impl FitnessWeights {
    pub fn validate(&self) -> LcResult<()> {
        for (name, value) in [
            ("lambda_inter", self.lambda_inter),
            ("lambda_fragment", self.lambda_fragment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LotusError::Config(format!(
                    "--{} must be a finite value >= 0 (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Fixed parameters for a single reassignment without search.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReassignParams {
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,
    #[arg(long, default_value_t = 0.1)]
    pub overlap_tau: f64,
    #[arg(long, default_value_t = 0.0)]
    pub transfer_tau: f64,
}

impl Default for ReassignParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            overlap_tau: 0.1,
            transfer_tau: 0.0,
        }
    }
}

impl ReassignParams {
    pub fn to_vector(&self) -> ParameterVector {
        ParameterVector::new(self.alpha, self.overlap_tau, self.transfer_tau)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LcResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every flag the user typed explicitly over the values loaded from file.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(search.population_size);
        update_if_present!(search.max_evaluations);
        update_if_present!(search.seed);
        update_if_present!(search.lower_bound);
        update_if_present!(search.upper_bound);
        update_if_present!(search.step_coeff);
        update_if_present!(search.levy_beta);
        update_if_present!(search.levy_scale);
        update_if_present!(search.budget_policy);
        update_if_present!(search.parallel);
        update_if_present!(search.max_time_secs);

        update_if_present!(fitness.lambda_inter);
        update_if_present!(fitness.lambda_fragment);

        update_if_present!(reassign.alpha);
        update_if_present!(reassign.overlap_tau);
        update_if_present!(reassign.transfer_tau);
    }
}

fn parse_f64_array<const N: usize>(s: &str, name: &str) -> LcResult<[f64; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(LotusError::Config(format!(
            "--{} requires {} values",
            name, N
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p
            .trim()
            .parse()
            .map_err(|_| LotusError::Config(format!("Invalid number '{}' in {}", p.trim(), name)))?;
    }
    Ok(arr)
}
