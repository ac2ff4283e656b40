use clap::{CommandFactory, FromArgMatches, Parser};
use lotuscomm::config::{BudgetPolicy, Config, FitnessWeights};
use std::io::Write;
use strum::IntoEnumIterator;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    config: Config,
}

fn parse(args: &[&str]) -> (Config, clap::ArgMatches) {
    let mut argv = vec!["test"];
    argv.extend_from_slice(args);
    let matches = TestCli::command().get_matches_from(argv);
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli.config, matches)
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.search.population_size, 30);
    assert_eq!(config.search.max_evaluations, 1000);
    assert_eq!(config.search.step_coeff, 0.5);
    assert_eq!(config.search.levy_beta, 1.5);
    assert_eq!(config.search.levy_scale, 0.01);
    assert_eq!(config.search.budget_policy, BudgetPolicy::Shared);
    assert_eq!(config.search.get_lower_bound().unwrap(), [0.0; 3]);
    assert_eq!(config.search.get_upper_bound().unwrap(), [1.0; 3]);
    assert_eq!(config.fitness, FitnessWeights::default());
    assert_eq!(config.fitness.lambda_inter, 1.0);
    assert_eq!(config.fitness.lambda_fragment, 0.5);
    assert_eq!(config.reassign.alpha, 0.5);
    assert_eq!(config.reassign.overlap_tau, 0.1);
    assert_eq!(config.reassign.transfer_tau, 0.0);
}

#[test]
fn test_cli_defaults_match_struct_defaults() {
    let (config, _) = parse(&[]);
    let reference = Config::default();
    assert_eq!(config.search.population_size, reference.search.population_size);
    assert_eq!(config.search.lower_bound, reference.search.lower_bound);
    assert_eq!(config.search.budget_policy, reference.search.budget_policy);
    assert_eq!(config.fitness, reference.fitness);
    assert_eq!(config.reassign, reference.reassign);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "search": {{ "population_size": 12, "budget_policy": "fitness-only" }},
            "fitness": {{ "lambda_inter": 2.0 }}
        }}"#
    )
    .unwrap();

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.search.population_size, 12);
    assert_eq!(config.search.budget_policy, BudgetPolicy::FitnessOnly);
    assert_eq!(config.search.max_evaluations, 1000);
    assert_eq!(config.fitness.lambda_inter, 2.0);
    assert_eq!(config.fitness.lambda_fragment, 0.5);
    assert_eq!(config.reassign.alpha, 0.5);
}

#[test]
fn test_explicit_flags_override_file_values() {
    let mut from_file = Config::default();
    from_file.search.population_size = 12;
    from_file.search.max_evaluations = 77;
    from_file.fitness.lambda_fragment = 0.9;

    let (cli, matches) = parse(&[
        "--population-size",
        "50",
        "--lambda-inter",
        "3.5",
        "--budget-policy",
        "fitness-only",
        "-S",
        "9",
    ]);
    from_file.merge_from_cli(&cli, &matches);

    assert_eq!(from_file.search.population_size, 50);
    assert_eq!(from_file.search.max_evaluations, 77);
    assert_eq!(from_file.search.seed, Some(9));
    assert_eq!(from_file.search.budget_policy, BudgetPolicy::FitnessOnly);
    assert_eq!(from_file.fitness.lambda_inter, 3.5);
    assert_eq!(from_file.fitness.lambda_fragment, 0.9);
}

#[test]
fn test_budget_policy_names() {
    let names: Vec<String> = BudgetPolicy::iter().map(|p| p.to_string()).collect();
    assert_eq!(names, vec!["shared", "fitness-only"]);
    assert_eq!("shared".parse::<BudgetPolicy>().unwrap(), BudgetPolicy::Shared);
    assert!("sometimes".parse::<BudgetPolicy>().is_err());
}

#[test]
fn test_weight_validation() {
    assert!(FitnessWeights::default().validate().is_ok());
    let negative = FitnessWeights {
        lambda_inter: -0.1,
        lambda_fragment: 0.5,
    };
    assert!(negative.validate().is_err());
    let nan = FitnessWeights {
        lambda_inter: 1.0,
        lambda_fragment: f64::NAN,
    };
    assert!(nan.validate().is_err());
}

#[test]
fn test_reassign_params_vector() {
    let (config, _) = parse(&["--alpha", "0.25", "--overlap-tau", "0.4"]);
    let v = config.reassign.to_vector();
    assert_eq!(v.alpha, 0.25);
    assert_eq!(v.overlap_tau, 0.4);
    assert_eq!(v.transfer_tau, 0.0);
}

#[test]
fn test_bound_help_mentions_threshold_clamping() {
    let rendered = TestCli::command().render_long_help().to_string();
    let help = rendered.split_whitespace().collect::<Vec<_>>().join(" ");
    assert!(help.contains("--lower-bound"));
    assert!(help.contains("Only alpha is"));
    assert!(help.contains("thresholds outside it are used as given"));
}
