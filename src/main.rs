use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use lotuscomm::config::Config;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Interaction edge list (`protein1 protein2 [weight]`).
    #[arg(global = true, short, long, default_value = "data/ppi.tsv")]
    graph: PathBuf,

    /// GO annotations in GAF 2.x format.
    #[arg(global = true, short, long, default_value = "data/annotations.gaf")]
    annotations: PathBuf,

    /// Initial disjoint partition (`cluster_id,protein_id`).
    #[arg(global = true, short, long, default_value = "data/initial_clusters.csv")]
    partition: PathBuf,

    /// Reference complexes for the precision/recall report.
    #[arg(global = true, long)]
    gold: Option<PathBuf>,

    #[arg(global = true, short, long, default_value = "results")]
    outdir: PathBuf,

    /// JSON file with a base configuration; explicit flags override it.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Edge list column separator: `tab`, `space`, `comma` or a single character.
    #[arg(global = true, long, default_value = "tab")]
    delimiter: String,

    #[arg(global = true, long, default_value_t = false)]
    has_header: bool,

    /// Drop interactions below this weight.
    #[arg(global = true, long)]
    min_weight: Option<f64>,

    /// Keep only annotations for this NCBI taxon id.
    #[arg(global = true, long)]
    taxon: Option<u32>,

    /// Key annotations by DB_Object_Symbol instead of DB_Object_ID.
    #[arg(global = true, long, default_value_t = false)]
    use_symbol: bool,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the parameter cube, then reassign with the best vector.
    Optimize(cmd::optimize::OptimizeArgs),
    /// Reassign once with fixed parameters.
    Reassign(cmd::reassign::ReassignArgs),
}

fn main() {
    // Raw matches tell explicit flags apart from defaults.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let (cli_config, sub_name) = match &cli.command {
        Commands::Optimize(args) => (&args.config, "optimize"),
        Commands::Reassign(args) => (&args.config, "reassign"),
    };
    let Some(sub_matches) = matches.subcommand_matches(sub_name) else {
        error!("Missing subcommand arguments");
        process::exit(2);
    };

    let config = match resolve_config(&cli, cli_config, sub_matches) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    let delimiter = match parse_delimiter(&cli.delimiter) {
        Some(d) => d,
        None => {
            error!("Unsupported delimiter '{}'", cli.delimiter);
            process::exit(2);
        }
    };

    info!("Initializing lotuscomm {}", env!("CARGO_PKG_VERSION"));
    let sources = cmd::InputSources {
        graph: cli.graph.clone(),
        annotations: cli.annotations.clone(),
        partition: cli.partition.clone(),
        gold: cli.gold.clone(),
        delimiter,
        has_header: cli.has_header,
        min_weight: cli.min_weight,
        taxon: cli.taxon,
        use_symbol: cli.use_symbol,
    };
    let inputs = match cmd::Inputs::load(&sources) {
        Ok(i) => i,
        Err(e) => {
            error!("Could not load inputs: {}", e);
            process::exit(1);
        }
    };

    let outcome = match cli.command {
        Commands::Optimize(_) => cmd::optimize::run(&config, &inputs, &cli.outdir),
        Commands::Reassign(_) => cmd::reassign::run(&config, &inputs, &cli.outdir),
    };

    if let Err(e) = outcome {
        error!("{}", e);
        process::exit(1);
    }
}

fn resolve_config(
    cli: &Cli,
    cli_config: &Config,
    sub_matches: &clap::ArgMatches,
) -> lotuscomm::error::LcResult<Config> {
    match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "tab" | "\\t" => Some(b'\t'),
        "space" => Some(b' '),
        "comma" => Some(b','),
        other if other.len() == 1 && other.is_ascii() => other.bytes().next(),
        _ => None,
    }
}
