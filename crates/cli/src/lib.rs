pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "planora",
    about = "Planora travel recommendation CLI",
    long_about = "Inspect configuration, check collaborator readiness, and run place recommendations for a trip.",
    after_help = "Examples:\n  planora doctor --json\n  planora config\n  planora recommend --trip trip.json --category restaurant --limit 10"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, LLM credential readiness, and geocoder endpoint shape")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the recommendation pipeline for a trip and print the response JSON")]
    Recommend(RecommendArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Path to a JSON trip context file")]
    pub trip: PathBuf,
    #[arg(long, help = "all|restaurant|attraction|accommodation")]
    pub category: Option<String>,
    #[arg(long, help = "Total places to return (1-50)")]
    pub limit: Option<usize>,
    #[arg(long, help = "Exclude places rated below this value")]
    pub min_rating: Option<f64>,
    #[arg(long, help = "Search radius in kilometres")]
    pub max_radius: Option<f64>,
    #[arg(long, help = "bestMatch|rating|distance")]
    pub sort_by: Option<String>,
    #[arg(long, help = "Boost places flagged as hidden gems")]
    pub hidden_gems: bool,
    #[arg(long, help = "Only keep places rated 4.5 or higher")]
    pub top_rated: bool,
    #[arg(long, help = "Lowest price level (1-5)")]
    pub price_min: Option<u8>,
    #[arg(long, help = "Highest price level (1-5)")]
    pub price_max: Option<u8>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Recommend(args) => commands::recommend::run(&args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
