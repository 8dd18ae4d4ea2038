use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use symptom_checker::config::Config;
use symptom_checker::{AnalysisResult, ChatTransport, GroqClient, SymptomChecker};

const DEFAULT_CONFIG_PATH: &str = "config/symptom-checker.toml";

fn print_help() {
    println!(
        "\
symptom-checker v{}

Sends a symptom description to a Groq-hosted model and prints the analysis.

USAGE:
    symptom-checker [OPTIONS] [SYMPTOMS...]

ARGUMENTS:
    SYMPTOMS    Free-text symptom description [default: read from stdin]

OPTIONS:
    -c, --config PATH    TOML configuration file [default: {DEFAULT_CONFIG_PATH}]
        --json           Print the {{\"analysis\"}} / {{\"error\"}} JSON response
    -h, --help           Print this help message and exit
    -V, --version        Print version and exit

ENVIRONMENT VARIABLES:
    Variables are referenced in the config file via ${{VAR_NAME}} syntax.

    RUST_LOG        Log level filter for tracing
                    (e.g. debug, symptom_checker=debug,warn)
    GROQ_API_KEY    API key used when no config file exists
                    (from https://console.groq.com/keys)

EXAMPLES:
    symptom-checker headache and mild fever since yesterday
    echo \"dry cough for two weeks\" | symptom-checker --json
    RUST_LOG=debug symptom-checker -c /etc/symptom-checker.toml sore throat",
        env!("CARGO_PKG_VERSION"),
    );
}

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config_path: Option<String>,
    json: bool,
    symptoms: Vec<String>,
}

/// What the process should do after argument parsing.
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Args),
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--json" => parsed.json = true,
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("{arg} requires a path argument"))?;
                parsed.config_path = Some(path);
            }
            "--" => {
                parsed.symptoms.extend(iter.by_ref());
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(anyhow!("Unknown option: {other} (see --help)"));
            }
            _ => parsed.symptoms.push(arg),
        }
    }
    Ok(Command::Run(parsed))
}

/// Loads the explicit config, else the default path if present, else the environment.
fn load_config(explicit: Option<&str>) -> Result<Config> {
    match explicit {
        Some(path) => {
            info!("Loading configuration from {path}");
            Config::load(path)
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {DEFAULT_CONFIG_PATH}");
            Config::load(DEFAULT_CONFIG_PATH)
        }
        None => {
            info!("No configuration file, reading GROQ_API_KEY from the environment");
            Ok(Config::from_env())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("symptom-checker v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::Run(args) => args,
    };

    // Initialize logging (RUST_LOG=debug for debug mode)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("symptom_checker=info")),
        )
        .init();

    let config = load_config(args.config_path.as_deref())?;

    let symptoms = if args.symptoms.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.symptoms.join(" ")
    };

    let transport = GroqClient::new(&config.llm)?;
    info!("LLM: {}", transport.description());
    let checker = SymptomChecker::new(transport);

    let result = checker.analyze_symptoms(&symptoms, &config.llm.api_key).await;
    let success = result.is_success();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.into_response())?);
    } else {
        match result {
            AnalysisResult::Success { analysis } => println!("{analysis}"),
            AnalysisResult::Failure { message, .. } => eprintln!("{message}"),
        }
    }

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
