use anyhow::{Context, Result, anyhow};
use gbgenes::{
    AnnotationSummary, GenomeAnnotation, ParseOptions, about, detect_genome_topology_file,
    parse_genbank_file,
};
use serde::Serialize;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_LEVEL: &str = "warn";

fn usage() {
    eprintln!(
        "Usage:\n  \
  gbgenes_cli --version\n  \
  gbgenes_cli [--config OPTIONS.json] [--log-level LEVEL] summary FILE.gb\n  \
  gbgenes_cli [--config OPTIONS.json] [--log-level LEVEL] genes FILE.gb\n  \
  gbgenes_cli [--config OPTIONS.json] [--log-level LEVEL] features FILE.gb\n  \
  gbgenes_cli [--log-level LEVEL] topology FILE.gb"
    );
}

struct GlobalArgs {
    config_path: Option<String>,
    log_level: Option<String>,
    cmd_idx: usize,
}

fn parse_global_args(args: &[String]) -> Result<GlobalArgs> {
    let mut global = GlobalArgs {
        config_path: None,
        log_level: None,
        cmd_idx: 1,
    };
    while global.cmd_idx < args.len() {
        let slot = match args[global.cmd_idx].as_str() {
            "--config" => &mut global.config_path,
            "--log-level" => &mut global.log_level,
            _ => break,
        };
        let flag = &args[global.cmd_idx];
        let value = args
            .get(global.cmd_idx + 1)
            .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
        *slot = Some(value.clone());
        global.cmd_idx += 2;
    }
    Ok(global)
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("Invalid log level '{level}': {e}"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow!("Could not initialize logging: {e}"))
}

fn load_options(path: Option<&str>) -> Result<ParseOptions> {
    match path {
        Some(path) => Ok(ParseOptions::from_json_file(path)?),
        None => Ok(ParseOptions::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err(anyhow!("Missing command"));
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let global = parse_global_args(&args)?;
    init_tracing(global.log_level.as_deref())?;
    if args.len() <= global.cmd_idx + 1 {
        usage();
        return Err(anyhow!("Missing command or input file"));
    }
    let command = &args[global.cmd_idx];
    let input = &args[global.cmd_idx + 1];

    match command.as_str() {
        "summary" => {
            let options = load_options(global.config_path.as_deref())?;
            let annotation = GenomeAnnotation::from_genbank_file(input, &options)
                .with_context(|| format!("Could not read GenBank file '{input}'"))?;
            print_json(&AnnotationSummary::from(&annotation))
        }
        "genes" => {
            let options = load_options(global.config_path.as_deref())?;
            let genes = parse_genbank_file(input, &options)
                .with_context(|| format!("Could not read GenBank file '{input}'"))?;
            print_json(&genes)
        }
        "features" => {
            let options = load_options(global.config_path.as_deref())?;
            let annotation = GenomeAnnotation::from_genbank_file(input, &options)
                .with_context(|| format!("Could not read GenBank file '{input}'"))?;
            print_json(&annotation.gb_features())
        }
        "topology" => {
            let topology = detect_genome_topology_file(input)
                .with_context(|| format!("Could not read GenBank file '{input}'"))?;
            println!("{topology}");
            Ok(())
        }
        _ => {
            usage();
            Err(anyhow!("Unknown command '{command}'"))
        }
    }
}
