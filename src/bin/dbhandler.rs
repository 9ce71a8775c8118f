use dbhandler::config::{self, Config};
use dbhandler::DatabaseHandler;
use std::path::PathBuf;
use std::process;
use tracing::{info, Level};

const USAGE: &str = "usage: dbhandler [--config <path>] <table> [conditions]";
const CONFIG_ENV: &str = "DBHANDLER_CONFIG";

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    table: String,
    conditions: String,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut config = None;
    let mut positional = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => match iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => return Err("--config needs a path".to_string()),
            },
            "--help" | "-h" => return Err(USAGE.to_string()),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let table = positional.next().ok_or_else(|| USAGE.to_string())?;
    let conditions = positional.collect::<Vec<_>>().join(" ");
    Ok(Args {
        config,
        table,
        conditions,
    })
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(config::default_config_path)
}

fn init_logging(config: &Config) {
    let level = config
        .log_level()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };

    let Some(config_path) = resolve_config_path(args.config) else {
        eprintln!("No configuration file found; pass --config or set {}", CONFIG_ENV);
        process::exit(2);
    };
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", config_path.display(), e);
            process::exit(2);
        }
    };

    init_logging(&config);
    info!(config = %config_path.display(), "Starting dbhandler...");

    // Without a connection there is nothing to do.
    let params = config.connection_params();
    let handler = match DatabaseHandler::with_options(&params, config.handler_options()) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let rows = match handler.read(&args.table, &args.conditions) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    for row in rows {
        match serde_json::to_string(&row) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Failed to encode row: {}", e);
                process::exit(2);
            }
        }
    }
}
