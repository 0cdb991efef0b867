use clap::Parser;
use degrader::DegraderConfig;
use degrader::cli::Args;
use logging::{LogLevel, Logger};

fn main() {
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args);

    // Initialize logger
    let logger = initialize_logger(&config);

    logger.info("Channel degrader starting...");

    match degrader::run_files(&config, &args.input, &args.output, &logger) {
        Ok(summary) => {
            logger.info(&format!("Run complete: {}", summary));
            println!("{}", summary);
            if summary.partial_bytes > 0 {
                println!(
                    "Ignored {} trailing bytes (incomplete frame)",
                    summary.partial_bytes
                );
            }
            logger.shutdown();
        }
        Err(e) => {
            logger.error(&format!("Run failed: {}", e));
            logger.shutdown();
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &DegraderConfig) -> Logger {
    let log_level = config
        .logging
        .log_level
        .parse()
        .unwrap_or(LogLevel::Info);

    if config.logging.log_file_path.is_empty() {
        return Logger::stderr(log_level, "Main");
    }

    let log_path = std::path::Path::new(&config.logging.log_file_path);
    match Logger::with_component(log_path, log_level, "Main", config.logging.enable_console) {
        Ok(logger) => {
            println!(
                "Logging initialized: {} (level: {})",
                config.logging.log_file_path, config.logging.log_level
            );
            logger
        }
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            std::process::exit(1);
        }
    }
}

/// Loads configuration, then applies command-line overrides.
///
/// The file is taken from `--config` if given, otherwise searched for in
/// this order:
/// 1. DEGRADER_CONFIG environment variable
/// 2. ./config/degrader.json
/// 3. ./degrader.json
///
/// Without any file the defaults are used. An explicit `--config` that
/// cannot be loaded, or a configuration that fails validation, is fatal.
fn load_config(args: &Args) -> DegraderConfig {
    let mut config = match &args.config {
        Some(path) => match DegraderConfig::load_from_file(path) {
            Ok(c) => {
                println!("Configuration loaded from: {}", path.display());
                c
            }
            Err(e) => {
                eprintln!("Failed to load configuration from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => match DegraderConfig::locate() {
            Some(path) => match DegraderConfig::load_from_file(&path) {
                Ok(c) => {
                    println!("Configuration loaded from: {}", path.display());
                    c
                }
                Err(e) => {
                    eprintln!("Failed to load configuration from {}: {}", path.display(), e);
                    eprintln!("Using default values...");
                    DegraderConfig::default()
                }
            },
            None => DegraderConfig::default(),
        },
    };

    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    config
}
