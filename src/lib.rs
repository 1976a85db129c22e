pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::EncoderConfig;
use writer::sink::FileSinks;

pub use error::EncodeError;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.log_level());

    // 1. ── Configure ──────────────────────────────────────────────────
    let base = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            serde_json::from_str::<EncoderConfig>(&text)
                .with_context(|| format!("Parsing config {}", path.display()))?
        }
        None => EncoderConfig::default(),
    };
    let config = args.apply(base);
    tracing::debug!("encoder config: {config:?}");

    // 2. ── Parse ──────────────────────────────────────────────────────
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let map = parser::load_from_json(&json)
        .with_context(|| format!("Parsing map {}", args.input.display()))?;

    // 3. ── Encode ─────────────────────────────────────────────────────
    let encoded = processor::encode(&map, &config).with_context(|| "Encoding map layers")?;

    // 4. ── Write outputs ──────────────────────────────────────────────
    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    }
    let (data, header) = writer::emit(&encoded, config.dialect, &args.output, &FileSinks)
        .with_context(|| "Writing map artifacts")?;

    println!("{}", data.display());
    println!("{}", header.display());
    Ok(())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a host may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
