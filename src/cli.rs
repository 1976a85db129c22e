use clap::Parser;
use std::path::PathBuf;

use crate::config::{Addressing, Dialect, EmptyCells, EncoderConfig, SizePolicy};

#[derive(Parser, Debug)]
#[command(author, version, about = "Export Tiled maps as GBA background data")]
pub struct Cli {
    /// Input Tiled .json / .tmj map
    pub input: PathBuf,
    /// Output base path; `.s`/`.c` and `.h` are derived from it
    pub output: PathBuf,

    /// JSON file with encoder settings; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub addressing: Option<Addressing>,

    #[arg(long, value_enum)]
    pub size_policy: Option<SizePolicy>,

    #[arg(long, value_enum)]
    pub dialect: Option<Dialect>,

    #[arg(long, value_enum)]
    pub empty_cells: Option<EmptyCells>,

    /// Mask tile indices above 1023 instead of failing
    #[arg(long)]
    pub truncate_tile_ids: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of `base`.
    pub fn apply(&self, base: EncoderConfig) -> EncoderConfig {
        EncoderConfig {
            addressing: self.addressing.unwrap_or(base.addressing),
            size_policy: self.size_policy.unwrap_or(base.size_policy),
            dialect: self.dialect.unwrap_or(base.dialect),
            empty_cells: self.empty_cells.unwrap_or(base.empty_cells),
            truncate_tile_ids: self.truncate_tile_ids || base.truncate_tile_ids,
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
