fn main() -> ExitCode {
    env_logger::init();
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    if let Some(config) = args.config.as_deref() {
        if let Err(e) = config::init_config_toml(config) {
            eprintln!("fail to load config, {e}");
            return ExitCode::FAILURE;
        }
    }
    let mut packer = Packer::new();
    args.inputs.iter().for_each(|input| {
        packer.input(input);
    });
    let result = packer
        .out_dir_path(args.out_dir.unwrap_or_else(config::out_dir))
        .max_open_files(args.max_open_files.unwrap_or_else(config::max_open_files))
        .run();
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fail to pack traces, {e}");
            ExitCode::FAILURE
        }
    }
}

use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode};

use clap::{error::ErrorKind, Parser};
use trace_iolog::{config, pack::Packer};

/// Split Tencent block traces (csv files, .tar.gz archives or directories) into one binary trace per volume
#[derive(Debug, clap::Parser)]
#[command(name = "tracepack", arg_required_else_help = true)]
struct Cli {
    /// configuration file in toml format
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// directory of the per-volume binary traces, overrides the config
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// max number of output traces kept open, overrides the config
    #[arg(short, long)]
    max_open_files: Option<NonZeroUsize>,
    /// csv traces, .tar.gz archives of them, or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}
