use std::path::PathBuf;
use std::process;

use artifact_validator::descriptor::{self, HeaderInfo, Info, Validate};
use artifact_validator::errors::*;
use artifact_validator::{check_header, HeaderStructureValidator};
use clap::Parser;
use error_chain::ChainedError;
use log::*;
use simplelog::*;

/// Validates an unpacked artifact header before installation.
#[derive(Parser, Debug)]
#[command(name = "header-check", version)]
struct Cli {
    /// Unpacked header directory
    header_dir: PathBuf,

    /// Artifact info descriptor to validate as well
    #[arg(long)]
    info: Option<PathBuf>,

    /// Header info descriptor to validate as well
    #[arg(long)]
    header_info: Option<PathBuf>,

    /// Log every accepted header entry
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if CombinedLogger::init(vec![WriteLogger::new(level, Config::default(), std::io::stderr())]).is_err() {
        eprintln!("Could not create logger");
    }

    match run(&cli) {
        Ok(_) => info!("{:?} passed validation", cli.header_dir),
        Err(e) => {
            error!("{}", e.display_chain().to_string());
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.info {
        descriptor::load::<Info, _>(path)?.validate()?;
    }
    if let Some(path) = &cli.header_info {
        descriptor::load::<HeaderInfo, _>(path)?.validate()?;
    }
    check_header(&HeaderStructureValidator::new(), &cli.header_dir)?;
    return Ok(());
}
