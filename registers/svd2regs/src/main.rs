// Licensed under the Apache-2.0 license

//! Command-line front end: reads one SVD file and writes the generated
//! register accessors to one Rust source file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{error::ErrorKind, Parser, ValueEnum};
use log::LevelFilter;
use mcu_registers_svd_generator::{
    generate, Document, GeneratorConfig, PeripheralFilter, Strategy,
};
use simple_logger::SimpleLogger;

const EXIT_MISSING_ARGUMENT: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_BAD_INPUT: u8 = 3;
const EXIT_WRITE_FAILED: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Base addresses fixed at compile time
    Fixed,
    /// Base addresses supplied at run time
    Runtime,
    /// Both styles side by side
    Both,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fixed => Strategy::Fixed,
            StrategyArg::Runtime => Strategy::Runtime,
            StrategyArg::Both => Strategy::Both,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "svd2regs",
    author,
    version,
    about = "Generate type-safe register accessors from a CMSIS-SVD description"
)]
struct Cli {
    /// Path to the SVD document
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path of the Rust file to write
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Accessor styles to emit
    #[arg(short = 's', long = "strategy", value_enum, default_value_t = StrategyArg::Both)]
    strategy: StrategyArg,

    /// Re-export the runtime library from this path instead of embedding it
    #[arg(long = "no-runtime", value_name = "PATH", num_args = 0..=1,
          default_missing_value = "mcu_registers_svd_generator::regbase")]
    no_runtime: Option<String>,

    /// Leave out a peripheral by name (case-insensitive); may be repeated
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Log dedup decisions and other details
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        let filter = self
            .exclude
            .iter()
            .fold(PeripheralFilter::new(), |f, name| f.exclude_name(name));
        let config = GeneratorConfig::new()
            .strategy(self.strategy.into())
            .filter(filter);
        match &self.no_runtime {
            Some(path) => config.external_runtime(path),
            None => config,
        }
    }
}

fn load(path: &Path) -> anyhow::Result<Document> {
    Document::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn run(cli: Cli) -> Result<(), u8> {
    let Some(input) = cli.input.as_deref() else {
        eprintln!("Missing input SVD file; pass it with --input <FILE>");
        return Err(EXIT_MISSING_ARGUMENT);
    };
    let Some(output) = cli.output.as_deref() else {
        eprintln!("Missing output file; pass it with --output <FILE>");
        return Err(EXIT_MISSING_ARGUMENT);
    };

    let document = load(input).map_err(|e| {
        log::error!("{e:#}");
        EXIT_BAD_INPUT
    })?;
    let code = generate(&document, &cli.config());

    std::fs::write(output, code)
        .with_context(|| format!("Failed to write {}", output.display()))
        .map_err(|e| {
            log::error!("{e:#}");
            EXIT_WRITE_FAILED
        })?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}
