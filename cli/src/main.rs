//! includeres CLI - inline resources into PostScript documents

use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use psincluderes::{
    detect_format_from_bytes, Error, InlineOptions, Inliner, Result, SearchPath, HEADER_LEN,
};

#[derive(Parser)]
#[command(name = "includeres")]
#[command(version)]
#[command(about = "Include resources in a PostScript document", long_about = None)]
#[command(
    after_help = "Resources are looked up as <name><extension> in each search directory.\n\
                  %%DocumentNeededResources comments are not altered."
)]
struct Cli {
    /// Input file; `-` or no INFILE means standard input
    #[arg(value_name = "INFILE")]
    input: Option<PathBuf>,

    /// Output file; `-` or no OUTFILE means standard output
    #[arg(value_name = "OUTFILE")]
    output: Option<PathBuf>,

    /// Append a directory to the resource search path
    #[arg(short = 'I', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /// Replace the default search path (current directory) with a list of
    /// directories separated as in PATH
    #[arg(long, env = "PSRESOURCEPATH", value_name = "PATHS")]
    resource_path: Option<OsString>,

    /// Exit with an error if a resource cannot be found
    #[arg(short, long)]
    strict: bool,

    /// Write a JSON summary of the run to FILE
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let search_path = build_search_path(cli.resource_path.as_deref(), &cli.include_dirs);
    log::debug!("search path: {:?}", search_path.dirs());

    let mut input = open_input(cli.input.as_deref())?;
    let header = read_header(&mut input).map_err(Error::InputRead)?;
    check_format(&header)?;
    // the header goes back in front of the unread rest
    let input = BufReader::new(Cursor::new(header).chain(input));
    let output = open_output(cli.output.as_deref())?;

    let mut options = InlineOptions::new();
    if cli.strict {
        options = options.strict();
    }

    let report = Inliner::with_options(search_path, options).run(input, output)?;

    if let Some(path) = &cli.report {
        fs::write(path, report.to_json()?)?;
    }

    Ok(())
}

fn build_search_path(resource_path: Option<&OsStr>, include_dirs: &[PathBuf]) -> SearchPath {
    let mut search_path = match resource_path {
        Some(list) => SearchPath::from_path_list(list),
        None => SearchPath::new(),
    };
    for dir in include_dirs {
        search_path.push(dir);
    }
    search_path
}

fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            let file = File::open(path).map_err(Error::InputRead)?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) if !is_stdio(Some(path)) => {
            let file = File::create(path).map_err(Error::OutputWrite)?;
            Ok(Box::new(BufWriter::new(file)))
        }
        _ => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Read up to [`HEADER_LEN`] bytes, across as many short reads as a pipe
/// needs. Shorter only at end of input.
fn read_header<R: Read>(input: &mut R) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    input.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Refuse input this filter cannot handle.
fn check_format(header: &[u8]) -> Result<()> {
    match detect_format_from_bytes(header) {
        Ok(format) => {
            log::debug!("input is {}", format);
            Ok(())
        }
        Err(Error::UnknownFormat) => {
            if !header.is_empty() {
                log::warn!("input does not start with a PostScript header");
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
