//! memsim - replays page-replacement policies and lays out memory segments.
//!
//! Usage:
//!   memsim run --pages "7 0 1 2 0 3" --frames 3 --algorithm LRU
//!   memsim run --pages "1,2,3,4" --segments Code=2,Data=1 --pretty
//!   memsim request request.json       # JSON body as the web front end sends it
//!   memsim request -                  # same, read from stdin
//!   memsim compare --pages "1 2 3 4 1 2 5 1 2 3" --frames 3
//!   memsim run --pages "1 2" --image table.bin  # also write the packed page table
//!
//! The response is printed as JSON on stdout. A rejected request prints
//! `{"error": ...}` and exits with status 2.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use memsim_error::Error;
use serde_json::{Map, Value};
use simulator::{
    error_body, handle, PageTableImage, Policy, SimulationRequest, SimulationResponse,
    DEFAULT_FRAMES,
};

/// Page-replacement and segmentation simulator
#[derive(Parser)]
#[command(name = "memsim", version)]
#[command(about = "Replays FIFO, LRU and Optimal page replacement and builds segment page tables")]
struct Cli {
    /// Log each eviction (-v) or each step (-vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    /// Also write the packed page-table image of the first response to FILE
    #[arg(long, global = true, value_name = "FILE")]
    image: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a reference string given on the command line
    Run {
        #[command(flatten)]
        input: Input,

        /// FIFO, LRU or Optimal
        #[arg(short, long, default_value = "FIFO")]
        algorithm: String,
    },

    /// Simulate a JSON request read from a file, or stdin with `-`
    Request {
        #[arg(default_value = "-")]
        file: PathBuf,
    },

    /// Simulate the same input under every policy
    Compare {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(clap::Args)]
struct Input {
    /// Reference string; pages separated by spaces or commas
    #[arg(short, long)]
    pages: String,

    /// Number of physical frames
    #[arg(short, long, default_value_t = DEFAULT_FRAMES, allow_negative_numbers = true)]
    frames: i64,

    /// Segment sizes in pages, e.g. Code=2,Data=2,Stack=1,Heap=1
    #[arg(short, long, value_delimiter = ',')]
    segments: Vec<String>,
}

impl Input {
    fn to_request(&self, algorithm: &str) -> Result<SimulationRequest> {
        Ok(SimulationRequest {
            pages: self.pages.clone(),
            frames: Some(Value::from(self.frames)),
            algorithm: Some(algorithm.to_string()),
            segments: self.segment_map()?,
        })
    }

    /// Sizes stay strings so that malformed ones reach the simulator and come
    /// back as a segment error instead of aborting the run.
    fn segment_map(&self) -> Result<Option<Map<String, Value>>> {
        if self.segments.is_empty() {
            return Ok(None);
        }
        let mut map = Map::new();
        for segment in &self.segments {
            let (name, size) = segment
                .split_once('=')
                .with_context(|| format!("segment {:?} is not of the form NAME=PAGES", segment))?;
            map.insert(name.trim().to_string(), Value::String(size.trim().to_string()));
        }
        Ok(Some(map))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let requests = match &cli.command {
        Commands::Run { input, algorithm } => vec![input.to_request(algorithm)?],
        Commands::Request { file } => match SimulationRequest::from_json(&read_body(file)?) {
            Ok(request) => vec![request],
            Err(err) => return reject(&err),
        },
        Commands::Compare { input } => Policy::ALL
            .iter()
            .map(|policy| input.to_request(policy.name()))
            .collect::<Result<Vec<_>>>()?,
    };

    let mut responses = Vec::with_capacity(requests.len());
    for request in &requests {
        debug!("request: {:?}", request);
        match handle(request) {
            Ok(response) => responses.push(response),
            Err(err) => return reject(&err),
        }
    }

    let mut stdout = io::stdout().lock();
    match responses.as_slice() {
        [response] => write_json(&mut stdout, response, cli.pretty)?,
        _ => write_json(&mut stdout, &responses, cli.pretty)?,
    }

    if let Some(response) = responses.first() {
        report_segment_error(response);
        if let Some(path) = &cli.image {
            write_image(path, response)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_body(file: &PathBuf) -> Result<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut body = Vec::new();
        io::stdin()
            .read_to_end(&mut body)
            .context("failed to read request from stdin")?;
        return Ok(body);
    }
    fs::read(file).with_context(|| format!("failed to read {}", file.display()))
}

/// Prints the error body for a request the simulator refused.
fn reject(err: &Error) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&error_body(err))?;
    writeln!(stdout)?;
    Ok(match err.status() {
        400 => ExitCode::from(2),
        _ => ExitCode::from(1),
    })
}

fn report_segment_error(response: &SimulationResponse) {
    if let Some(err) = &response.segment_error {
        eprintln!("warning: {}", err);
    }
}

fn write_image(path: &PathBuf, response: &SimulationResponse) -> Result<()> {
    let image = response.layout.page_table.to_image()?;
    let decoded = PageTableImage::new(image.clone())?;
    debug!(
        "page table image: {} entries over {} segments, {} bytes",
        decoded.entry_count(),
        decoded.segment_count(),
        image.len()
    );
    fs::write(path, &image).with_context(|| format!("failed to write {}", path.display()))
}

fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
