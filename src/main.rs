use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use dupecheck::adapters::{
    CsvOutputAdapter, FileSystemAdapter, JsonOutputAdapter, LinePathSource, ProgressBarAdapter,
    StreamingHasher, TextOutputAdapter,
};
use dupecheck::cli::{Cli, OutputFormat};
use dupecheck::logging::init_logging;
use dupecheck::ports::OutputPort;
use dupecheck::services::DuplicateFinderService;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process;

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        process::exit(1);
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = args.to_scan_config();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("cannot open path list {}", path.display())
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let paths = LinePathSource::new(reader);

    let sizes = FileSystemAdapter::new();
    let hasher = StreamingHasher::new().with_read_buffer(config.read_buffer_bytes);
    let progress = ProgressBarAdapter::new().with_quiet(args.quiet);

    let finder = DuplicateFinderService::new(sizes, hasher, progress);
    let report = finder.run(paths, &config)?;

    let output: Box<dyn OutputPort> = match args.output_format {
        OutputFormat::Text => {
            let adapter = match &args.output_file {
                Some(path) => TextOutputAdapter::with_file(path),
                None => TextOutputAdapter::with_stdout(),
            };
            Box::new(adapter.with_summary_only(args.summary_only))
        }
        OutputFormat::Json => match &args.output_file {
            Some(path) => Box::new(JsonOutputAdapter::with_file(path)),
            None => Box::new(JsonOutputAdapter::with_stdout()),
        },
        OutputFormat::Csv => match &args.output_file {
            Some(path) => Box::new(CsvOutputAdapter::with_file(path)),
            None => Box::new(CsvOutputAdapter::with_stdout()),
        },
    };
    output.write_report(&report)
}
