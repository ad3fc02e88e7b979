use crate::domain::{HashAlgorithm, ScanConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, ValueEnum)]
pub enum HashAlgorithmChoice {
    #[value(help = "Fast cryptographic hash (default)")]
    Blake3,
    #[value(help = "Legacy hash, matches reports from the original tool")]
    Md5,
    #[value(help = "Legacy cryptographic hash")]
    Sha1,
    #[value(help = "Cryptographic hash")]
    Sha256,
}

impl From<HashAlgorithmChoice> for HashAlgorithm {
    fn from(choice: HashAlgorithmChoice) -> Self {
        match choice {
            HashAlgorithmChoice::Blake3 => HashAlgorithm::Blake3,
            HashAlgorithmChoice::Md5 => HashAlgorithm::Md5,
            HashAlgorithmChoice::Sha1 => HashAlgorithm::Sha1,
            HashAlgorithmChoice::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "dupecheck")]
#[command(about = "Find duplicate files in a path list by comparing content hashes")]
#[command(
    long_about = "Reads newline-separated file paths from stdin (or a file) and reports \
                  duplicates. Files are first grouped by a hash of their leading bytes; \
                  groups are then verified against whole-file hashes, and members that \
                  only share the prefix are flagged as partial matches.\n\n\
                  Example: find ~/media -type f -size +10M | dupecheck"
)]
#[command(version)]
pub struct Cli {
    #[arg(help = "File containing the path list, one path per line (stdin if omitted)")]
    pub input: Option<PathBuf>,

    #[arg(
        long = "fast-bytes",
        help = "Number of leading bytes hashed for candidate grouping",
        default_value = "1024"
    )]
    pub fast_bytes: u64,

    #[arg(
        long = "read-buffer",
        help = "Chunk size in bytes for whole-file hashing",
        default_value = "65536"
    )]
    pub read_buffer: usize,

    #[arg(
        short = 'a',
        long = "algorithm",
        help = "Hash algorithm to use",
        value_enum,
        default_value = "blake3"
    )]
    pub hash_algorithm: HashAlgorithmChoice,

    #[arg(
        short = 'f',
        long = "format",
        help = "Output format",
        value_enum,
        default_value = "text"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'o',
        long = "output",
        help = "Output file for json/csv formats (stdout if not specified)"
    )]
    pub output_file: Option<PathBuf>,

    #[arg(
        long = "summary-only",
        help = "Show only the summary line, not the duplicate groups"
    )]
    pub summary_only: bool,

    #[arg(short = 'q', long = "quiet", help = "Suppress progress and warnings")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,
}

impl Cli {
    pub fn to_scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_fast_signature_bytes(self.fast_bytes)
            .with_read_buffer_bytes(self.read_buffer)
            .with_hash_algorithm(self.hash_algorithm.clone().into())
    }
}
