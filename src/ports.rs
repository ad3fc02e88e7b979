use crate::domain::{HashAlgorithm, ScanReport, Signature};
use anyhow::Result;
use std::path::Path;

pub trait FileSizePort {
    fn size_of(&self, path: &Path) -> Result<u64>;
}

pub trait SignaturePort {
    /// Digest of the first `limit` bytes of the file. Shorter files hash
    /// whatever is there; a zero-byte file hashes the empty input.
    fn fast_signature(&self, path: &Path, limit: u64, algorithm: HashAlgorithm) -> Signature;

    /// Digest of the whole file, streamed through a bounded buffer.
    fn full_signature(&self, path: &Path, algorithm: HashAlgorithm) -> Signature;
}

pub trait OutputPort {
    fn write_report(&self, report: &ScanReport) -> Result<()>;
}

pub trait ProgressPort {
    fn start(&self, total: u64);
    fn update(&self, processed: u64);
    fn finish(&self);
}
