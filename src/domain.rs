use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Blake3,
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Outcome of hashing a file. A file that cannot be opened or read yields
/// `Unreadable` rather than an error, so one bad path never aborts a run.
/// Unreadable files are never bucketed as if they shared a digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signature {
    Readable(String),
    Unreadable,
}

impl Signature {
    pub fn digest(&self) -> Option<&str> {
        match self {
            Signature::Readable(hex) => Some(hex),
            Signature::Unreadable => None,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, Signature::Readable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub fast_signature: Option<Signature>,
    pub full_signature: Option<Signature>,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            fast_signature: None,
            full_signature: None,
        }
    }

    pub fn with_fast_signature(mut self, signature: Signature) -> Self {
        self.fast_signature = Some(signature);
        self
    }

    pub fn with_full_signature(mut self, signature: Signature) -> Self {
        self.full_signature = Some(signature);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Whole-file digest matches the reference.
    Full,
    /// Only the fast prefix digest matched; verification refuted (or could
    /// not confirm) byte equality.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub record: FileRecord,
    pub status: MatchStatus,
}

/// One fast-signature bucket with at least two members. The reference is the
/// first-seen member; `members` holds the rest in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub fast_digest: String,
    pub reference: FileRecord,
    pub members: Vec<GroupMember>,
}

impl DuplicateGroup {
    pub fn new(fast_digest: String, reference: FileRecord, members: Vec<GroupMember>) -> Self {
        Self {
            fast_digest,
            reference,
            members,
        }
    }

    /// Bytes occupied by the non-reference members, partial matches included.
    pub fn duplicate_bytes(&self) -> u64 {
        self.members.iter().map(|m| m.record.size).sum()
    }

    pub fn is_fully_verified(&self) -> bool {
        self.members.iter().all(|m| m.status == MatchStatus::Full)
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Bytes of file prefix hashed for the candidate-grouping signature.
    pub fast_signature_bytes: u64,
    /// Chunk size for whole-file hashing; bounds memory use per read.
    pub read_buffer_bytes: usize,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fast_signature_bytes: 1024,
            read_buffer_bytes: 64 * 1024,
            hash_algorithm: HashAlgorithm::Blake3,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fast_signature_bytes(mut self, bytes: u64) -> Self {
        self.fast_signature_bytes = bytes;
        self
    }

    pub fn with_read_buffer_bytes(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes;
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }
}

/// A path that could not be scanned. `size` is the measured length when
/// only the content read failed, or `None` when the size query itself
/// failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InaccessibleFile {
    pub path: PathBuf,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Duplicate groups in first-seen order of their reference member.
    pub groups: Vec<DuplicateGroup>,
    /// Paths whose size or fast signature could not be obtained. Excluded
    /// from grouping, still counted as checked.
    pub inaccessible: Vec<InaccessibleFile>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub duplicate_bytes: u64,
}

impl ScanReport {
    pub fn new(
        groups: Vec<DuplicateGroup>,
        inaccessible: Vec<InaccessibleFile>,
        total_files: usize,
        total_bytes: u64,
    ) -> Self {
        let duplicate_bytes = groups.iter().map(|g| g.duplicate_bytes()).sum();
        Self {
            groups,
            inaccessible,
            total_files,
            total_bytes,
            duplicate_bytes,
        }
    }

    pub fn duplicate_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn duplicate_file_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

/// Render a byte count with the largest of GiB/MiB/KiB where the scaled
/// value exceeds 0.5; anything below 512 bytes stays in plain bytes.
pub fn humanize_size(size: u64) -> String {
    for (limit, suffix) in [
        (1024u64 * 1024 * 1024, "GiB"),
        (1024 * 1024, "MiB"),
        (1024, "KiB"),
    ] {
        let scaled = size as f64 / limit as f64;
        if scaled > 0.5 {
            return format!("{:.2} {}", scaled, suffix);
        }
    }
    format!("{} B", size)
}
