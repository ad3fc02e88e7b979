use crate::domain::{HashAlgorithm, Signature};
use crate::ports::SignaturePort;
use anyhow::Result;
use blake3::Hasher as Blake3Hasher;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Streams file content through a fixed-size buffer and into the selected
/// digest. One handle and one buffer are live at a time; the handle is
/// dropped as soon as the digest is finalized.
pub struct StreamingHasher {
    read_buffer_bytes: usize,
}

impl StreamingHasher {
    pub fn new() -> Self {
        Self {
            read_buffer_bytes: 64 * 1024,
        }
    }

    pub fn with_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(1);
        self
    }

    fn hash_buffered(
        &self,
        path: &Path,
        limit: Option<u64>,
        algorithm: HashAlgorithm,
    ) -> Result<String> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; self.read_buffer_bytes];
        let mut bytes_hashed = 0u64;

        match algorithm {
            HashAlgorithm::Blake3 => {
                let mut hasher = Blake3Hasher::new();
                Self::feed_chunks(&mut reader, &mut buffer, limit, &mut bytes_hashed, |data| {
                    hasher.update(data);
                })?;
                Ok(hasher.finalize().to_hex().to_string())
            }
            HashAlgorithm::Md5 => {
                let mut hasher = md5::Context::new();
                Self::feed_chunks(&mut reader, &mut buffer, limit, &mut bytes_hashed, |data| {
                    hasher.consume(data);
                })?;
                Ok(format!("{:x}", hasher.compute()))
            }
            HashAlgorithm::Sha1 => {
                let mut hasher = Sha1::new();
                Self::feed_chunks(&mut reader, &mut buffer, limit, &mut bytes_hashed, |data| {
                    hasher.update(data);
                })?;
                Ok(format!("{:x}", hasher.finalize()))
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                Self::feed_chunks(&mut reader, &mut buffer, limit, &mut bytes_hashed, |data| {
                    hasher.update(data);
                })?;
                Ok(format!("{:x}", hasher.finalize()))
            }
        }
    }

    fn feed_chunks<F>(
        reader: &mut BufReader<File>,
        buffer: &mut [u8],
        limit: Option<u64>,
        bytes_hashed: &mut u64,
        mut update_fn: F,
    ) -> Result<()>
    where
        F: FnMut(&[u8]),
    {
        loop {
            let window = match limit {
                Some(limit) => {
                    let remaining = limit.saturating_sub(*bytes_hashed);
                    if remaining == 0 {
                        break;
                    }
                    buffer.len().min(remaining as usize)
                }
                None => buffer.len(),
            };

            let bytes_read = reader.read(&mut buffer[..window])?;
            if bytes_read == 0 {
                break;
            }

            update_fn(&buffer[..bytes_read]);
            *bytes_hashed += bytes_read as u64;
        }
        Ok(())
    }
}

impl Default for StreamingHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SignaturePort for StreamingHasher {
    fn fast_signature(&self, path: &Path, limit: u64, algorithm: HashAlgorithm) -> Signature {
        match self.hash_buffered(path, Some(limit), algorithm) {
            Ok(digest) => Signature::Readable(digest),
            Err(e) => {
                log::debug!("cannot read {} for fast signature: {}", path.display(), e);
                Signature::Unreadable
            }
        }
    }

    fn full_signature(&self, path: &Path, algorithm: HashAlgorithm) -> Signature {
        match self.hash_buffered(path, None, algorithm) {
            Ok(digest) => Signature::Readable(digest),
            Err(e) => {
                log::debug!("cannot read {} for full signature: {}", path.display(), e);
                Signature::Unreadable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn empty_file_hashes_to_empty_input_digest() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "empty", b"");
        let hasher = StreamingHasher::new();

        let fast = hasher.fast_signature(&path, 1024, HashAlgorithm::Md5);
        let full = hasher.full_signature(&path, HashAlgorithm::Md5);

        // Known MD5 of the empty input.
        assert_eq!(fast.digest(), Some("d41d8cd98f00b204e9800998ecf8518e"));
        assert_eq!(fast, full);
    }

    #[test]
    fn fast_equals_full_when_file_fits_in_prefix() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "small", b"hello world 1234");
        let hasher = StreamingHasher::new();

        for algorithm in [
            HashAlgorithm::Blake3,
            HashAlgorithm::Md5,
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
        ] {
            let fast = hasher.fast_signature(&path, 1024, algorithm);
            let full = hasher.full_signature(&path, algorithm);
            assert!(fast.is_readable());
            assert_eq!(fast, full, "fast/full diverged for {}", algorithm.as_str());
        }
    }

    #[test]
    fn fast_signature_ignores_bytes_past_the_limit() {
        let dir = tempdir().unwrap();
        let mut content = vec![b'a'; 2048];
        let a = write_file(dir.path(), "a", &content);
        content[1500] = b'z';
        let b = write_file(dir.path(), "b", &content);
        let hasher = StreamingHasher::new();

        let fast_a = hasher.fast_signature(&a, 1024, HashAlgorithm::Blake3);
        let fast_b = hasher.fast_signature(&b, 1024, HashAlgorithm::Blake3);
        assert_eq!(fast_a, fast_b);

        let full_a = hasher.full_signature(&a, HashAlgorithm::Blake3);
        let full_b = hasher.full_signature(&b, HashAlgorithm::Blake3);
        assert_ne!(full_a, full_b);
    }

    #[test]
    fn fast_signature_sees_changes_within_the_limit() {
        let dir = tempdir().unwrap();
        let mut content = vec![b'a'; 2048];
        let a = write_file(dir.path(), "a", &content);
        content[10] = b'z';
        let b = write_file(dir.path(), "b", &content);
        let hasher = StreamingHasher::new();

        let fast_a = hasher.fast_signature(&a, 1024, HashAlgorithm::Blake3);
        let fast_b = hasher.fast_signature(&b, 1024, HashAlgorithm::Blake3);
        assert_ne!(fast_a, fast_b);
    }

    #[test]
    fn buffer_size_does_not_change_the_digest() {
        let dir = tempdir().unwrap();
        let content: Vec<u8> = (0..300u32).flat_map(|n| n.to_le_bytes()).collect();
        let path = write_file(dir.path(), "data", &content);

        let small = StreamingHasher::new().with_read_buffer(7);
        let large = StreamingHasher::new();
        assert_eq!(
            small.full_signature(&path, HashAlgorithm::Sha256),
            large.full_signature(&path, HashAlgorithm::Sha256)
        );
        assert_eq!(
            small.fast_signature(&path, 100, HashAlgorithm::Sha256),
            large.fast_signature(&path, 100, HashAlgorithm::Sha256)
        );
    }

    #[test]
    fn unreadable_path_yields_unreadable_signature() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let hasher = StreamingHasher::new();

        assert_eq!(
            hasher.fast_signature(&missing, 1024, HashAlgorithm::Blake3),
            Signature::Unreadable
        );
        assert_eq!(
            hasher.full_signature(&missing, HashAlgorithm::Blake3),
            Signature::Unreadable
        );
    }
}
