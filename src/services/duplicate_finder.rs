use crate::domain::{
    DuplicateGroup, FileRecord, GroupMember, InaccessibleFile, MatchStatus, ScanConfig,
    ScanReport, Signature,
};
use crate::ports::{FileSizePort, ProgressPort, SignaturePort};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// The grouping and verification engine. Owns all per-run state; nothing
/// survives between runs.
pub struct DuplicateFinderService<S, H, P> {
    sizes: S,
    hasher: H,
    progress: P,
}

impl<S, H, P> DuplicateFinderService<S, H, P>
where
    S: FileSizePort,
    H: SignaturePort,
    P: ProgressPort,
{
    pub fn new(sizes: S, hasher: H, progress: P) -> Self {
        Self {
            sizes,
            hasher,
            progress,
        }
    }

    /// Consume the path stream once, bucket by fast signature, then verify
    /// every multi-member bucket against whole-file digests. Paths are
    /// processed strictly in input order; repeated path strings are
    /// separate records.
    pub fn run<I>(&self, paths: I, config: &ScanConfig) -> Result<ScanReport>
    where
        I: IntoIterator<Item = String>,
    {
        let (buckets, inaccessible, total_files, total_bytes) = self.collect(paths, config);

        let candidates: Vec<(String, Vec<FileRecord>)> = buckets
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .collect();

        let groups = self.verify(candidates, config);

        Ok(ScanReport::new(groups, inaccessible, total_files, total_bytes))
    }

    /// First pass: one stat and one fast signature per path. Buckets keep
    /// first-seen order, both across groups and within a group.
    fn collect<I>(
        &self,
        paths: I,
        config: &ScanConfig,
    ) -> (
        Vec<(String, Vec<FileRecord>)>,
        Vec<InaccessibleFile>,
        usize,
        u64,
    )
    where
        I: IntoIterator<Item = String>,
    {
        let mut buckets: Vec<(String, Vec<FileRecord>)> = Vec::new();
        let mut bucket_index: HashMap<String, usize> = HashMap::new();
        let mut inaccessible: Vec<InaccessibleFile> = Vec::new();
        let mut total_files = 0usize;
        let mut total_bytes = 0u64;

        for path in paths {
            let path = PathBuf::from(path);
            total_files += 1;

            let size = match self.sizes.size_of(&path) {
                Ok(size) => size,
                Err(e) => {
                    log::warn!("cannot determine size of {}: {}", path.display(), e);
                    inaccessible.push(InaccessibleFile { path, size: None });
                    continue;
                }
            };
            total_bytes += size;

            let fast = self.hasher.fast_signature(
                &path,
                config.fast_signature_bytes,
                config.hash_algorithm,
            );
            let record = FileRecord::new(path, size).with_fast_signature(fast.clone());

            match fast {
                Signature::Readable(digest) => match bucket_index.get(&digest) {
                    Some(&i) => buckets[i].1.push(record),
                    None => {
                        bucket_index.insert(digest.clone(), buckets.len());
                        buckets.push((digest, vec![record]));
                    }
                },
                Signature::Unreadable => {
                    log::warn!("cannot read {}", record.path.display());
                    inaccessible.push(InaccessibleFile {
                        path: record.path,
                        size: Some(record.size),
                    });
                }
            }
        }

        (buckets, inaccessible, total_files, total_bytes)
    }

    /// Second pass: whole-file digests for every member of every candidate
    /// bucket. The first-seen member is the reference; the rest are
    /// classified against it.
    fn verify(
        &self,
        candidates: Vec<(String, Vec<FileRecord>)>,
        config: &ScanConfig,
    ) -> Vec<DuplicateGroup> {
        let to_verify: u64 = candidates.iter().map(|(_, files)| files.len() as u64).sum();
        self.progress.start(to_verify);

        let mut processed = 0u64;
        let mut groups = Vec::new();

        for (digest, files) in candidates {
            let mut files = files.into_iter();
            let Some(reference) = files.next() else {
                continue;
            };

            let reference_full =
                self.hasher.full_signature(&reference.path, config.hash_algorithm);
            let reference = reference.with_full_signature(reference_full.clone());
            processed += 1;
            self.progress.update(processed);

            let members: Vec<GroupMember> = files
                .map(|record| {
                    let full = self.hasher.full_signature(&record.path, config.hash_algorithm);
                    processed += 1;
                    self.progress.update(processed);

                    let status = match (reference_full.digest(), full.digest()) {
                        (Some(reference_digest), Some(digest))
                            if reference_digest == digest =>
                        {
                            MatchStatus::Full
                        }
                        // Differing digests, or either side unreadable at
                        // verification time: the prefix match stands but
                        // whole-file equality is not established.
                        _ => MatchStatus::Partial,
                    };
                    GroupMember {
                        record: record.with_full_signature(full),
                        status,
                    }
                })
                .collect();

            log::debug!(
                "group {}: {} member(s) against {}",
                digest,
                members.len(),
                reference.path.display()
            );
            groups.push(DuplicateGroup::new(digest, reference, members));
        }

        self.progress.finish();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HashAlgorithm;
    use crate::ports::{FileSizePort, ProgressPort, SignaturePort};
    use anyhow::anyhow;
    use std::path::Path;

    struct FixedSizes(u64);

    impl FileSizePort for FixedSizes {
        fn size_of(&self, path: &Path) -> anyhow::Result<u64> {
            if path.ends_with("no-stat") {
                Err(anyhow!("stat failed"))
            } else {
                Ok(self.0)
            }
        }
    }

    /// All readable files share one prefix digest and one whole-file digest;
    /// listed paths read as unreadable in the given phase.
    struct ScriptedHasher {
        fast_unreadable: Vec<&'static str>,
        full_unreadable: Vec<&'static str>,
    }

    impl SignaturePort for ScriptedHasher {
        fn fast_signature(&self, path: &Path, _limit: u64, _algorithm: HashAlgorithm) -> Signature {
            if self.fast_unreadable.iter().any(|p| path.ends_with(p)) {
                Signature::Unreadable
            } else {
                Signature::Readable("prefix".into())
            }
        }

        fn full_signature(&self, path: &Path, _algorithm: HashAlgorithm) -> Signature {
            if self.full_unreadable.iter().any(|p| path.ends_with(p)) {
                Signature::Unreadable
            } else {
                Signature::Readable("whole".into())
            }
        }
    }

    struct NoProgress;

    impl ProgressPort for NoProgress {
        fn start(&self, _total: u64) {}
        fn update(&self, _processed: u64) {}
        fn finish(&self) {}
    }

    fn service(
        hasher: ScriptedHasher,
    ) -> DuplicateFinderService<FixedSizes, ScriptedHasher, NoProgress> {
        DuplicateFinderService::new(FixedSizes(8), hasher, NoProgress)
    }

    #[test]
    fn reference_unreadable_at_verification_leaves_members_partial() {
        let hasher = ScriptedHasher {
            fast_unreadable: vec![],
            full_unreadable: vec!["ref"],
        };
        let report = service(hasher)
            .run(
                ["ref".into(), "m1".into(), "m2".into()],
                &ScanConfig::default(),
            )
            .unwrap();

        assert_eq!(report.duplicate_group_count(), 1);
        let group = &report.groups[0];
        assert_eq!(group.reference.full_signature, Some(Signature::Unreadable));
        assert_eq!(group.members.len(), 2);
        assert!(
            group
                .members
                .iter()
                .all(|m| m.status == MatchStatus::Partial)
        );
    }

    #[test]
    fn member_unreadable_at_verification_is_partial_not_full() {
        let hasher = ScriptedHasher {
            fast_unreadable: vec![],
            full_unreadable: vec!["m1"],
        };
        let report = service(hasher)
            .run(
                ["ref".into(), "m1".into(), "m2".into()],
                &ScanConfig::default(),
            )
            .unwrap();

        let group = &report.groups[0];
        assert_eq!(group.members[0].status, MatchStatus::Partial);
        assert_eq!(group.members[1].status, MatchStatus::Full);
    }

    #[test]
    fn read_failure_keeps_the_measured_size_but_stat_failure_does_not() {
        let hasher = ScriptedHasher {
            fast_unreadable: vec!["no-read"],
            full_unreadable: vec![],
        };
        let report = service(hasher)
            .run(["no-read".into(), "no-stat".into()], &ScanConfig::default())
            .unwrap();

        assert_eq!(
            report.inaccessible,
            vec![
                InaccessibleFile {
                    path: "no-read".into(),
                    size: Some(8),
                },
                InaccessibleFile {
                    path: "no-stat".into(),
                    size: None,
                },
            ]
        );
        // Only the measured size contributes to the total.
        assert_eq!(report.total_bytes, 8);
        assert_eq!(report.total_files, 2);
    }
}
