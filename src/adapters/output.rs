use crate::domain::{MatchStatus, ScanReport, humanize_size};
use crate::ports::OutputPort;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

struct OutputWriter {
    output_file: Option<String>,
}

impl OutputWriter {
    fn with_stdout() -> Self {
        Self { output_file: None }
    }

    fn with_file(path: &Path) -> Self {
        Self {
            output_file: Some(path.to_string_lossy().to_string()),
        }
    }

    fn write_content(&self, content: &str) -> Result<()> {
        match &self.output_file {
            Some(path) => std::fs::write(path, content)?,
            None => print!("{}", content),
        }
        Ok(())
    }
}

/// Human-readable report in the classic shape: a `size filename` header,
/// one block per duplicate group (reference first, then each member with a
/// `!` marker when only the prefix matched), an unreadable-files section,
/// and a one-line summary.
pub struct TextOutputAdapter {
    writer: OutputWriter,
    summary_only: bool,
}

impl TextOutputAdapter {
    pub fn new() -> Self {
        Self::with_stdout()
    }

    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::with_stdout(),
            summary_only: false,
        }
    }

    pub fn with_file(path: &Path) -> Self {
        Self {
            writer: OutputWriter::with_file(path),
            summary_only: false,
        }
    }

    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    pub fn render(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        if !self.summary_only {
            let _ = writeln!(out, "{:>10}   {}", "size", "filename");

            for group in &report.groups {
                let _ = writeln!(
                    out,
                    "{:>10}   {}",
                    group.reference.size,
                    group.reference.path.display()
                );
                for member in &group.members {
                    let (marker, annotation) = match member.status {
                        MatchStatus::Full => (' ', ""),
                        MatchStatus::Partial => ('!', " partial match only!"),
                    };
                    let _ = writeln!(
                        out,
                        "{:>10} {} {}{}",
                        member.record.size,
                        marker,
                        member.record.path.display(),
                        annotation
                    );
                }
                out.push('\n');
            }

            if !report.inaccessible.is_empty() {
                let _ = writeln!(out, "could not read {} file(s):", report.inaccessible.len());
                for record in &report.inaccessible {
                    // A dash means even the size query failed.
                    let size = record
                        .size
                        .map_or_else(|| "-".to_string(), |s| s.to_string());
                    let _ = writeln!(out, "{:>10} ! {}", size, record.path.display());
                }
                out.push('\n');
            }
        }

        let _ = writeln!(
            out,
            "{} files checked ({}), {} duplicates ({}).",
            report.total_files,
            humanize_size(report.total_bytes),
            report.duplicate_group_count(),
            humanize_size(report.duplicate_bytes)
        );

        out
    }
}

impl Default for TextOutputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for TextOutputAdapter {
    fn write_report(&self, report: &ScanReport) -> Result<()> {
        self.writer.write_content(&self.render(report))
    }
}

pub struct JsonOutputAdapter {
    writer: OutputWriter,
}

impl JsonOutputAdapter {
    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::with_stdout(),
        }
    }

    pub fn with_file(path: &Path) -> Self {
        Self {
            writer: OutputWriter::with_file(path),
        }
    }
}

impl OutputPort for JsonOutputAdapter {
    fn write_report(&self, report: &ScanReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_content(&format!("{}\n", json))
    }
}

pub struct CsvOutputAdapter {
    writer: OutputWriter,
}

impl CsvOutputAdapter {
    pub fn with_stdout() -> Self {
        Self {
            writer: OutputWriter::with_stdout(),
        }
    }

    pub fn with_file(path: &Path) -> Self {
        Self {
            writer: OutputWriter::with_file(path),
        }
    }

    fn format_csv_string(&self, report: &ScanReport) -> String {
        let mut out = String::new();
        out.push_str("group_id,fast_digest,path,size,status\n");
        for (group_id, group) in report.groups.iter().enumerate() {
            let _ = writeln!(
                out,
                "{},{},{},{},reference",
                group_id + 1,
                group.fast_digest,
                group.reference.path.display(),
                group.reference.size
            );
            for member in &group.members {
                let status = match member.status {
                    MatchStatus::Full => "full_match",
                    MatchStatus::Partial => "partial_match",
                };
                let _ = writeln!(
                    out,
                    "{},{},{},{},{}",
                    group_id + 1,
                    group.fast_digest,
                    member.record.path.display(),
                    member.record.size,
                    status
                );
            }
        }
        out
    }
}

impl OutputPort for CsvOutputAdapter {
    fn write_report(&self, report: &ScanReport) -> Result<()> {
        self.writer.write_content(&self.format_csv_string(report))
    }
}
