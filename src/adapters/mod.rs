pub mod filesystem;
pub mod hasher;
pub mod output;
pub mod progress;

pub use filesystem::{FileSystemAdapter, LinePathSource};
pub use hasher::StreamingHasher;
pub use output::{CsvOutputAdapter, JsonOutputAdapter, TextOutputAdapter};
pub use progress::ProgressBarAdapter;
