use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressBarAdapter {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressBarAdapter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>6}/{len:6} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        Self { bar, quiet: false }
    }

    pub fn new_quiet() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            quiet: true,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.bar = ProgressBar::hidden();
        }
        self
    }
}

impl Default for ProgressBarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for ProgressBarAdapter {
    fn start(&self, total: u64) {
        if self.quiet {
            return;
        }
        self.bar.set_length(total);
        self.bar.set_message("verifying candidates");
    }

    fn update(&self, processed: u64) {
        if self.quiet {
            return;
        }
        self.bar.set_position(processed);
    }

    fn finish(&self) {
        if self.quiet {
            return;
        }
        self.bar.finish_and_clear();
    }
}
