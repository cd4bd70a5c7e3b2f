//! Progress display for image loading and feature dumping

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar over a known number of items
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a bar for `total` items labelled with `prefix`
    pub fn new(total: usize, prefix: &str) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(prefix.to_string());
        Self { bar }
    }

    /// Create a bar that counts without drawing
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Mark one item as done
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Items completed so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Total items expected
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
