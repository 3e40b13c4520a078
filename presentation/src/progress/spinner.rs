//! Spinner shown while waiting for the first token

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr that clears itself once the reply starts.
///
/// Cloning shares the same spinner, so the token callback can hide it
/// while the caller keeps a handle for the error path.
#[derive(Clone)]
pub struct ConnectSpinner {
    bar: ProgressBar,
}

impl ConnectSpinner {
    pub fn start(endpoint: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_prefix("aivy");
        bar.set_message(format!("waiting for {}", endpoint.dimmed()));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A spinner that draws nothing (for `--quiet` and tests).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Remove the spinner. Safe to call repeatedly.
    pub fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.bar.is_finished()
    }
}
