//! Progress reporting for batch resolution.
//!
//! A batch either draws an `indicatif` bar or, in log-only mode, prints
//! periodic `[phase] n/total` lines for tail-friendly output. The mode is
//! chosen by the caller per batch.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Log-only mode prints one line per this many steps (and at the end).
const LOG_INTERVAL: u64 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressMode {
    /// Draw a progress bar on stderr
    #[default]
    Bar,
    /// Hide the bar, print periodic progress lines instead
    LogOnly,
}

impl ProgressMode {
    pub fn from_log_only(log_only: bool) -> Self {
        if log_only {
            ProgressMode::LogOnly
        } else {
            ProgressMode::Bar
        }
    }
}

/// Format duration in human-readable format
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Progress of one batch over `total` items.
pub struct BatchProgress {
    mode: ProgressMode,
    bar: ProgressBar,
    phase: &'static str,
    total: u64,
    done: u64,
}

impl BatchProgress {
    pub fn new(mode: ProgressMode, phase: &'static str, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        match mode {
            ProgressMode::LogOnly => bar.set_draw_target(ProgressDrawTarget::hidden()),
            ProgressMode::Bar => {
                let style = ProgressStyle::default_bar()
                    .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> ");
                bar.set_style(style);
            }
        }
        bar.set_message(phase);
        Self {
            mode,
            bar,
            phase,
            total,
            done: 0,
        }
    }

    /// Advance by one item. Returns the progress line printed, if any.
    pub fn step(&mut self) -> Option<String> {
        self.done += 1;
        self.bar.inc(1);
        let line = self.progress_line()?;
        eprintln!("{}", line);
        Some(line)
    }

    fn progress_line(&self) -> Option<String> {
        if self.mode != ProgressMode::LogOnly || self.total == 0 {
            return None;
        }
        if self.done % LOG_INTERVAL != 0 && self.done != self.total {
            return None;
        }
        let pct = 100.0 * self.done as f64 / self.total as f64;
        Some(format!("[{}] {}/{} ({:.1}%)", self.phase, self.done, self.total, pct))
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
