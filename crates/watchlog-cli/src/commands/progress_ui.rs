use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner while the single history request is in flight. Hidden when not
/// attached to a terminal so log output stays clean.
pub fn fetch_spinner(message: &str) -> ProgressBar {
    if !is_interactive() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Per-record bar for import generation.
pub struct ImportProgress {
    bar: ProgressBar,
    interactive: bool,
}

impl ImportProgress {
    pub fn new(total: usize) -> Self {
        let interactive = is_interactive();
        let bar = if interactive {
            ProgressBar::new(total as u64)
        } else {
            tracing::info!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode, progress bar disabled"
            );
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .map(|s| s.progress_chars("█▉▊▋▌▍▎▏  "))
        {
            bar.set_style(style);
        }
        bar.set_message("Resolving titles");

        Self { bar, interactive }
    }

    pub fn set_position(&self, processed: usize) {
        if self.interactive {
            self.bar.set_position(processed as u64);
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
