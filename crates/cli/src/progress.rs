//! Progress indicators
//!
//! Spinners for the long-running install and upload paths.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for indeterminate work
pub fn spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
        .unwrap();
    let pb = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop a spinner on success
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {message}"));
}

/// Stop a spinner on failure
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {message}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_finishes() {
        let pb = spinner("Installing...");
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }
}
