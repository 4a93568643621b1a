//! Terminal output helpers
//!
//! Status lines and value formatting shared by the beacon binaries.

use owo_colors::OwoColorize;

/// Status line helpers
pub struct Status;

impl Status {
    /// Green check line for a completed action
    pub fn success(message: &str) {
        println!("{} {message}", "✓".green());
    }

    /// Red cross line on stderr
    pub fn error(message: &str) {
        eprintln!("{} {message}", "✗".red());
    }

    /// Yellow warning line on stderr
    pub fn warning(message: &str) {
        eprintln!("{} {message}", "⚠".yellow());
    }

    /// Informational note
    pub fn info(message: &str) {
        println!("{} {message}", "ℹ".blue());
    }

    /// Numbered prefix for multi-command runs
    pub fn step(step: usize, total: usize, message: &str) {
        println!("{} {message}", format!("[{step}/{total}]").dimmed());
    }
}

/// Render a duration as ms, seconds, or minutes depending on magnitude
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = duration.as_secs() / 60;
        let rest = duration.as_secs() % 60;
        format!("{mins}m {rest}s")
    }
}

/// Render a byte count with a binary unit suffix
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1 << 30, "GB"), (1 << 20, "MB"), (1 << 10, "KB")];
    for (scale, unit) in UNITS {
        if bytes >= scale {
            return format!("{:.2} {unit}", bytes as f64 / scale as f64);
        }
    }
    format!("{bytes} B")
}
