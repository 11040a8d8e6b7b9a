//! Polished console output
//!
//! Uses indicatif for the download bar and console for styled status lines.

use std::sync::Mutex;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::Version;
use crate::ui::Reporter;

// Fixed column widths for alignment
const NAME_WIDTH: usize = 12;
const VERSION_WIDTH: usize = 10;

/// Styled terminal reporter for the install pipeline.
///
/// Only one artifact moves at a time, so a single progress bar slot is
/// enough. With `quiet` set, nothing is printed at all.
pub struct ConsoleReporter {
    quiet: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            bar: Mutex::new(None),
        }
    }

    fn println(&self, line: &str) {
        if self.quiet {
            return;
        }
        let guard = self.bar.lock().unwrap();
        match guard.as_ref() {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn clear_bar(&self) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_and_clear();
        }
    }

    /// Template: "  ⠋ a8e           2.3.1      45%  [━━━━━░░░░░]"
    fn download_bar(name: &str, version: &Version, total: u64) -> ProgressBar {
        let pb_style = ProgressStyle::default_bar()
            .template(&format!(
                "  {{spinner:.dim}} {{prefix:<{NAME_WIDTH}}}  {{msg:>{VERSION_WIDTH}}}  {{percent:>3}}%  [{{bar:10.cyan/dim}}]"
            ))
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✔")
            .progress_chars("━░");

        let pb = ProgressBar::new(total);
        pb.set_style(pb_style);
        pb.set_prefix(style(name).cyan().to_string());
        pb.set_message(style(version).dim().to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        let bar = "━".repeat(45usize.saturating_sub(title.len()));
        self.println(&format!("{} {}", style(title).bold(), style(bar).dim()));
    }

    fn downloading(&self, name: &str, version: &Version, current: u64, total: u64) {
        if self.quiet {
            return;
        }
        let mut guard = self.bar.lock().unwrap();
        let pb = guard.get_or_insert_with(|| Self::download_bar(name, version, total));
        if total > 0 && pb.length() != Some(total) {
            pb.set_length(total);
        }
        pb.set_position(current);
    }

    fn installing(&self, name: &str, version: &Version) {
        self.clear_bar();
        self.println(&format!(
            "  {} {:<NAME_WIDTH$}  {:>VERSION_WIDTH$}  {}",
            style("⠿").dim(),
            style(name).cyan(),
            style(version).dim(),
            style("installing").dim()
        ));
    }

    fn done(&self, name: &str, version: &Version, detail: &str) {
        self.clear_bar();
        self.println(&format!(
            "  {} {:<NAME_WIDTH$}  {:>VERSION_WIDTH$}  {}",
            style("✔").green(),
            style(name).cyan(),
            style(version).dim(),
            style(detail).dim()
        ));
    }

    fn failed(&self, name: &str, version: &Version, reason: &str) {
        self.clear_bar();
        self.println(&format!(
            "  {} {:<NAME_WIDTH$}  {:>VERSION_WIDTH$}  {}",
            style("✗").red(),
            style(name).cyan(),
            style(version).dim(),
            style(reason).red()
        ));
    }

    fn info(&self, msg: &str) {
        self.println(&format!("    {}", style(msg).dim()));
    }

    fn success(&self, msg: &str) {
        self.println(&format!("  {} {}", style("✔").green(), msg));
    }

    fn warning(&self, msg: &str) {
        self.println(&format!("  {} {}", style("⚠").yellow(), msg));
    }

    fn error(&self, msg: &str) {
        self.println(&format!("  {} {}", style("✗").red(), msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_swallows_output() {
        // Mostly a smoke test that no bar state leaks between phases.
        let reporter = ConsoleReporter::new(true);
        let version: Version = "2.3.1".parse().unwrap();
        reporter.downloading("a8e", &version, 0, 100);
        reporter.downloading("a8e", &version, 50, 100);
        reporter.installing("a8e", &version);
        reporter.done("a8e", &version, "installed");
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
