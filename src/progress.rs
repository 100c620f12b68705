//! Progress indicators for dagctl
//!
//! [`SpinnerObserver`] shows a spinner while each plugin call runs and
//! leaves one line per finished step.

use colored::Colorize;
use dagkit::{DeployObserver, Edge, Node, Phase, Record, TeardownOutcome, TeardownStatus, WireOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner with a message
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success line
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "✓".green(), msg);
}

/// Finish a spinner with a warning line
pub fn finish_warn(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Finish a spinner with an error line
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "✗".red(), msg);
}

/// Observer that renders orchestration progress in the terminal
///
/// With `quiet` set nothing is drawn.
pub struct SpinnerObserver {
    quiet: bool,
    current: Option<ProgressBar>,
}

impl SpinnerObserver {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            current: None,
        }
    }

    fn start(&mut self, msg: &str) {
        self.clear();
        if !self.quiet {
            self.current = Some(spinner(msg));
        }
    }

    /// Drop a spinner left running by a failed step
    pub fn clear(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for SpinnerObserver {
    fn drop(&mut self) {
        self.clear();
    }
}

impl DeployObserver for SpinnerObserver {
    fn on_phase_start(&mut self, phase: Phase, count: usize) {
        if self.quiet || count == 0 {
            return;
        }
        println!();
        println!(
            "  {} {} ({})",
            "→".cyan(),
            phase.label().bold(),
            crate::ui::count(count, "step")
        );
    }

    fn on_node_start(&mut self, phase: Phase, node: &Node) {
        self.start(&format!("{} {} ({})", phase.label(), node.id, node.kind));
    }

    fn on_node_deployed(&mut self, node: &Node, _record: &Record) {
        if let Some(pb) = self.current.take() {
            finish_success(&pb, &format!("{} ({})", node.id, node.kind));
        }
    }

    fn on_edge_wired(&mut self, edge: &Edge, kind: &str, outcome: WireOutcome) {
        if self.quiet || !outcome.is_applied() {
            return;
        }
        println!("  {} {} by {}", "✓".green(), edge, kind.dimmed());
    }

    fn on_node_torn_down(&mut self, outcome: &TeardownOutcome) {
        let Some(pb) = self.current.take() else {
            return;
        };
        let label = format!("{} ({})", outcome.node, outcome.kind);
        match &outcome.status {
            TeardownStatus::Destroyed => finish_success(&pb, &label),
            TeardownStatus::Skipped { reason } => {
                finish_warn(&pb, &format!("{} skipped: {}", label, reason));
            }
            TeardownStatus::Failed { error } => {
                finish_error(&pb, &format!("{} failed: {}", label, error));
            }
        }
    }

    fn on_phase_complete(&mut self, _phase: Phase) {
        self.clear();
    }
}
