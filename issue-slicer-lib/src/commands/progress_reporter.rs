use crate::issues::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Instant;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {msg}";

/// A progress bar that delays showing itself until a threshold is reached.
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Instant,
    visible: AtomicBool,
    enabled: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// A disabled reporter never draws anything. An enabled one only becomes visible once a
    /// download has been running longer than `delay`.
    #[must_use]
    pub fn new(enabled: bool, delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );

        Self {
            bar,
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
            enabled,
        }
    }

    fn reveal_if_due(&self) {
        if self.enabled && !self.visible.load(Ordering::Relaxed) && Instant::now() >= self.visible_after {
            self.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
        self.bar.set_length(0);
        self.bar.set_position(0);
        self.reveal_if_due();
    }

    fn set_position(&self, processed: u64, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(processed);
        self.bar.set_message(format!("{processed}/{total} issues"));
        self.reveal_if_due();
    }

    fn println(&self, msg: &str) {
        self.bar.suspend(|| eprintln!("{msg}"));
    }

    fn done(&self) {
        if self.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .finish()
    }
}
