//! Terminal progress bar.
//!
//! [`ProgressBar`] is a [`ProgressReporter`], so it can be handed straight to
//! a split or merge. The total is taken from each update.
//!
//! # Examples
//!
//! ```
//! use pdfdeck::output::progress::{ProgressBar, ProgressStyle};
//! use pdfdeck::progress::ProgressReporter;
//!
//! let mut bar = ProgressBar::new(ProgressStyle::Bar);
//! bar.set_message("Splitting report.pdf");
//! for page in 1..=3 {
//!     bar.report(page, 3);
//! }
//! bar.finish();
//! ```

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use crate::progress::{ProgressReporter, ProgressState};

const BAR_WIDTH: usize = 30;

/// How progress is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// `[=========>          ] 45%`
    Bar,
    /// `12/30`
    Counter,
}

/// Progress line redrawn in place on stderr.
#[derive(Debug)]
pub struct ProgressBar {
    style: ProgressStyle,
    state: ProgressState,
    message: Option<String>,
    started: Instant,
    last_draw: Option<Instant>,
    min_interval: Duration,
    enabled: bool,
}

impl ProgressBar {
    /// Progress bar drawn only when stderr is a terminal.
    pub fn new(style: ProgressStyle) -> Self {
        Self {
            style,
            state: ProgressState::default(),
            message: None,
            started: Instant::now(),
            last_draw: None,
            min_interval: Duration::from_millis(80),
            enabled: io::stderr().is_terminal(),
        }
    }

    /// Progress bar that tracks state but never draws.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(ProgressStyle::Counter)
        }
    }

    /// Text shown before the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Latest reported state.
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Whether anything is drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an update and redraw, at most once per interval unless the
    /// operation just completed.
    pub fn update(&mut self, current: usize, total: usize) {
        self.state = ProgressState { current, total };
        if !self.enabled {
            return;
        }
        let due = self
            .last_draw
            .is_none_or(|at| at.elapsed() >= self.min_interval);
        if due || self.state.is_complete() {
            self.last_draw = Some(Instant::now());
            self.draw();
        }
    }

    /// Clear the line and print the elapsed time.
    pub fn finish(&mut self) {
        if !self.enabled {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = writeln!(
            stderr,
            "{} in {}",
            self.render_line(),
            format_duration(self.started.elapsed())
        );
    }

    fn draw(&self) {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K{}", self.render_line());
        let _ = stderr.flush();
    }

    /// The line as it would be drawn now.
    pub fn render_line(&self) -> String {
        let body = match self.style {
            ProgressStyle::Bar => render_bar(self.state),
            ProgressStyle::Counter => format!("{}/{}", self.state.current, self.state.total),
        };
        match &self.message {
            Some(message) => format!("{message} {body}"),
            None => body,
        }
    }
}

impl ProgressReporter for ProgressBar {
    fn report(&mut self, current: usize, total: usize) {
        self.update(current, total);
    }
}

fn render_bar(state: ProgressState) -> String {
    let fraction = state.fraction().clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    let mut bar = "=".repeat(filled);
    if filled < BAR_WIDTH {
        bar.push('>');
        bar.push_str(&" ".repeat(BAR_WIDTH - filled - 1));
    }
    format!("[{bar}] {:>3}%", (fraction * 100.0).round() as u32)
}

/// Format a duration as `1.2s` or `2m 05s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
