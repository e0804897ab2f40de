//! Console progress reporting for the two long-running stages

use chrono::{DateTime, Local, TimeDelta};

/// Fixed-width progress bar, one slot per `step` identifiers
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    slots: usize,
    step: usize,
}

impl ProgressBar {
    pub fn new(universe_size: usize, step: usize) -> Self {
        let step = step.max(1);
        Self {
            slots: universe_size / step,
            step,
        }
    }

    /// Render the bar with one filled slot per completed step, e.g. `[##___]`.
    pub fn render(&self, completed: usize) -> String {
        let filled = (completed / self.step).min(self.slots);
        format!("[{}{}]", "#".repeat(filled), "_".repeat(self.slots - filled))
    }

    pub fn print(&self, completed: usize) {
        println!("PROGRESS: {}", self.render(completed));
    }

    /// Whether a report is due after `completed` items: after the first
    /// batch and on every step boundary.
    pub fn is_due(&self, completed: usize, first_batch: usize) -> bool {
        completed == first_batch || completed % self.step == 0
    }
}

/// Render elapsed time as `H:MM:SS`, with `.ffffff` when there are microseconds.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let micros = elapsed.num_microseconds().unwrap_or(i64::MAX).max(0);
    let (secs, frac) = (micros / 1_000_000, micros % 1_000_000);
    let days = secs / 86_400;
    let clock = format!(
        "{}:{:02}:{:02}",
        secs % 86_400 / 3600,
        secs % 3600 / 60,
        secs % 60
    );
    let clock = if frac == 0 {
        clock
    } else {
        format!("{clock}.{frac:06}")
    };
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Prints start/finish timestamps and the elapsed time of one stage
pub struct StageTimer {
    label: &'static str,
    started: DateTime<Local>,
}

impl StageTimer {
    pub fn start(label: &'static str) -> Self {
        let started = Local::now();
        println!("STARTED {label}: {started}");
        Self { label, started }
    }

    pub fn finish(self) {
        let finished = Local::now();
        println!("FINISHED {}: {finished}", self.label);
        println!("DURATION: {}\n", format_elapsed(finished - self.started));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let bar = ProgressBar::new(5000, 1000);
        assert_eq!(bar.render(50), "[_____]");
        assert_eq!(bar.render(1000), "[#____]");
        assert_eq!(bar.render(3999), "[###__]");
        assert_eq!(bar.render(5000), "[#####]");
        assert_eq!(bar.render(9000), "[#####]");
    }

    #[test]
    fn test_is_due() {
        let bar = ProgressBar::new(5000, 1000);
        assert!(bar.is_due(50, 50));
        assert!(!bar.is_due(100, 50));
        assert!(bar.is_due(2000, 50));
        assert!(bar.is_due(1, 1));
        assert!(!bar.is_due(999, 1));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(TimeDelta::microseconds(1_234_567)), "0:00:01.234567");
        assert_eq!(format_elapsed(TimeDelta::seconds(3723)), "1:02:03");
        assert_eq!(format_elapsed(TimeDelta::milliseconds(50)), "0:00:00.050000");
        assert_eq!(format_elapsed(TimeDelta::seconds(90_000)), "1 day, 1:00:00");
        assert_eq!(format_elapsed(TimeDelta::seconds(-5)), "0:00:00");
    }

    #[test]
    fn test_small_universe() {
        let bar = ProgressBar::new(3, 1000);
        assert_eq!(bar.render(3), "[]");
    }
}
