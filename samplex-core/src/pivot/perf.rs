//! Per-section wall-clock accounting for the pivot loop.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PerfSection {
    Select,
    Update,
    Relabel,
    Compact,
    Report,
}

#[derive(Debug, Default, Clone)]
pub struct PerfTimers {
    pub select: Duration,
    pub update: Duration,
    pub relabel: Duration,
    pub compact: Duration,
    pub report: Duration,
}

impl PerfTimers {
    pub fn scoped(&mut self, section: PerfSection) -> PerfGuard<'_> {
        PerfGuard { section, start: Instant::now(), timers: self }
    }

    pub fn add(&mut self, section: PerfSection, dt: Duration) {
        match section {
            PerfSection::Select => self.select += dt,
            PerfSection::Update => self.update += dt,
            PerfSection::Relabel => self.relabel += dt,
            PerfSection::Compact => self.compact += dt,
            PerfSection::Report => self.report += dt,
        }
    }

    pub fn total(&self) -> Duration {
        self.select + self.update + self.relabel + self.compact + self.report
    }

    pub fn merge(&mut self, other: &PerfTimers) {
        self.select += other.select;
        self.update += other.update;
        self.relabel += other.relabel;
        self.compact += other.compact;
        self.report += other.report;
    }
}

impl fmt::Display for PerfTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "select={:.3}ms update={:.3}ms relabel={:.3}ms compact={:.3}ms report={:.3}ms",
            self.select.as_secs_f64() * 1e3,
            self.update.as_secs_f64() * 1e3,
            self.relabel.as_secs_f64() * 1e3,
            self.compact.as_secs_f64() * 1e3,
            self.report.as_secs_f64() * 1e3,
        )
    }
}

pub struct PerfGuard<'a> {
    section: PerfSection,
    start: Instant,
    timers: &'a mut PerfTimers,
}

impl Drop for PerfGuard<'_> {
    fn drop(&mut self) {
        self.timers.add(self.section, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_accumulates_into_section() {
        let mut timers = PerfTimers::default();
        {
            let _g = timers.scoped(PerfSection::Update);
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(timers.update >= Duration::from_millis(2));
        assert_eq!(timers.select, Duration::ZERO);
        assert_eq!(timers.total(), timers.update);
    }

    #[test]
    fn test_merge() {
        let mut a = PerfTimers::default();
        a.add(PerfSection::Select, Duration::from_millis(3));
        let mut b = PerfTimers::default();
        b.add(PerfSection::Select, Duration::from_millis(4));
        b.add(PerfSection::Compact, Duration::from_millis(1));
        a.merge(&b);
        assert_eq!(a.select, Duration::from_millis(7));
        assert_eq!(a.compact, Duration::from_millis(1));
    }
}
