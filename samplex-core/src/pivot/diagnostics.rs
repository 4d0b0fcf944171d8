use crate::util::env;

/// Per-step trace logging for the pivot loop.
///
/// Off unless `SAMPLEX_DIAGNOSTICS` is set. `SAMPLEX_DIAGNOSTICS_EVERY=n`
/// thins the trace to every n-th pivot, and `SAMPLEX_DIAGNOSTICS_PIVOTS=0`
/// keeps only the objective and Z columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    /// Log every n-th pivot; 0 is read as 1.
    pub every: u64,
    /// Include the pivot element, ratio, and gain.
    pub print_pivots: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: false, every: 1, print_pivots: true }
    }
}

impl DiagnosticsConfig {
    /// Trace every pivot with full details.
    pub fn trace() -> Self {
        Self { enabled: true, ..Self::default() }
    }

    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            enabled: env::flag("SAMPLEX_DIAGNOSTICS").unwrap_or(base.enabled),
            every: env::parse("SAMPLEX_DIAGNOSTICS_EVERY").unwrap_or(base.every),
            print_pivots: env::flag("SAMPLEX_DIAGNOSTICS_PIVOTS").unwrap_or(base.print_pivots),
        }
    }

    /// Whether pivot number `step` (1-based) gets a trace line.
    #[inline]
    pub fn should_log(&self, step: u64) -> bool {
        self.enabled && step % self.every.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_log_cadence() {
        let diag = DiagnosticsConfig { every: 3, print_pivots: false, ..DiagnosticsConfig::trace() };
        assert!(!diag.should_log(1));
        assert!(diag.should_log(3));
        assert!(diag.should_log(6));
        assert!(!DiagnosticsConfig::default().should_log(3));
    }

    #[test]
    fn test_zero_cadence_logs_every_step() {
        let diag = DiagnosticsConfig { every: 0, ..DiagnosticsConfig::trace() };
        assert!((1..5).all(|s| diag.should_log(s)));
    }
}
