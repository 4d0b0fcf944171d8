//! Scalar precision for the tableau.
//!
//! The kernel is generic over the element type so that badly conditioned
//! problems can trade speed for precision. `f64` is the standard choice; `f32`
//! is available for small, well-scaled problems. A wider type (for instance a
//! double-double float) plugs in by implementing [`Real`].

use std::fmt::{Debug, Display, LowerExp};

use num_traits::Float;

/// Floating-point type usable as a tableau element.
///
/// Each implementation carries the default numerical thresholds appropriate
/// for its precision. All thresholds are expressed as `f64` and converted on
/// entry to the pivot loop.
pub trait Real: Float + Debug + Display + LowerExp + Default + Send + Sync + 'static {
    /// Objective-row entries at or below this are never entering candidates.
    const DEFAULT_EPS_OBJECTIVE: f64;

    /// Updated entries with magnitude at or below this are snapped to zero.
    const DEFAULT_PREC: f64;

    /// Ratios closer than this are treated as tied in the min-ratio test.
    const DEFAULT_RATIO_TIE_TOL: f64;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Convert from `f64`, rounding if necessary.
    fn of_f64(v: f64) -> Self;

    /// Convert to `f64` for reporting.
    fn as_f64(self) -> f64;
}

impl Real for f64 {
    const DEFAULT_EPS_OBJECTIVE: f64 = 1e-14;
    const DEFAULT_PREC: f64 = 1e-12;
    const DEFAULT_RATIO_TIE_TOL: f64 = 1e-14;
    const NAME: &'static str = "f64";

    #[inline]
    fn of_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

impl Real for f32 {
    const DEFAULT_EPS_OBJECTIVE: f64 = 1e-6;
    const DEFAULT_PREC: f64 = 1e-6;
    const DEFAULT_RATIO_TIE_TOL: f64 = 1e-7;
    const NAME: &'static str = "f32";

    #[inline]
    fn of_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

/// Variable ids with a negative value are artificial (phase 1 only).
#[inline]
pub fn is_artificial(id: i32) -> bool {
    id < 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_conversions() {
        assert_eq!(f64::of_f64(1.5).as_f64(), 1.5);
        assert_eq!(f32::of_f64(0.25).as_f64(), 0.25);
    }

    #[test]
    fn test_wider_type_has_tighter_thresholds() {
        assert!(f64::DEFAULT_PREC < f32::DEFAULT_PREC);
        assert!(f64::DEFAULT_EPS_OBJECTIVE < f32::DEFAULT_EPS_OBJECTIVE);
    }

    #[test]
    fn test_artificial_sign_convention() {
        assert!(is_artificial(-1));
        assert!(!is_artificial(0));
        assert!(!is_artificial(7));
    }
}
