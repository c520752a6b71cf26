//! Piecewise-constant acceleration profiles.

use pipeflow_core::Forcing;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ForcingError;

/// Period of the reference piston cycle (s).
pub const REFERENCE_PERIOD: f64 = 60.0;

/// One constant piece of a profile, active on `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start (s), inclusive.
    pub start: f64,
    /// Segment end (s), exclusive.
    pub end: f64,
    /// Acceleration held over the segment (m/s²).
    pub value: f64,
}

impl Segment {
    /// Construct a segment.
    pub const fn new(start: f64, end: f64, value: f64) -> Self {
        Self { start, end, value }
    }

    /// Segment duration.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// The reference piston cycle.
const REFERENCE_SEGMENTS: [Segment; 4] = [
    Segment::new(0.0, 10.0, 3.0),
    Segment::new(10.0, 30.0, 0.0),
    Segment::new(30.0, 40.0, 1.0),
    Segment::new(40.0, 60.0, 0.0),
];

/// A periodic piecewise-constant acceleration.
///
/// Segments tile `[0, period)` without gaps or overlaps. Time is reduced
/// modulo the period before lookup, so the profile is defined for all
/// `t >= 0`.
///
/// ```
/// use pipeflow_core::Forcing;
/// use pipeflow_forcing::PiecewiseProfile;
///
/// let a = PiecewiseProfile::reference();
/// assert_eq!(a.acceleration(5.0), 3.0);
/// assert_eq!(a.acceleration(35.0), 1.0);
/// assert_eq!(a.acceleration(65.0), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseProfile {
    period: f64,
    segments: SmallVec<[Segment; 4]>,
}

impl PiecewiseProfile {
    /// Build a profile from segments covering `[0, period)`.
    ///
    /// # Errors
    ///
    /// - [`ForcingError::InvalidPeriod`] if `period` is not finite and > 0
    /// - [`ForcingError::EmptyProfile`] if no segments are given
    /// - [`ForcingError::InvalidSegment`] if a segment is empty, has a
    ///   non-finite value, or does not start where the previous one ended
    /// - [`ForcingError::IncompleteCover`] if the last segment does not end
    ///   at `period`
    pub fn new(
        period: f64,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<Self, ForcingError> {
        if !period.is_finite() || period <= 0.0 {
            return Err(ForcingError::InvalidPeriod { period });
        }
        let segments: SmallVec<[Segment; 4]> = segments.into_iter().collect();
        if segments.is_empty() {
            return Err(ForcingError::EmptyProfile);
        }

        let mut cursor = 0.0;
        for (index, seg) in segments.iter().enumerate() {
            if seg.start != cursor {
                return Err(ForcingError::InvalidSegment {
                    index,
                    reason: format!("starts at {} but previous segment ends at {cursor}", seg.start),
                });
            }
            if !(seg.end > seg.start) || !seg.end.is_finite() {
                return Err(ForcingError::InvalidSegment {
                    index,
                    reason: format!("end {} must be finite and after start {}", seg.end, seg.start),
                });
            }
            if !seg.value.is_finite() {
                return Err(ForcingError::InvalidSegment {
                    index,
                    reason: format!("value {} is not finite", seg.value),
                });
            }
            cursor = seg.end;
        }
        if cursor != period {
            return Err(ForcingError::IncompleteCover {
                end: cursor,
                period,
            });
        }

        Ok(Self { period, segments })
    }

    /// The reference 60 s piston cycle: 3, 0, 1, 0 m/s² over
    /// `[0,10)`, `[10,30)`, `[30,40)`, `[40,60)`.
    pub fn reference() -> Self {
        Self {
            period: REFERENCE_PERIOD,
            segments: SmallVec::from_buf(REFERENCE_SEGMENTS),
        }
    }

    /// Repetition period.
    pub fn period_len(&self) -> f64 {
        self.period
    }

    /// The segments, in time order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Reduce `t` into `[0, period)`.
    pub fn wrap(&self, t: f64) -> f64 {
        t.rem_euclid(self.period)
    }

    /// Value of the profile at a time already reduced into `[0, period)`.
    fn lookup(&self, t_mod: f64) -> f64 {
        self.segments
            .iter()
            .find(|seg| seg.start <= t_mod && t_mod < seg.end)
            // rem_euclid may round up to exactly `period`.
            .unwrap_or(&self.segments[0])
            .value
    }

    /// Integral of the profile over one period.
    pub fn integral(&self) -> f64 {
        self.segments.iter().map(|s| s.value * s.duration()).sum()
    }
}

impl Default for PiecewiseProfile {
    fn default() -> Self {
        Self::reference()
    }
}

impl Forcing for PiecewiseProfile {
    fn name(&self) -> &str {
        "piecewise"
    }

    fn acceleration(&self, t: f64) -> f64 {
        self.lookup(self.wrap(t))
    }

    fn period(&self) -> Option<f64> {
        Some(self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_values() {
        let a = PiecewiseProfile::reference();
        assert_eq!(a.acceleration(0.0), 3.0);
        assert_eq!(a.acceleration(9.999), 3.0);
        assert_eq!(a.acceleration(10.0), 0.0);
        assert_eq!(a.acceleration(30.0), 1.0);
        assert_eq!(a.acceleration(45.0), 0.0);
        assert_eq!(a.acceleration(60.0), 3.0);
        assert_eq!(a.rate(5.0), 0.0);
        assert_eq!(a.period(), Some(60.0));
    }

    #[test]
    fn reference_matches_constructor() {
        let built = PiecewiseProfile::new(60.0, REFERENCE_SEGMENTS).unwrap();
        assert_eq!(built, PiecewiseProfile::reference());
        assert_eq!(built.integral(), 40.0);
    }

    #[test]
    fn rejects_gap() {
        let err = PiecewiseProfile::new(
            10.0,
            [Segment::new(0.0, 4.0, 1.0), Segment::new(5.0, 10.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ForcingError::InvalidSegment { index: 1, .. }));
        assert!(err.to_string().contains("previous segment"));
    }

    #[test]
    fn rejects_short_cover() {
        let err = PiecewiseProfile::new(10.0, [Segment::new(0.0, 8.0, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            ForcingError::IncompleteCover {
                end: 8.0,
                period: 10.0
            }
        );
    }

    #[test]
    fn rejects_bad_period_and_empty() {
        assert!(matches!(
            PiecewiseProfile::new(0.0, REFERENCE_SEGMENTS),
            Err(ForcingError::InvalidPeriod { .. })
        ));
        assert_eq!(
            PiecewiseProfile::new(1.0, []),
            Err(ForcingError::EmptyProfile)
        );
    }

    #[test]
    fn rejects_reversed_segment() {
        let err = PiecewiseProfile::new(
            10.0,
            [Segment::new(0.0, 0.0, 1.0), Segment::new(0.0, 10.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, ForcingError::InvalidSegment { index: 0, .. }));
    }

    proptest! {
        #[test]
        fn periodic(t in 0.0f64..600.0) {
            let a = PiecewiseProfile::reference();
            // Stay clear of jumps where t + P may round across a boundary.
            let t_mod = t % 60.0;
            prop_assume!([0.0, 10.0, 30.0, 40.0, 60.0].iter().all(|j| (t_mod - j).abs() > 1e-6));
            prop_assert_eq!(a.acceleration(t), a.acceleration(t + 60.0));
        }
    }
}
