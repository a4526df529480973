//! Wheel geometry and spin animation math.
//!
//! Convention: the pointer is fixed at the top (0°), segment `i` spans
//! `[i * a, (i + 1) * a)` on the wheel, and a positive rotation turns the
//! wheel clockwise.

use crate::error::{Result, RevealError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelGeometry {
    segments: u16,
}

impl WheelGeometry {
    pub fn new(segments: u16) -> Result<Self> {
        if segments == 0 {
            return Err(RevealError::config("wheel needs at least one segment"));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> u16 {
        self.segments
    }

    pub fn segment_angle(&self) -> f64 {
        FULL_TURN / self.segments as f64
    }

    /// Rotation that centers segment `index` under the pointer.
    pub fn target_angle(&self, index: u64) -> Result<f64> {
        if index >= self.segments as u64 {
            return Err(RevealError::OutcomeOutOfRange {
                index,
                segments: self.segments,
            });
        }
        let a = self.segment_angle();
        Ok(FULL_TURN - (index as f64 * a + a / 2.0))
    }

    /// Segment under the pointer after the wheel has turned by `rotation`.
    pub fn segment_under_pointer(&self, rotation: f64) -> u16 {
        let pointer = (FULL_TURN - normalize(rotation)).rem_euclid(FULL_TURN);
        let index = (pointer / self.segment_angle()).floor() as u16;
        index.min(self.segments - 1)
    }
}

/// Map any angle into `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    angle.rem_euclid(FULL_TURN)
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinProfile {
    /// Angular velocity while waiting for the outcome, degrees per second.
    pub idle_speed: f64,
    /// Extra full turns before settling.
    pub base_spins: u32,
    pub settle_duration: Duration,
}

impl Default for SpinProfile {
    fn default() -> Self {
        Self {
            idle_speed: 180.0,
            base_spins: 4,
            settle_duration: Duration::from_millis(3000),
        }
    }
}

impl SpinProfile {
    /// Rotation reached after idling for `elapsed` from `start`.
    pub fn idle_rotation(&self, start: f64, elapsed: Duration) -> f64 {
        start + self.idle_speed * elapsed.as_secs_f64()
    }
}

/// Eased deceleration from the current rotation onto a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub start: f64,
    pub total_rotation: f64,
    pub duration: Duration,
}

impl SpinPlan {
    pub fn settle(current_rotation: f64, target: f64, profile: &SpinProfile) -> Self {
        let start = normalize(current_rotation);
        let delta = (target - start).rem_euclid(FULL_TURN);
        // At least one full turn, even when the wheel never idled.
        let spins = profile.base_spins.max(1) as f64;
        Self {
            start,
            total_rotation: spins * FULL_TURN + delta,
            duration: profile.settle_duration,
        }
    }

    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.start + self.total_rotation * ease_out_cubic(progress)
    }

    pub fn final_angle(&self) -> f64 {
        self.start + self.total_rotation
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_thirteen_segment_targets() {
        let wheel = WheelGeometry::new(13).unwrap();
        let a = wheel.segment_angle();

        let first = wheel.target_angle(0).unwrap();
        assert!((first - (360.0 - 360.0 / 26.0)).abs() < EPS);
        assert!((first - 346.153_846_153_846).abs() < 1e-9);

        let last = wheel.target_angle(12).unwrap();
        assert!((last - normalize(first - 12.0 * a)).abs() < EPS);
    }

    #[test]
    fn test_pointer_lands_mid_segment() {
        for segments in [1u16, 2, 8, 13, 37] {
            let wheel = WheelGeometry::new(segments).unwrap();
            let a = wheel.segment_angle();
            for i in 0..segments as u64 {
                let target = wheel.target_angle(i).unwrap();
                let pointer = normalize(FULL_TURN - target);
                assert!((pointer - (i as f64 * a + a / 2.0)).abs() < 1e-6);
                assert_eq!(wheel.segment_under_pointer(target) as u64, i);
                assert_eq!(wheel.segment_under_pointer(target + 3.0 * FULL_TURN) as u64, i);
            }
        }
    }

    #[test]
    fn test_out_of_range_and_empty_wheel() {
        let wheel = WheelGeometry::new(13).unwrap();
        assert!(matches!(
            wheel.target_angle(13),
            Err(RevealError::OutcomeOutOfRange { index: 13, segments: 13 })
        ));
        assert!(WheelGeometry::new(0).is_err());
    }

    #[test]
    fn test_settle_lands_on_target() {
        let wheel = WheelGeometry::new(13).unwrap();
        let profile = SpinProfile::default();
        let target = wheel.target_angle(5).unwrap();

        let plan = SpinPlan::settle(1234.5, target, &profile);
        assert!(plan.total_rotation >= 4.0 * FULL_TURN);
        assert!((normalize(plan.final_angle()) - target).abs() < 1e-6);
        assert_eq!(wheel.segment_under_pointer(plan.final_angle()), 5);

        assert!((plan.angle_at(Duration::ZERO) - plan.start).abs() < EPS);
        assert!((plan.angle_at(plan.duration) - plan.final_angle()).abs() < EPS);
        assert!((plan.angle_at(plan.duration * 2) - plan.final_angle()).abs() < EPS);
        assert!(plan.is_complete(plan.duration));
    }

    #[test]
    fn test_settle_without_idle_still_spins() {
        let profile = SpinProfile {
            base_spins: 0,
            ..SpinProfile::default()
        };
        // Already resting on the target.
        let plan = SpinPlan::settle(90.0, 90.0, &profile);
        assert!((plan.total_rotation - FULL_TURN).abs() < EPS);
    }

    #[test]
    fn test_easing_is_monotonic() {
        let mut last = 0.0;
        for step in 0..=100 {
            let v = ease_out_cubic(step as f64 / 100.0);
            assert!(v >= last);
            last = v;
        }
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn test_idle_rotation() {
        let profile = SpinProfile::default();
        let r = profile.idle_rotation(10.0, Duration::from_millis(500));
        assert!((r - 100.0).abs() < EPS);
    }
}
