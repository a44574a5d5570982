//! Scaling direction and capacity-bounds checks

use thiserror::Error;

use crate::provider::GroupCapacity;

/// Which way a scaling action moves the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Desired count is below the current target.
    In,
    /// Desired count is above the current target.
    Out,
    /// Desired count equals the current target; nothing to do.
    None,
}

/// Total, deterministic direction function over (current, desired).
pub fn direction(current: i64, desired: i64) -> ScaleDirection {
    match desired.cmp(&current) {
        std::cmp::Ordering::Less => ScaleDirection::In,
        std::cmp::Ordering::Greater => ScaleDirection::Out,
        std::cmp::Ordering::Equal => ScaleDirection::None,
    }
}

/// A desired count outside the group's configured capacity bounds.
///
/// Callers currently log this and proceed with the update anyway; the
/// provider's own control loop is the final arbiter of capacity limits.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsViolation {
    #[error("cannot scale out: desired count {desired} exceeds group maximum {max}")]
    AboveMaximum { desired: i64, max: i64 },

    #[error("cannot scale in: desired count {desired} is below group minimum {min}")]
    BelowMinimum { desired: i64, min: i64 },
}

/// Check a desired count against the group's capacity bounds for the given
/// direction. `ScaleDirection::None` never violates.
pub fn validate_bounds(
    direction: ScaleDirection,
    desired: i64,
    capacity: &GroupCapacity,
) -> Result<(), BoundsViolation> {
    match direction {
        ScaleDirection::Out if desired > capacity.max => Err(BoundsViolation::AboveMaximum {
            desired,
            max: capacity.max,
        }),
        ScaleDirection::In if desired < capacity.min => Err(BoundsViolation::BelowMinimum {
            desired,
            min: capacity.min,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(min: i64, max: i64) -> GroupCapacity {
        GroupCapacity {
            target: 0,
            min,
            max,
        }
    }

    #[test]
    fn direction_is_total_over_current_and_desired() {
        let cases = [
            (5, 3, ScaleDirection::In),
            (5, 7, ScaleDirection::Out),
            (5, 5, ScaleDirection::None),
            (0, 0, ScaleDirection::None),
            (0, 1, ScaleDirection::Out),
            (1, 0, ScaleDirection::In),
            (-2, -5, ScaleDirection::In),
            (-5, -2, ScaleDirection::Out),
            (i64::MAX, i64::MIN, ScaleDirection::In),
        ];
        for (current, desired, expected) in cases {
            assert_eq!(
                direction(current, desired),
                expected,
                "current={current} desired={desired}"
            );
        }
    }

    #[test]
    fn scale_out_above_maximum_violates() {
        let err = validate_bounds(ScaleDirection::Out, 12, &capacity(1, 10)).unwrap_err();
        assert_eq!(
            err,
            BoundsViolation::AboveMaximum {
                desired: 12,
                max: 10
            }
        );
    }

    #[test]
    fn scale_in_below_minimum_violates() {
        let err = validate_bounds(ScaleDirection::In, 0, &capacity(2, 10)).unwrap_err();
        assert_eq!(err, BoundsViolation::BelowMinimum { desired: 0, min: 2 });
    }

    #[test]
    fn counts_within_bounds_pass() {
        let cap = capacity(2, 10);
        assert!(validate_bounds(ScaleDirection::Out, 10, &cap).is_ok());
        assert!(validate_bounds(ScaleDirection::In, 2, &cap).is_ok());
        assert!(validate_bounds(ScaleDirection::Out, 5, &cap).is_ok());
    }

    #[test]
    fn none_direction_never_violates() {
        // Even a nonsensical desired count is a no-op when the direction is
        // None; the group is already there.
        assert!(validate_bounds(ScaleDirection::None, 99, &capacity(1, 10)).is_ok());
        assert!(validate_bounds(ScaleDirection::None, -1, &capacity(1, 10)).is_ok());
    }
}
