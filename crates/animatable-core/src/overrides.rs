//! Runtime hooks that replace or offset an animation's computed value.

use crate::animation::FrameInfo;
use crate::easing::CubicEasing;
use crate::error::{AnimError, Result};
use crate::value::{combine, Value};
use std::fmt;

pub type OverrideFn = Box<dyn FnMut(&FrameInfo<'_>) -> Option<Value>>;
pub type OffsetFn = Box<dyn FnMut(&FrameInfo<'_>) -> Value>;

/// Where a relative override gets its offset from.
pub enum RelativeOffset {
    Static(Value),
    Dynamic(OffsetFn),
    /// Nothing was supplied; querying fails with
    /// [`AnimError::MissingOverrideValue`].
    Unset,
}

pub enum ValueOverride {
    /// Always this value.
    Static(Value),
    /// Callback result when it returns one, the natural value otherwise.
    Dynamic(OverrideFn),
    /// Offset added to the keyframe value interpolated at linear (un-eased)
    /// progress.
    Relative(RelativeOffset),
    /// Animates between its own endpoints over the overall progress,
    /// ignoring the keyframes.
    Interpolated {
        start: Value,
        end: Value,
        easing: Option<CubicEasing>,
    },
}

impl ValueOverride {
    pub fn fixed(value: Value) -> Self {
        ValueOverride::Static(value)
    }

    pub fn dynamic(callback: impl FnMut(&FrameInfo<'_>) -> Option<Value> + 'static) -> Self {
        ValueOverride::Dynamic(Box::new(callback))
    }

    pub fn relative(offset: Value) -> Self {
        ValueOverride::Relative(RelativeOffset::Static(offset))
    }

    pub fn relative_with(callback: impl FnMut(&FrameInfo<'_>) -> Value + 'static) -> Self {
        ValueOverride::Relative(RelativeOffset::Dynamic(Box::new(callback)))
    }

    pub fn interpolated(start: Value, end: Value) -> Self {
        ValueOverride::Interpolated {
            start,
            end,
            easing: None,
        }
    }

    pub fn interpolated_with_easing(start: Value, end: Value, easing: CubicEasing) -> Self {
        ValueOverride::Interpolated {
            start,
            end,
            easing: Some(easing),
        }
    }

    pub fn is_relative(&self) -> bool {
        matches!(self, ValueOverride::Relative(_))
    }

    /// Produces the value to hand out given the `natural` keyframe result.
    pub fn apply(&mut self, info: &FrameInfo<'_>, natural: Value) -> Result<Value> {
        match self {
            ValueOverride::Static(value) => Ok(value.clone()),
            ValueOverride::Dynamic(callback) => Ok(callback(info).unwrap_or(natural)),
            ValueOverride::Relative(offset) => {
                let offset = match offset {
                    RelativeOffset::Static(value) => value.clone(),
                    RelativeOffset::Dynamic(callback) => callback(info),
                    RelativeOffset::Unset => return Err(AnimError::MissingOverrideValue),
                };
                let baseline =
                    combine(info.start_value, info.end_value, info.linear_progress, None)?;
                baseline.offset_by(&offset)
            }
            ValueOverride::Interpolated { start, end, easing } => {
                let t = match easing {
                    Some(easing) => easing.ease(info.overall_progress),
                    None => info.overall_progress,
                };
                combine(start, end, t, None)
            }
        }
    }
}

impl fmt::Debug for ValueOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOverride::Static(value) => f.debug_tuple("Static").field(value).finish(),
            ValueOverride::Dynamic(_) => f.write_str("Dynamic(..)"),
            ValueOverride::Relative(RelativeOffset::Static(value)) => {
                f.debug_tuple("Relative").field(value).finish()
            }
            ValueOverride::Relative(RelativeOffset::Dynamic(_)) => f.write_str("Relative(..)"),
            ValueOverride::Relative(RelativeOffset::Unset) => f.write_str("Relative(unset)"),
            ValueOverride::Interpolated { start, end, easing } => f
                .debug_struct("Interpolated")
                .field("start", start)
                .field("end", end)
                .field("easing", easing)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn info<'a>(start: &'a Value, end: &'a Value, linear: f32, eased: f32) -> FrameInfo<'a> {
        FrameInfo {
            start_frame: 0.0,
            end_frame: 10.0,
            start_value: start,
            end_value: end,
            linear_progress: linear,
            eased_progress: eased,
            overall_progress: linear,
        }
    }

    #[test]
    fn test_absolute_none_passes_through() {
        let (start, end) = (Value::Scalar(0.0), Value::Scalar(1.0));
        let mut ov = ValueOverride::dynamic(|_: &FrameInfo<'_>| None);
        let out = ov.apply(&info(&start, &end, 0.5, 0.5), Value::Scalar(0.7)).unwrap();
        assert_eq!(out, Value::Scalar(0.7));
    }

    #[test]
    fn test_relative_uses_linear_progress_not_eased() {
        let (start, end) = (Value::Integer(0), Value::Integer(10));
        let mut ov = ValueOverride::relative(Value::Integer(5));
        // Eased progress of 0.1 must not leak into the baseline
        let out = ov.apply(&info(&start, &end, 0.5, 0.1), Value::Integer(1)).unwrap();
        assert_eq!(out, Value::Integer(10));
    }

    #[test]
    fn test_relative_point_callback() {
        let (start, end) = (Value::Point(Vec2::ZERO), Value::Point(Vec2::new(10.0, 20.0)));
        let mut ov = ValueOverride::relative_with(|info: &FrameInfo<'_>| {
            Value::Point(Vec2::splat(info.linear_progress))
        });
        let out = ov.apply(&info(&start, &end, 0.5, 0.5), Value::Point(Vec2::ZERO)).unwrap();
        assert_eq!(out, Value::Point(Vec2::new(5.5, 10.5)));
    }

    #[test]
    fn test_unset_relative_fails() {
        let (start, end) = (Value::Scalar(0.0), Value::Scalar(1.0));
        let mut ov = ValueOverride::Relative(RelativeOffset::Unset);
        let err = ov.apply(&info(&start, &end, 0.5, 0.5), Value::Scalar(0.5)).unwrap_err();
        assert_eq!(err, AnimError::MissingOverrideValue);
        assert!(ov.is_relative());
    }

    #[test]
    fn test_interpolated_override_ignores_keyframes() {
        let (start, end) = (Value::Scalar(0.0), Value::Scalar(1.0));
        let mut ov = ValueOverride::interpolated(Value::Scalar(100.0), Value::Scalar(200.0));
        let out = ov.apply(&info(&start, &end, 0.25, 0.25), Value::Scalar(0.25)).unwrap();
        assert_eq!(out, Value::Scalar(125.0));
    }
}
