use crate::animatable::{Animatable, AnimatableValue};
use crate::animation::{ChangeNotifier, FrameInfo, KeyframeAnimation, OverrideTarget};
use crate::error::{AnimError, Result};
use crate::keyframe::Keyframe;
use crate::overrides::ValueOverride;
use crate::timeline::Timeline;
use crate::value::{Value, ValueKind};
use glam::Vec2;
use tracing::debug;

/// A point whose X and Y are animated by independent scalar keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitAxisPoint {
    x: AnimatableValue,
    y: AnimatableValue,
}

impl SplitAxisPoint {
    pub fn new(x: AnimatableValue, y: AnimatableValue) -> Result<Self> {
        for axis in [&x, &y] {
            if axis.kind() != ValueKind::Scalar {
                return Err(AnimError::KindMismatch {
                    start: ValueKind::Scalar,
                    end: axis.kind(),
                });
            }
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &AnimatableValue {
        &self.x
    }

    pub fn y(&self) -> &AnimatableValue {
        &self.y
    }
}

impl Animatable for SplitAxisPoint {
    type Animation = SplitAxisAnimation;

    fn keyframes(&self) -> Result<&[Keyframe]> {
        Err(AnimError::UnsupportedOperation("split-axis point"))
    }

    fn is_static(&self) -> bool {
        self.x.is_static() && self.y.is_static()
    }

    fn create_animation(&self, timeline: Timeline) -> SplitAxisAnimation {
        SplitAxisAnimation {
            x: self.x.create_animation(timeline),
            y: self.y.create_animation(timeline),
            timeline,
            progress: 0.0,
            point_override: None,
            notifier: ChangeNotifier::default(),
        }
    }
}

/// Evaluates both axes at the same progress and composes the point.
///
/// Overrides can target a single axis through [`x_mut`](Self::x_mut) /
/// [`y_mut`](Self::y_mut), or the composed point through
/// [`OverrideTarget`]. A point override sees the composed point as both
/// start and end value, with the overall progress as segment progress.
#[derive(Debug)]
pub struct SplitAxisAnimation {
    x: KeyframeAnimation,
    y: KeyframeAnimation,
    timeline: Timeline,
    progress: f32,
    point_override: Option<ValueOverride>,
    notifier: ChangeNotifier,
}

impl SplitAxisAnimation {
    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
        self.x.set_progress(self.progress);
        self.y.set_progress(self.progress);
    }

    pub fn x_mut(&mut self) -> &mut KeyframeAnimation {
        &mut self.x
    }

    pub fn y_mut(&mut self) -> &mut KeyframeAnimation {
        &mut self.y
    }

    /// Registers `listener` for point overrides and for both axes.
    pub fn set_change_listener(&mut self, listener: impl FnMut() + Clone + 'static) {
        self.x.set_change_listener(listener.clone());
        self.y.set_change_listener(listener.clone());
        self.notifier.set(listener);
    }

    pub fn value(&mut self) -> Result<Vec2> {
        let x = scalar(self.x.value()?)?;
        let y = scalar(self.y.value()?)?;
        let natural = Vec2::new(x, y);

        let Some(value_override) = self.point_override.as_mut() else {
            return Ok(natural);
        };
        let point = Value::Point(natural);
        let info = FrameInfo {
            start_frame: self.timeline.start_frame,
            end_frame: self.timeline.end_frame,
            start_value: &point,
            end_value: &point,
            linear_progress: self.progress,
            eased_progress: self.progress,
            overall_progress: self.progress,
        };
        match value_override.apply(&info, point.clone())? {
            Value::Point(p) => Ok(p),
            other => Err(AnimError::KindMismatch {
                start: ValueKind::Point,
                end: other.kind(),
            }),
        }
    }

    pub fn evaluate(&mut self, progress: f32) -> Result<Vec2> {
        self.set_progress(progress);
        self.value()
    }
}

fn scalar(value: Value) -> Result<f32> {
    match value {
        Value::Scalar(v) => Ok(v),
        other => Err(AnimError::KindMismatch {
            start: ValueKind::Scalar,
            end: other.kind(),
        }),
    }
}

impl OverrideTarget for SplitAxisAnimation {
    fn set_override(&mut self, value_override: ValueOverride) {
        debug!(?value_override, "point override attached");
        self.point_override = Some(value_override);
        self.notifier.notify();
    }

    fn clear_override(&mut self) -> Option<ValueOverride> {
        let previous = self.point_override.take();
        if previous.is_some() {
            self.notifier.notify();
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn axis(from: f32, to: f32) -> AnimatableValue {
        AnimatableValue::new(vec![Keyframe::new(
            0.0,
            Value::Scalar(from),
            10.0,
            Value::Scalar(to),
        )])
        .unwrap()
    }

    #[test]
    fn test_axes_compose_into_point() {
        let point = SplitAxisPoint::new(axis(0.0, 10.0), axis(100.0, 80.0)).unwrap();
        assert!(!point.is_static());
        let mut anim = point.create_animation(Timeline::new(0.0, 10.0, 30.0));
        assert_eq!(anim.evaluate(0.5).unwrap(), Vec2::new(5.0, 90.0));
    }

    #[test]
    fn test_flat_keyframes_are_unsupported() {
        let point = SplitAxisPoint::new(axis(0.0, 1.0), axis(0.0, 1.0)).unwrap();
        assert_eq!(
            point.keyframes().unwrap_err(),
            AnimError::UnsupportedOperation("split-axis point")
        );
    }

    #[test]
    fn test_static_only_when_both_axes_are() {
        let fixed = AnimatableValue::fixed(Value::Scalar(3.0));
        assert!(SplitAxisPoint::new(fixed.clone(), fixed.clone()).unwrap().is_static());
        assert!(!SplitAxisPoint::new(fixed, axis(0.0, 1.0)).unwrap().is_static());
    }

    #[test]
    fn test_non_scalar_axis_is_rejected() {
        let err = SplitAxisPoint::new(axis(0.0, 1.0), AnimatableValue::fixed(Value::Integer(1)))
            .unwrap_err();
        assert!(matches!(err, AnimError::KindMismatch { .. }));
    }

    #[test]
    fn test_point_and_axis_overrides() {
        let point = SplitAxisPoint::new(axis(0.0, 10.0), axis(0.0, 10.0)).unwrap();
        let mut anim = point.create_animation(Timeline::new(0.0, 10.0, 30.0));
        let notified = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notified);
        anim.set_change_listener(move || counter.set(counter.get() + 1));

        anim.y_mut().set_override(ValueOverride::fixed(Value::Scalar(-1.0)));
        assert_eq!(anim.evaluate(0.5).unwrap(), Vec2::new(5.0, -1.0));

        anim.set_override(ValueOverride::relative(Value::Point(Vec2::new(1.0, 1.0))));
        assert_eq!(anim.evaluate(0.5).unwrap(), Vec2::new(6.0, 0.0));
        assert_eq!(notified.get(), 2);
    }
}
