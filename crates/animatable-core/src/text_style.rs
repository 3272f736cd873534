use crate::animatable::{Animatable, AnimatableValue};
use crate::animation::{KeyframeAnimation, OverrideTarget};
use crate::error::{AnimError, Result};
use crate::key_path::PropertyId;
use crate::keyframe::Keyframe;
use crate::timeline::Timeline;
use crate::value::{Value, ValueKind};
use glam::Vec4;

/// Animated text appearance. Each attribute is optional and evaluated on
/// its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyleBundle {
    pub color: Option<AnimatableValue>,
    pub stroke_color: Option<AnimatableValue>,
    pub stroke_width: Option<AnimatableValue>,
    pub tracking: Option<AnimatableValue>,
}

impl Animatable for TextStyleBundle {
    type Animation = TextStyleAnimation;

    fn keyframes(&self) -> Result<&[Keyframe]> {
        Err(AnimError::UnsupportedOperation("text style"))
    }

    fn is_static(&self) -> bool {
        [
            &self.color,
            &self.stroke_color,
            &self.stroke_width,
            &self.tracking,
        ]
        .into_iter()
        .flatten()
        .all(|v| v.is_static())
    }

    fn create_animation(&self, timeline: Timeline) -> TextStyleAnimation {
        let engine = |v: &Option<AnimatableValue>| v.as_ref().map(|v| v.create_animation(timeline));
        TextStyleAnimation {
            color: engine(&self.color),
            stroke_color: engine(&self.stroke_color),
            stroke_width: engine(&self.stroke_width),
            tracking: engine(&self.tracking),
        }
    }
}

/// Text attributes at one instant; `None` where the bundle has no value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextStyle {
    pub color: Option<Vec4>,
    pub stroke_color: Option<Vec4>,
    pub stroke_width: Option<f32>,
    pub tracking: Option<f32>,
}

#[derive(Debug)]
pub struct TextStyleAnimation {
    color: Option<KeyframeAnimation>,
    stroke_color: Option<KeyframeAnimation>,
    stroke_width: Option<KeyframeAnimation>,
    tracking: Option<KeyframeAnimation>,
}

impl TextStyleAnimation {
    pub fn evaluate(&mut self, progress: f32) -> Result<TextStyle> {
        Ok(TextStyle {
            color: attribute(&mut self.color, progress, ValueKind::Color, Value::as_color)?,
            stroke_color: attribute(&mut self.stroke_color, progress, ValueKind::Color, Value::as_color)?,
            stroke_width: attribute(&mut self.stroke_width, progress, ValueKind::Scalar, Value::as_scalar)?,
            tracking: attribute(&mut self.tracking, progress, ValueKind::Scalar, Value::as_scalar)?,
        })
    }

    pub fn channel_mut(&mut self, property: PropertyId) -> Option<&mut dyn OverrideTarget> {
        let channel = match property {
            PropertyId::Color => self.color.as_mut(),
            PropertyId::StrokeColor => self.stroke_color.as_mut(),
            PropertyId::StrokeWidth => self.stroke_width.as_mut(),
            PropertyId::Tracking => self.tracking.as_mut(),
            _ => None,
        };
        channel.map(|anim| anim as &mut dyn OverrideTarget)
    }
}

fn attribute<T>(
    anim: &mut Option<KeyframeAnimation>,
    progress: f32,
    kind: ValueKind,
    extract: fn(&Value) -> Option<T>,
) -> Result<Option<T>> {
    let Some(anim) = anim else {
        return Ok(None);
    };
    let value = anim.evaluate(progress)?;
    extract(&value).map(Some).ok_or(AnimError::KindMismatch {
        start: kind,
        end: value.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::ValueOverride;

    #[test]
    fn test_attributes_evaluate_independently() {
        let bundle = TextStyleBundle {
            color: Some(AnimatableValue::fixed(Value::Color(Vec4::new(1.0, 0.0, 0.0, 1.0)))),
            tracking: Some(
                AnimatableValue::new(vec![Keyframe::new(
                    0.0,
                    Value::Scalar(0.0),
                    10.0,
                    Value::Scalar(20.0),
                )])
                .unwrap(),
            ),
            ..Default::default()
        };
        assert!(!bundle.is_static());

        let mut anim = bundle.create_animation(Timeline::new(0.0, 10.0, 30.0));
        let style = anim.evaluate(0.25).unwrap();
        assert_eq!(style.color, Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(style.tracking, Some(5.0));
        assert_eq!(style.stroke_color, None);
        assert_eq!(style.stroke_width, None);
    }

    #[test]
    fn test_empty_bundle() {
        let bundle = TextStyleBundle::default();
        assert!(bundle.is_static());
        assert!(matches!(bundle.keyframes(), Err(AnimError::UnsupportedOperation(_))));
        let style = bundle.create_animation(Timeline::default()).evaluate(1.0).unwrap();
        assert_eq!(style, TextStyle::default());
    }

    #[test]
    fn test_stroke_width_override() {
        let bundle = TextStyleBundle {
            stroke_width: Some(AnimatableValue::fixed(Value::Scalar(2.0))),
            ..Default::default()
        };
        let mut anim = bundle.create_animation(Timeline::default());
        assert!(anim.channel_mut(PropertyId::Tracking).is_none());
        anim.channel_mut(PropertyId::StrokeWidth)
            .unwrap()
            .set_override(ValueOverride::relative(Value::Scalar(1.5)));
        assert_eq!(anim.evaluate(0.5).unwrap().stroke_width, Some(3.5));
    }
}
