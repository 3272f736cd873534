//! Layer and shape transforms assembled from independently animated channels.

use crate::animatable::{Animatable, AnimatableValue};
use crate::animation::{KeyframeAnimation, OverrideTarget};
use crate::error::{AnimError, Result};
use crate::key_path::PropertyId;
use crate::keyframe::Keyframe;
use crate::split_axis::{SplitAxisAnimation, SplitAxisPoint};
use crate::timeline::Timeline;
use crate::value::{Value, ValueKind};
use glam::{Mat3, Vec2, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub enum AnimatablePosition {
    Unified(AnimatableValue),
    Split(SplitAxisPoint),
}

impl AnimatablePosition {
    fn is_static(&self) -> bool {
        match self {
            AnimatablePosition::Unified(value) => value.is_static(),
            AnimatablePosition::Split(point) => point.is_static(),
        }
    }
}

/// The channels of a transform. Absent channels take identity values.
///
/// Rotation, skew and skew angle are in degrees; opacities are percentages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimatableTransform {
    pub anchor_point: Option<AnimatableValue>,
    pub position: Option<AnimatablePosition>,
    pub scale: Option<AnimatableValue>,
    pub rotation: Option<AnimatableValue>,
    pub opacity: Option<AnimatableValue>,
    pub skew: Option<AnimatableValue>,
    pub skew_angle: Option<AnimatableValue>,
    pub start_opacity: Option<AnimatableValue>,
    pub end_opacity: Option<AnimatableValue>,
}

impl AnimatableTransform {
    fn channels(&self) -> [Option<&AnimatableValue>; 8] {
        [
            self.anchor_point.as_ref(),
            self.scale.as_ref(),
            self.rotation.as_ref(),
            self.opacity.as_ref(),
            self.skew.as_ref(),
            self.skew_angle.as_ref(),
            self.start_opacity.as_ref(),
            self.end_opacity.as_ref(),
        ]
    }
}

impl Animatable for AnimatableTransform {
    type Animation = TransformAnimation;

    fn keyframes(&self) -> Result<&[Keyframe]> {
        Err(AnimError::UnsupportedOperation("transform"))
    }

    fn is_static(&self) -> bool {
        self.channels().into_iter().flatten().all(|c| c.is_static())
            && self.position.as_ref().map_or(true, |p| p.is_static())
    }

    fn create_animation(&self, timeline: Timeline) -> TransformAnimation {
        let engine = |value: &Option<AnimatableValue>| {
            value.as_ref().map(|v| v.create_animation(timeline))
        };
        TransformAnimation {
            anchor_point: engine(&self.anchor_point),
            position: self.position.as_ref().map(|p| match p {
                AnimatablePosition::Unified(v) => {
                    PositionAnimation::Unified(v.create_animation(timeline))
                }
                AnimatablePosition::Split(s) => PositionAnimation::Split(s.create_animation(timeline)),
            }),
            scale: engine(&self.scale),
            rotation: engine(&self.rotation),
            opacity: engine(&self.opacity),
            skew: engine(&self.skew),
            skew_angle: engine(&self.skew_angle),
            start_opacity: engine(&self.start_opacity),
            end_opacity: engine(&self.end_opacity),
        }
    }
}

#[derive(Debug)]
pub enum PositionAnimation {
    Unified(KeyframeAnimation),
    Split(SplitAxisAnimation),
}

/// Every transform channel resolved at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSample {
    pub anchor_point: Vec2,
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub opacity: i32,
    pub skew: f32,
    pub skew_angle: f32,
    pub start_opacity: f32,
    pub end_opacity: f32,
}

impl Default for TransformSample {
    fn default() -> Self {
        Self {
            anchor_point: Vec2::ZERO,
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            opacity: 100,
            skew: 0.0,
            skew_angle: 0.0,
            start_opacity: 100.0,
            end_opacity: 100.0,
        }
    }
}

impl TransformSample {
    /// `T(position) · R(rotation) · Skew · S(scale) · T(-anchor)`.
    pub fn matrix(&self) -> Mat3 {
        let mat_t = Mat3::from_translation(self.position);
        let mat_r = Mat3::from_angle(self.rotation.to_radians());

        let mat_skew = if self.skew == 0.0 {
            Mat3::IDENTITY
        } else {
            // Shear along the skew axis: rotate onto it, shear, rotate back
            let axis = self.skew_angle.to_radians();
            let shear = Mat3::from_cols(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(self.skew.to_radians().tan(), 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            );
            Mat3::from_angle(axis) * shear * Mat3::from_angle(-axis)
        };

        let mat_s = Mat3::from_scale(self.scale);
        let mat_a = Mat3::from_translation(-self.anchor_point);

        mat_t * mat_r * mat_skew * mat_s * mat_a
    }
}

/// Per-tick evaluator for an [`AnimatableTransform`].
#[derive(Debug)]
pub struct TransformAnimation {
    anchor_point: Option<KeyframeAnimation>,
    position: Option<PositionAnimation>,
    scale: Option<KeyframeAnimation>,
    rotation: Option<KeyframeAnimation>,
    opacity: Option<KeyframeAnimation>,
    skew: Option<KeyframeAnimation>,
    skew_angle: Option<KeyframeAnimation>,
    start_opacity: Option<KeyframeAnimation>,
    end_opacity: Option<KeyframeAnimation>,
}

impl TransformAnimation {
    pub fn evaluate(&mut self, progress: f32) -> Result<TransformSample> {
        let defaults = TransformSample::default();

        let position = match &mut self.position {
            None => defaults.position,
            Some(PositionAnimation::Unified(anim)) => point(anim.evaluate(progress)?)?,
            Some(PositionAnimation::Split(anim)) => anim.evaluate(progress)?,
        };

        Ok(TransformSample {
            anchor_point: sample(&mut self.anchor_point, progress, defaults.anchor_point, point)?,
            position,
            scale: sample(&mut self.scale, progress, defaults.scale, scale)?,
            rotation: sample(&mut self.rotation, progress, defaults.rotation, scalar)?,
            opacity: sample(&mut self.opacity, progress, defaults.opacity, integer)?,
            skew: sample(&mut self.skew, progress, defaults.skew, scalar)?,
            skew_angle: sample(&mut self.skew_angle, progress, defaults.skew_angle, scalar)?,
            start_opacity: sample(&mut self.start_opacity, progress, defaults.start_opacity, scalar)?,
            end_opacity: sample(&mut self.end_opacity, progress, defaults.end_opacity, scalar)?,
        })
    }

    pub fn matrix(&mut self, progress: f32) -> Result<Mat3> {
        Ok(self.evaluate(progress)?.matrix())
    }

    /// The engine behind `property`, if this transform animates it.
    pub fn channel_mut(&mut self, property: PropertyId) -> Option<&mut dyn OverrideTarget> {
        let channel = match property {
            PropertyId::TransformAnchorPoint => self.anchor_point.as_mut(),
            PropertyId::TransformScale => self.scale.as_mut(),
            PropertyId::TransformRotation => self.rotation.as_mut(),
            PropertyId::TransformOpacity => self.opacity.as_mut(),
            PropertyId::TransformSkew => self.skew.as_mut(),
            PropertyId::TransformSkewAngle => self.skew_angle.as_mut(),
            PropertyId::TransformStartOpacity => self.start_opacity.as_mut(),
            PropertyId::TransformEndOpacity => self.end_opacity.as_mut(),
            PropertyId::TransformPosition => {
                return match self.position.as_mut()? {
                    PositionAnimation::Unified(anim) => Some(anim as &mut dyn OverrideTarget),
                    PositionAnimation::Split(anim) => Some(anim as &mut dyn OverrideTarget),
                };
            }
            PropertyId::TransformPositionX | PropertyId::TransformPositionY => {
                let Some(PositionAnimation::Split(anim)) = self.position.as_mut() else {
                    return None;
                };
                let axis = if property == PropertyId::TransformPositionX {
                    anim.x_mut()
                } else {
                    anim.y_mut()
                };
                return Some(axis as &mut dyn OverrideTarget);
            }
            _ => None,
        };
        channel.map(|anim| anim as &mut dyn OverrideTarget)
    }
}

fn sample<T>(
    anim: &mut Option<KeyframeAnimation>,
    progress: f32,
    default: T,
    extract: fn(Value) -> Result<T>,
) -> Result<T> {
    match anim {
        Some(anim) => extract(anim.evaluate(progress)?),
        None => Ok(default),
    }
}

fn mismatch(expected: ValueKind, found: &Value) -> AnimError {
    AnimError::KindMismatch {
        start: expected,
        end: found.kind(),
    }
}

fn point(value: Value) -> Result<Vec2> {
    value.as_point().ok_or_else(|| mismatch(ValueKind::Point, &value))
}

fn scale(value: Value) -> Result<Vec2> {
    value.as_scale().ok_or_else(|| mismatch(ValueKind::Scale, &value))
}

fn scalar(value: Value) -> Result<f32> {
    value.as_scalar().ok_or_else(|| mismatch(ValueKind::Scalar, &value))
}

fn integer(value: Value) -> Result<i32> {
    value.as_integer().ok_or_else(|| mismatch(ValueKind::Integer, &value))
}
