use crate::error::{AnimError, Result};
use crate::gradient::GradientColor;
use crate::keyframe::SpatialTangents;
use crate::path::ShapePath;
use glam::{Vec2, Vec4};

/// The kinds of value an animated property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Integer,
    Color,
    Point,
    Scale,
    Path,
    Gradient,
}

/// A concrete property value, as stored in keyframes and handed to the
/// drawing stage.
///
/// Colors are RGBA with every channel in `0..=1`. Scale is a factor per axis
/// (`1.0` is unscaled).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f32),
    Integer(i32),
    Color(Vec4),
    Point(Vec2),
    Scale(Vec2),
    Path(ShapePath),
    Gradient(GradientColor),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Integer(_) => ValueKind::Integer,
            Value::Color(_) => ValueKind::Color,
            Value::Point(_) => ValueKind::Point,
            Value::Scale(_) => ValueKind::Scale,
            Value::Path(_) => ValueKind::Path,
            Value::Gradient(_) => ValueKind::Gradient,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Vec4> {
        match self {
            Value::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Vec2> {
        match self {
            Value::Point(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_scale(&self) -> Option<Vec2> {
        match self {
            Value::Scale(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&ShapePath> {
        match self {
            Value::Path(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_gradient(&self) -> Option<&GradientColor> {
        match self {
            Value::Gradient(v) => Some(v),
            _ => None,
        }
    }

    /// Composes a relative override's `offset` onto this value.
    pub fn offset_by(&self, offset: &Value) -> Result<Value> {
        match (self, offset) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(a + b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.saturating_add(*b))),
            (Value::Color(a), Value::Color(b)) => {
                Ok(Value::Color((*a + *b).clamp(Vec4::ZERO, Vec4::ONE)))
            }
            (Value::Point(a), Value::Point(b)) => Ok(Value::Point(*a + *b)),
            (Value::Scale(a), Value::Scale(b)) => Ok(Value::Scale(*a + *b)),
            (Value::Path(_), Value::Path(_)) | (Value::Gradient(_), Value::Gradient(_)) => {
                Err(AnimError::NotOffsettable(self.kind()))
            }
            _ => Err(AnimError::KindMismatch {
                start: self.kind(),
                end: offset.kind(),
            }),
        }
    }

    pub(crate) fn ensure_kind(&self, kind: ValueKind) -> Result<&Value> {
        if self.kind() == kind {
            Ok(self)
        } else {
            Err(AnimError::KindMismatch {
                start: kind,
                end: self.kind(),
            })
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolates between two keyframe endpoint values at progress `t`.
///
/// This is the one place where value kinds get their own rule; everything
/// upstream (keyframe lookup, easing, overrides) is kind-agnostic. `spatial`
/// only affects points.
pub fn combine(
    start: &Value,
    end: &Value,
    t: f32,
    spatial: Option<&SpatialTangents>,
) -> Result<Value> {
    match (start, end) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(lerp(*a, *b, t))),
        (Value::Integer(a), Value::Integer(b)) => {
            Ok(Value::Integer(lerp(*a as f32, *b as f32, t).round() as i32))
        }
        (Value::Color(a), Value::Color(b)) => {
            Ok(Value::Color(a.lerp(*b, t).clamp(Vec4::ZERO, Vec4::ONE)))
        }
        (Value::Point(a), Value::Point(b)) => Ok(Value::Point(match spatial {
            Some(tangents) if !tangents.is_straight() => tangents.point_along(*a, *b, t),
            _ => a.lerp(*b, t),
        })),
        (Value::Scale(a), Value::Scale(b)) => Ok(Value::Scale(a.lerp(*b, t))),
        (Value::Path(a), Value::Path(b)) => a.lerp(b, t).map(Value::Path),
        (Value::Gradient(a), Value::Gradient(b)) => a.lerp(b, t).map(Value::Gradient),
        _ => Err(AnimError::KindMismatch {
            start: start.kind(),
            end: end.kind(),
        }),
    }
}
