//! Conversion from the loader's raw keyframe arrays into [`AnimatableValue`]s.
//!
//! Raw keyframes only carry a start time; each segment ends where the next
//! raw keyframe begins and the last one stays open until the timeline ends.

use crate::animatable::AnimatableValue;
use crate::easing::CubicEasing;
use crate::error::Result;
use crate::gradient::{merge_positions, GradientColor, GradientStop};
use crate::keyframe::{Keyframe, SpatialTangents};
use crate::path::ShapePath;
use crate::split_axis::SplitAxisPoint;
use crate::text_style::TextStyleBundle;
use crate::transform::{AnimatablePosition, AnimatableTransform};
use crate::value::Value;
use animatable_data::model as data;
use glam::{Vec2, Vec4};
use tracing::{debug, warn};

fn tangent(raw: Option<&data::BezierTangent>, default: Vec2) -> Vec2 {
    let Some(raw) = raw else {
        return default;
    };
    // Multi-dimensional easing collapses onto its first component
    Vec2::new(
        raw.x.first().copied().unwrap_or(default.x),
        raw.y.first().copied().unwrap_or(default.y),
    )
}

fn spatial(to: Option<&Vec<f32>>, ti: Option<&Vec<f32>>) -> Option<SpatialTangents> {
    let (to, ti) = (to?, ti?);
    if to.len() < 2 || ti.len() < 2 {
        return None;
    }
    let tangents = SpatialTangents::new(Vec2::new(to[0], to[1]), Vec2::new(ti[0], ti[1]));
    (!tangents.is_straight()).then_some(tangents)
}

/// Turns raw keyframes into segments, converting every value with `convert`.
///
/// A keyframe without a start value is skipped; when it is the last one it
/// still closes the previous segment through that segment's end frame.
pub fn keyframes_from_raw<T>(
    raw: &[data::Keyframe<T>],
    convert: impl Fn(&T) -> Value,
) -> Vec<Keyframe> {
    let mut keyframes = Vec::with_capacity(raw.len());
    for (i, kf) in raw.iter().enumerate() {
        let next = raw.get(i + 1);
        let Some(start) = kf.s.as_ref() else {
            if next.is_some() {
                warn!(index = i, frame = kf.t, "raw keyframe without a start value skipped");
            }
            continue;
        };

        let start_value = convert(start);
        let end_value = kf
            .e
            .as_ref()
            .or_else(|| next.and_then(|n| n.s.as_ref()))
            .map(&convert);

        let easing = (kf.o.is_some() || kf.i.is_some()).then(|| {
            CubicEasing::new(
                tangent(kf.o.as_ref(), Vec2::ZERO),
                tangent(kf.i.as_ref(), Vec2::ONE),
            )
        });
        let spatial = match start_value {
            Value::Point(_) => spatial(kf.to.as_ref(), kf.ti.as_ref()),
            _ => None,
        };

        keyframes.push(Keyframe {
            start_value,
            end_value,
            start_frame: kf.t,
            end_frame: next.map(|n| n.t),
            easing,
            spatial,
            hold: kf.is_hold(),
        });
    }
    keyframes
}

/// Builds the animated value of `prop`, or `None` when the property is
/// absent from the document.
pub fn animatable_from_property<T>(
    prop: &data::Property<T>,
    convert: impl Fn(&T) -> Value,
) -> Result<Option<AnimatableValue>> {
    match &prop.k {
        data::Value::Default => Ok(None),
        data::Value::Static(v) => Ok(Some(AnimatableValue::fixed(convert(v)))),
        data::Value::Animated(raw) => {
            let keyframes = keyframes_from_raw(raw, convert);
            debug!(raw = raw.len(), segments = keyframes.len(), "imported keyframes");
            AnimatableValue::new(keyframes).map(Some)
        }
    }
}

pub fn scalar(prop: &data::Property<f32>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |v| Value::Scalar(*v))
}

/// Whole-number properties such as opacity.
pub fn integer(prop: &data::Property<f32>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |v| Value::Integer(v.round() as i32))
}

pub fn color(prop: &data::Property<data::ColorRgba>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |c| {
        Value::Color(Vec4::from(c.0).clamp(Vec4::ZERO, Vec4::ONE))
    })
}

pub fn point(prop: &data::Property<data::Vec3DefaultZero>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |v| Value::Point(Vec2::new(v.0[0], v.0[1])))
}

/// Percentages become factors: `[100, 50]` is `(1.0, 0.5)`.
pub fn scale(prop: &data::Property<data::Vec3Scale>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |v| Value::Scale(Vec2::new(v.0[0], v.0[1]) / 100.0))
}

pub fn path(prop: &data::Property<data::BezierPath>) -> Result<Option<AnimatableValue>> {
    animatable_from_property(prop, |p| {
        let points = |raw: &[data::Vec2]| -> Vec<Vec2> {
            raw.iter().map(|&[x, y]| Vec2::new(x, y)).collect()
        };
        Value::Path(ShapePath::new(p.c, points(&p.v), points(&p.i), points(&p.o)))
    })
}

pub fn gradient(colors: &data::GradientColors) -> Result<Option<AnimatableValue>> {
    let color_count = colors.p as usize;
    animatable_from_property(&colors.k, |raw| {
        Value::Gradient(gradient_from_raw(raw, color_count))
    })
}

/// Decodes the flat gradient layout: `color_count` stops of
/// `[offset, r, g, b]` followed by optional `[offset, alpha]` pairs.
///
/// When alpha stops are present, color and alpha positions are merged and
/// each side is sampled at every merged position.
pub fn gradient_from_raw(raw: &[f32], color_count: usize) -> GradientColor {
    let color_len = (color_count * 4).min(raw.len());
    let colors = GradientColor::new(
        raw[..color_len]
            .chunks_exact(4)
            .map(|c| GradientStop {
                offset: c[0],
                color: Vec4::new(c[1], c[2], c[3], 1.0),
            })
            .collect(),
    );

    let alphas = GradientColor::new(
        raw[color_len..]
            .chunks_exact(2)
            .map(|c| GradientStop {
                offset: c[0],
                color: Vec4::splat(c[1]),
            })
            .collect(),
    );
    if alphas.is_empty() {
        return colors;
    }

    let positions = merge_positions(&colors.positions(), &alphas.positions());
    GradientColor::new(
        positions
            .into_iter()
            .map(|offset| GradientStop {
                offset,
                color: colors
                    .color_at(offset)
                    .truncate()
                    .extend(alphas.color_at(offset).w),
            })
            .collect(),
    )
}

pub fn transform(raw: &data::Transform) -> Result<AnimatableTransform> {
    let position = match &raw.p {
        data::PositionProperty::Unified(p) => point(p)?.map(AnimatablePosition::Unified),
        data::PositionProperty::Split { x, y } => {
            let axis = |p: &data::Property<f32>| -> Result<AnimatableValue> {
                Ok(scalar(p)?.unwrap_or_else(|| AnimatableValue::fixed(Value::Scalar(0.0))))
            };
            Some(AnimatablePosition::Split(SplitAxisPoint::new(axis(x)?, axis(y)?)?))
        }
    };

    Ok(AnimatableTransform {
        anchor_point: point(&raw.a)?,
        position,
        scale: scale(&raw.s)?,
        rotation: scalar(&raw.r)?,
        opacity: integer(&raw.o)?,
        skew: scalar(&raw.sk)?,
        skew_angle: scalar(&raw.sa)?,
        start_opacity: scalar(&raw.so)?,
        end_opacity: scalar(&raw.eo)?,
    })
}

pub fn text_style(raw: &data::TextStyleData) -> Result<TextStyleBundle> {
    Ok(TextStyleBundle {
        color: raw.fc.as_ref().map(color).transpose()?.flatten(),
        stroke_color: raw.sc.as_ref().map(color).transpose()?.flatten(),
        stroke_width: raw.sw.as_ref().map(scalar).transpose()?.flatten(),
        tracking: raw.t.as_ref().map(scalar).transpose()?.flatten(),
    })
}
