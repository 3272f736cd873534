//! Multi-stop gradients and the stop-position merge that makes two gradients
//! with different stop counts interpolatable.

use crate::error::{AnimError, Result};
use crate::keyframe::Keyframe;
use crate::value::Value;
use glam::Vec4;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Vec4,
}

/// Color stops ordered by offset. Offsets lie in `[0, 1]` and need not be
/// evenly spaced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientColor {
    pub stops: Vec<GradientStop>,
}

impl GradientColor {
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Self { stops }
    }

    pub fn from_parts(positions: &[f32], colors: &[Vec4]) -> Self {
        Self {
            stops: positions
                .iter()
                .zip(colors)
                .map(|(&offset, &color)| GradientStop { offset, color })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn positions(&self) -> Vec<f32> {
        self.stops.iter().map(|s| s.offset).collect()
    }

    /// Color this gradient shows at `offset`: the stop color on an exact
    /// hit, a blend of the two bracketing stops between them, and the nearest
    /// end stop outside the stop range.
    pub fn color_at(&self, offset: f32) -> Vec4 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Vec4::ZERO;
        };
        if offset <= first.offset {
            return first.color;
        }
        if offset >= last.offset {
            return last.color;
        }

        let upper = self.stops.partition_point(|s| s.offset <= offset);
        let lo = &self.stops[upper - 1];
        let hi = &self.stops[upper];
        if lo.offset == offset {
            return lo.color;
        }
        let span = hi.offset - lo.offset;
        if span <= 0.0 {
            return hi.color;
        }
        lo.color.lerp(hi.color, (offset - lo.offset) / span)
    }

    /// The same gradient re-expressed on a new set of stop offsets.
    pub fn with_positions(&self, positions: &[f32]) -> Self {
        Self {
            stops: positions
                .iter()
                .map(|&offset| GradientStop {
                    offset,
                    color: self.color_at(offset),
                })
                .collect(),
        }
    }

    /// Per-index interpolation of offset and color.
    pub fn lerp(&self, other: &Self, t: f32) -> Result<Self> {
        if self.len() != other.len() {
            return Err(AnimError::StopCountMismatch {
                start: self.len(),
                end: other.len(),
            });
        }
        Ok(Self {
            stops: self
                .stops
                .iter()
                .zip(&other.stops)
                .map(|(a, b)| GradientStop {
                    offset: a.offset + (b.offset - a.offset) * t,
                    color: a.color.lerp(b.color, t).clamp(Vec4::ZERO, Vec4::ONE),
                })
                .collect(),
        })
    }
}

/// Sorted union of two stop-position lists with exact duplicates removed.
///
/// No tolerance is applied: `0.3` and `0.30000001` stay distinct.
pub fn merge_positions(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    merged.extend_from_slice(a);
    merged.extend_from_slice(b);
    merged.sort_by(|x, y| x.total_cmp(y));
    merged.dedup();
    merged
}

/// Returns the keyframes with every gradient start/end pair of differing
/// stop counts re-expressed on their merged stop positions.
///
/// Non-gradient keyframes and matching pairs pass through untouched.
pub fn normalize_keyframes(keyframes: Vec<Keyframe>) -> Vec<Keyframe> {
    keyframes
        .into_iter()
        .enumerate()
        .map(|(index, mut keyframe)| {
            let merged = match (&keyframe.start_value, &keyframe.end_value) {
                (Value::Gradient(start), Some(Value::Gradient(end))) if start.len() != end.len() => {
                    let positions = merge_positions(&start.positions(), &end.positions());
                    debug!(
                        index,
                        start_stops = start.len(),
                        end_stops = end.len(),
                        merged_stops = positions.len(),
                        "merging gradient stops"
                    );
                    Some((start.with_positions(&positions), end.with_positions(&positions)))
                }
                _ => None,
            };
            if let Some((start, end)) = merged {
                keyframe.start_value = Value::Gradient(start);
                keyframe.end_value = Some(Value::Gradient(end));
            }
            keyframe
        })
        .collect()
}
