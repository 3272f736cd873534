use crate::easing::CubicEasing;
use crate::error::Result;
use crate::value::{combine, Value};
use glam::Vec2;
use kurbo::{CubicBez, ParamCurve, ParamCurveArclen, Point};

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Spatial tangents of a point keyframe, relative to the start and end
/// positions. They bend the route the point travels, not its speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTangents {
    pub out_tangent: Vec2,
    pub in_tangent: Vec2,
}

impl SpatialTangents {
    pub fn new(out_tangent: Vec2, in_tangent: Vec2) -> Self {
        Self {
            out_tangent,
            in_tangent,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.out_tangent == Vec2::ZERO && self.in_tangent == Vec2::ZERO
    }

    /// Position at fraction `t` of the arc length of the cubic from `start`
    /// (leaving along `out_tangent`) to `end` (arriving along `in_tangent`).
    pub fn point_along(&self, start: Vec2, end: Vec2, t: f32) -> Vec2 {
        if t <= 0.0 {
            return start;
        }
        if t >= 1.0 {
            return end;
        }

        let to_point = |v: Vec2| Point::new(v.x as f64, v.y as f64);
        let curve = CubicBez::new(
            to_point(start),
            to_point(start + self.out_tangent),
            to_point(end + self.in_tangent),
            to_point(end),
        );

        let length = curve.arclen(ARCLEN_ACCURACY);
        if length <= f64::EPSILON {
            return start.lerp(end, t);
        }

        let param = curve.inv_arclen(length * t as f64, ARCLEN_ACCURACY);
        let p = curve.eval(param);
        Vec2::new(p.x as f32, p.y as f32)
    }
}

/// One animation segment: the values at its boundaries, its frame range and
/// how progress moves through it.
///
/// `end_value` is `None` only for a trailing keyframe that does not move;
/// `end_frame` is `None` when the segment runs to the end of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe<V = Value> {
    pub start_value: V,
    pub end_value: Option<V>,
    pub start_frame: f32,
    pub end_frame: Option<f32>,
    pub easing: Option<CubicEasing>,
    pub spatial: Option<SpatialTangents>,
    pub hold: bool,
}

impl<V> Keyframe<V> {
    /// Linear segment from `start_value` at `start_frame` to `end_value` at
    /// `end_frame`.
    pub fn new(start_frame: f32, start_value: V, end_frame: f32, end_value: V) -> Self {
        Self {
            start_value,
            end_value: Some(end_value),
            start_frame,
            end_frame: Some(end_frame),
            easing: None,
            spatial: None,
            hold: false,
        }
    }

    /// A keyframe that holds `value` for the whole timeline.
    pub fn fixed(value: V) -> Self {
        Self {
            start_value: value,
            end_value: None,
            start_frame: 0.0,
            end_frame: None,
            easing: None,
            spatial: None,
            hold: false,
        }
    }

    pub fn with_easing(mut self, easing: CubicEasing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn with_spatial(mut self, spatial: SpatialTangents) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn held(mut self) -> Self {
        self.hold = true;
        self
    }

    pub fn end_value_or_start(&self) -> &V {
        self.end_value.as_ref().unwrap_or(&self.start_value)
    }

    /// Last frame of the segment, closing an open end at `timeline_end`.
    pub fn end_frame_or(&self, timeline_end: f32) -> f32 {
        self.end_frame
            .unwrap_or(timeline_end)
            .max(self.start_frame)
    }

    pub fn linear_progress(&self, frame: f32, end_frame: f32) -> f32 {
        let duration = end_frame - self.start_frame;
        if duration <= 0.0 {
            return 1.0;
        }
        ((frame - self.start_frame) / duration).clamp(0.0, 1.0)
    }

    /// Maps linear segment progress through hold and temporal easing.
    pub fn eased_progress(&self, linear: f32) -> f32 {
        if self.hold {
            return if linear >= 1.0 { 1.0 } else { 0.0 };
        }
        match &self.easing {
            Some(easing) => easing.ease(linear),
            None => linear.clamp(0.0, 1.0),
        }
    }
}

impl<V: PartialEq> Keyframe<V> {
    pub fn is_static(&self) -> bool {
        self.end_value
            .as_ref()
            .map_or(true, |end| *end == self.start_value)
    }
}

impl Keyframe<Value> {
    /// Value at eased segment progress `t`.
    pub fn value_at(&self, t: f32) -> Result<Value> {
        match &self.end_value {
            None => Ok(self.start_value.clone()),
            Some(_) if t <= 0.0 => Ok(self.start_value.clone()),
            Some(end) if t >= 1.0 => Ok(end.clone()),
            Some(end) => combine(&self.start_value, end, t, self.spatial.as_ref()),
        }
    }
}

/// Where a frame falls relative to a keyframe sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    BeforeRange,
    InInterval,
    AfterRange,
}

/// The active keyframe for a frame and the progress through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub index: usize,
    pub placement: Placement,
    pub start_frame: f32,
    pub end_frame: f32,
    pub linear: f32,
    pub eased: f32,
}

/// Finds the keyframe active at `frame`.
///
/// `hint` is the index found by the previous lookup; playback usually stays
/// inside one segment for many ticks, so it is checked before searching.
/// Returns `None` only for an empty sequence.
pub fn resolve<V>(
    keyframes: &[Keyframe<V>],
    frame: f32,
    timeline_end: f32,
    hint: usize,
) -> Option<Resolved> {
    let first = keyframes.first()?;
    let last_index = keyframes.len() - 1;

    if frame <= first.start_frame {
        return Some(Resolved {
            index: 0,
            placement: Placement::BeforeRange,
            start_frame: first.start_frame,
            end_frame: first.end_frame_or(timeline_end),
            linear: 0.0,
            eased: 0.0,
        });
    }

    let last = &keyframes[last_index];
    let last_end = last.end_frame_or(timeline_end);
    if frame >= last_end {
        return Some(Resolved {
            index: last_index,
            placement: Placement::AfterRange,
            start_frame: last.start_frame,
            end_frame: last_end,
            linear: 1.0,
            eased: 1.0,
        });
    }

    let contains = |i: usize| {
        let kf = &keyframes[i];
        let next_start = keyframes.get(i + 1).map(|next| next.start_frame);
        kf.start_frame <= frame && next_start.map_or(true, |next| frame < next)
    };

    let index = if hint <= last_index && contains(hint) {
        hint
    } else {
        keyframes
            .partition_point(|kf| kf.start_frame <= frame)
            .saturating_sub(1)
    };

    let kf = &keyframes[index];
    let end_frame = kf.end_frame_or(timeline_end);
    let linear = kf.linear_progress(frame, end_frame);
    Some(Resolved {
        index,
        placement: Placement::InInterval,
        start_frame: kf.start_frame,
        end_frame,
        linear,
        eased: kf.eased_progress(linear),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_sequence() -> Vec<Keyframe<f32>> {
        vec![
            Keyframe::new(0.0, 0.0, 10.0, 10.0),
            Keyframe::new(10.0, 10.0, 20.0, 30.0),
            Keyframe::new(20.0, 30.0, 40.0, 0.0).held(),
        ]
    }

    #[test]
    fn test_resolve_binary_search() {
        let keyframes = scalar_sequence();

        let r = resolve(&keyframes, -5.0, 60.0, 0).unwrap();
        assert_eq!(r.placement, Placement::BeforeRange);
        assert_eq!((r.index, r.linear), (0, 0.0));

        let r = resolve(&keyframes, 5.0, 60.0, 0).unwrap();
        assert_eq!((r.index, r.linear), (0, 0.5));

        // Segment boundaries belong to the segment that starts there
        let r = resolve(&keyframes, 10.0, 60.0, 0).unwrap();
        assert_eq!((r.index, r.linear), (1, 0.0));

        let r = resolve(&keyframes, 15.0, 60.0, 2).unwrap();
        assert_eq!((r.index, r.linear), (1, 0.5));

        let r = resolve(&keyframes, 40.0, 60.0, 1).unwrap();
        assert_eq!(r.placement, Placement::AfterRange);
        assert_eq!((r.index, r.linear, r.eased), (2, 1.0, 1.0));
    }

    #[test]
    fn test_hold_reports_start_until_the_end() {
        let keyframes = scalar_sequence();
        let r = resolve(&keyframes, 39.9, 60.0, 0).unwrap();
        assert_eq!(r.index, 2);
        assert!(r.linear < 1.0);
        assert_eq!(r.eased, 0.0);
    }

    #[test]
    fn test_open_end_runs_to_timeline_end() {
        let mut keyframes = scalar_sequence();
        keyframes[2].end_frame = None;
        let r = resolve(&keyframes, 40.0, 60.0, 0).unwrap();
        assert_eq!(r.placement, Placement::InInterval);
        assert_eq!(r.end_frame, 60.0);
        assert_eq!(r.linear, 0.5);
    }

    #[test]
    fn test_zero_length_segment_is_complete() {
        let keyframes = vec![
            Keyframe::new(0.0, 0.0, 10.0, 1.0),
            Keyframe::new(10.0, 1.0, 10.0, 5.0),
            Keyframe::new(10.0, 5.0, 20.0, 5.0),
        ];
        assert_eq!(keyframes[1].linear_progress(10.0, 10.0), 1.0);
        let r = resolve(&keyframes, 10.0, 20.0, 0).unwrap();
        assert_eq!(r.index, 2);
    }

    #[test]
    fn test_nan_frame_does_not_underflow() {
        let keyframes = scalar_sequence();
        let r = resolve(&keyframes, f32::NAN, 60.0, 5).unwrap();
        assert_eq!(r.index, 0);
    }

    #[test]
    fn test_empty_sequence() {
        let keyframes: Vec<Keyframe<f32>> = Vec::new();
        assert!(resolve(&keyframes, 0.0, 10.0, 0).is_none());
    }

    #[test]
    fn test_static_keyframes() {
        assert!(Keyframe::fixed(3.0_f32).is_static());
        assert!(Keyframe::new(0.0, 3.0_f32, 10.0, 3.0).is_static());
        assert!(!Keyframe::new(0.0, 3.0_f32, 10.0, 4.0).is_static());
    }

    #[test]
    fn test_spatial_path_bends_the_route() {
        let tangents = SpatialTangents::new(Vec2::new(0.0, 50.0), Vec2::new(0.0, 50.0));
        let start = Vec2::ZERO;
        let end = Vec2::new(100.0, 0.0);

        let mid = tangents.point_along(start, end, 0.5);
        assert!((mid.x - 50.0).abs() < 0.5);
        assert!(mid.y > 10.0, "expected the route to bow downwards, got {mid:?}");

        assert_eq!(tangents.point_along(start, end, 0.0), start);
        assert_eq!(tangents.point_along(start, end, 1.0), end);
        assert!(SpatialTangents::new(Vec2::ZERO, Vec2::ZERO).is_straight());
    }
}
