use crate::animation::KeyframeAnimation;
use crate::error::{AnimError, Result};
use crate::gradient;
use crate::keyframe::Keyframe;
use crate::timeline::Timeline;
use crate::value::{Value, ValueKind};
use std::sync::Arc;

/// Something that can be turned into a per-tick evaluator.
///
/// Composites implement this too, but only plain keyframed values have a
/// flat keyframe list; composites answer `keyframes` with
/// [`AnimError::UnsupportedOperation`].
pub trait Animatable {
    type Animation;

    fn keyframes(&self) -> Result<&[Keyframe]>;

    fn is_static(&self) -> bool;

    fn create_animation(&self, timeline: Timeline) -> Self::Animation;
}

/// The keyframes of one animated property.
///
/// Immutable once built; evaluation state lives in the
/// [`KeyframeAnimation`] returned by [`Animatable::create_animation`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatableValue {
    keyframes: Arc<[Keyframe]>,
    kind: ValueKind,
}

impl AnimatableValue {
    /// Validates and stores a keyframe sequence.
    ///
    /// Every value must share one kind, start frames must not decrease, no
    /// interval may run past the next keyframe's start, and path endpoints
    /// must agree on vertex count. Gradient endpoints with differing stop
    /// counts are re-expressed on merged stop positions.
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self> {
        let kind = keyframes
            .first()
            .map(|kf| kf.start_value.kind())
            .ok_or(AnimError::NoKeyframes)?;

        let mut previous_start = f32::NEG_INFINITY;
        for (index, keyframe) in keyframes.iter().enumerate() {
            if keyframe.start_frame < previous_start {
                return Err(AnimError::UnorderedKeyframes {
                    index,
                    frame: keyframe.start_frame,
                });
            }
            previous_start = keyframe.start_frame;

            keyframe.start_value.ensure_kind(kind)?;
            if let Some(end) = &keyframe.end_value {
                end.ensure_kind(kind)?;
                if let (Value::Path(start), Value::Path(end)) = (&keyframe.start_value, end) {
                    if start.len() != end.len() {
                        return Err(AnimError::ShapeMismatch {
                            start: start.len(),
                            end: end.len(),
                        });
                    }
                }
            }
        }

        for (index, pair) in keyframes.windows(2).enumerate() {
            if let Some(end) = pair[0].end_frame.filter(|&end| end > pair[1].start_frame) {
                return Err(AnimError::OverlappingKeyframes {
                    index,
                    end,
                    next_start: pair[1].start_frame,
                });
            }
        }

        let keyframes = if kind == ValueKind::Gradient {
            gradient::normalize_keyframes(keyframes)
        } else {
            keyframes
        };

        Ok(Self {
            keyframes: keyframes.into(),
            kind,
        })
    }

    /// A value that never moves.
    pub fn fixed(value: Value) -> Self {
        let kind = value.kind();
        Self {
            keyframes: Arc::from(vec![Keyframe::fixed(value)]),
            kind,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The sole value of a static property.
    pub fn static_value(&self) -> Option<&Value> {
        if self.is_static() {
            self.keyframes.first().map(|kf| &kf.start_value)
        } else {
            None
        }
    }
}

impl Animatable for AnimatableValue {
    type Animation = KeyframeAnimation;

    fn keyframes(&self) -> Result<&[Keyframe]> {
        Ok(&self.keyframes[..])
    }

    fn is_static(&self) -> bool {
        self.keyframes.len() == 1 && self.keyframes[0].is_static()
    }

    fn create_animation(&self, timeline: Timeline) -> KeyframeAnimation {
        KeyframeAnimation::new(Arc::clone(&self.keyframes), self.is_static(), timeline)
    }
}
