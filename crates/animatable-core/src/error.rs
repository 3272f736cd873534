//! Error types for keyframe evaluation.

use crate::value::ValueKind;
use thiserror::Error;

/// Result type for animatable operations.
pub type Result<T> = std::result::Result<T, AnimError>;

/// Contract violations raised while building or evaluating animated values.
///
/// None of these are recoverable at runtime: they describe an inconsistent
/// animation description or misuse of the override API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    /// A composite was asked for a flat keyframe list it does not have.
    #[error("{0} does not expose a flat keyframe sequence; query its components instead")]
    UnsupportedOperation(&'static str),

    /// A relative override has neither a static offset nor an offset callback.
    #[error("relative override was queried without an offset value or callback")]
    MissingOverrideValue,

    /// Two path keyframes have different vertex counts.
    #[error("cannot interpolate a path of {start} vertices into one of {end} vertices")]
    ShapeMismatch { start: usize, end: usize },

    /// Two gradient endpoints have different stop counts.
    #[error("cannot interpolate a gradient of {start} stops into one of {end} stops")]
    StopCountMismatch { start: usize, end: usize },

    /// Values of different kinds were mixed.
    #[error("cannot combine a {start:?} value with a {end:?} value")]
    KindMismatch { start: ValueKind, end: ValueKind },

    /// The value kind has no additive offset.
    #[error("{0:?} values cannot be offset by a relative override")]
    NotOffsettable(ValueKind),

    /// An animatable value was built from an empty keyframe list.
    #[error("animatable value has no keyframes")]
    NoKeyframes,

    /// A keyframe's interval runs past the start of the keyframe after it.
    #[error("keyframe {index} ends at frame {end}, after the next keyframe starts at {next_start}")]
    OverlappingKeyframes {
        index: usize,
        end: f32,
        next_start: f32,
    },

    /// Evaluation was asked for a frame that is not a number.
    #[error("cannot evaluate at frame {0}")]
    InvalidFrame(f32),

    /// Keyframes are not in time order.
    #[error("keyframe {index} starts at frame {frame}, before the keyframe preceding it")]
    UnorderedKeyframes { index: usize, frame: f32 },
}
