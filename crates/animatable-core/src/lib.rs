//! Keyframe interpolation for animated properties.
//!
//! An [`AnimatableValue`] holds the immutable keyframes of one property;
//! [`Animatable::create_animation`] hands out a [`KeyframeAnimation`] that
//! turns a playback progress into a concrete [`Value`], optionally adjusted
//! by a [`ValueOverride`]. Composites ([`AnimatableTransform`],
//! [`SplitAxisPoint`], [`TextStyleBundle`]) aggregate several values.

pub mod animatable;
pub mod animation;
pub mod easing;
pub mod error;
pub mod gradient;
pub mod import;
pub mod key_path;
pub mod keyframe;
pub mod overrides;
pub mod path;
pub mod split_axis;
pub mod text_style;
pub mod timeline;
pub mod transform;
pub mod value;

pub use animatable::{Animatable, AnimatableValue};
pub use animation::{FrameInfo, KeyframeAnimation, OverrideTarget};
pub use easing::CubicEasing;
pub use error::{AnimError, Result};
pub use gradient::{merge_positions, GradientColor, GradientStop};
pub use key_path::{KeyPath, OverrideRegistry, PropertyId};
pub use keyframe::{Keyframe, SpatialTangents};
pub use overrides::{RelativeOffset, ValueOverride};
pub use path::ShapePath;
pub use split_axis::{SplitAxisAnimation, SplitAxisPoint};
pub use text_style::{TextStyle, TextStyleAnimation, TextStyleBundle};
pub use timeline::Timeline;
pub use transform::{AnimatablePosition, AnimatableTransform, TransformAnimation, TransformSample};
pub use value::{combine, Value, ValueKind};
