use crate::error::{AnimError, Result};
use crate::keyframe::{self, Keyframe};
use crate::overrides::ValueOverride;
use crate::timeline::Timeline;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Everything an override callback may want to know about the current tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub start_frame: f32,
    pub end_frame: f32,
    pub start_value: &'a Value,
    pub end_value: &'a Value,
    /// Progress through the active keyframe before easing.
    pub linear_progress: f32,
    /// Progress through the active keyframe after hold and easing.
    pub eased_progress: f32,
    /// Progress through the whole timeline.
    pub overall_progress: f32,
}

/// The single observer told when previously produced values went stale.
#[derive(Default)]
pub struct ChangeNotifier {
    listener: Option<Box<dyn FnMut()>>,
}

impl ChangeNotifier {
    pub fn set(&mut self, listener: impl FnMut() + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear(&mut self) {
        self.listener = None;
    }

    pub fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("registered", &self.listener.is_some())
            .finish()
    }
}

/// Anything an override can be attached to.
pub trait OverrideTarget {
    /// Attaches `value_override`, replacing any previous one, and notifies
    /// the change listener.
    fn set_override(&mut self, value_override: ValueOverride);

    /// Detaches the current override, notifying the listener if there was one.
    fn clear_override(&mut self) -> Option<ValueOverride>;
}

/// Per-tick evaluator for one keyframed property.
///
/// Holds the playback position, the last computed value and an optional
/// override. One owner drives it from one thread; the `&mut self` API
/// enforces that.
#[derive(Debug)]
pub struct KeyframeAnimation {
    keyframes: Arc<[Keyframe]>,
    is_static: bool,
    timeline: Timeline,
    progress: f32,
    cached_index: usize,
    cached_value: Option<(f32, Value)>,
    value_override: Option<ValueOverride>,
    notifier: ChangeNotifier,
}

impl KeyframeAnimation {
    pub(crate) fn new(keyframes: Arc<[Keyframe]>, is_static: bool, timeline: Timeline) -> Self {
        Self {
            keyframes,
            is_static,
            timeline,
            progress: 0.0,
            cached_index: 0,
            cached_value: None,
            value_override: None,
            notifier: ChangeNotifier::default(),
        }
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Registers the callback run when an override is set or cleared.
    pub fn set_change_listener(&mut self, listener: impl FnMut() + 'static) {
        self.notifier.set(listener);
    }

    pub fn has_override(&self) -> bool {
        self.value_override.is_some()
    }

    /// Value at the current progress.
    pub fn value(&mut self) -> Result<Value> {
        let frame = self.timeline.frame_at(self.progress);
        self.compute(frame)
    }

    /// Moves to `progress` and returns the value there.
    pub fn evaluate(&mut self, progress: f32) -> Result<Value> {
        self.set_progress(progress);
        self.value()
    }

    /// Moves to `frame` and returns the value there.
    pub fn value_at_frame(&mut self, frame: f32) -> Result<Value> {
        self.progress = self.timeline.progress_at(frame);
        self.compute(frame)
    }

    fn compute(&mut self, frame: f32) -> Result<Value> {
        if frame.is_nan() {
            return Err(AnimError::InvalidFrame(frame));
        }
        if self.value_override.is_none() {
            if let Some((cached_frame, value)) = &self.cached_value {
                if *cached_frame == frame {
                    return Ok(value.clone());
                }
            }
        }

        let Some(resolved) =
            keyframe::resolve(&self.keyframes[..], frame, self.timeline.end_frame, self.cached_index)
        else {
            // AnimatableValue never builds an empty sequence
            return Err(AnimError::NoKeyframes);
        };
        self.cached_index = resolved.index;
        trace!(
            frame,
            index = resolved.index,
            placement = ?resolved.placement,
            linear = resolved.linear,
            eased = resolved.eased,
            "resolved keyframe"
        );

        let keyframe = &self.keyframes[resolved.index];
        let natural = if self.is_static {
            keyframe.start_value.clone()
        } else {
            keyframe.value_at(resolved.eased)?
        };

        let Some(value_override) = self.value_override.as_mut() else {
            self.cached_value = Some((frame, natural.clone()));
            return Ok(natural);
        };

        let info = FrameInfo {
            start_frame: resolved.start_frame,
            end_frame: resolved.end_frame,
            start_value: &keyframe.start_value,
            end_value: keyframe.end_value_or_start(),
            linear_progress: resolved.linear,
            eased_progress: resolved.eased,
            overall_progress: self.progress,
        };
        value_override.apply(&info, natural)
    }
}

impl OverrideTarget for KeyframeAnimation {
    fn set_override(&mut self, value_override: ValueOverride) {
        debug!(?value_override, "override attached");
        self.value_override = Some(value_override);
        self.cached_value = None;
        self.notifier.notify();
    }

    fn clear_override(&mut self) -> Option<ValueOverride> {
        let previous = self.value_override.take();
        if previous.is_some() {
            self.cached_value = None;
            self.notifier.notify();
        }
        previous
    }
}
