use animatable_data::model::Clip;
use serde::{Deserialize, Serialize};

/// The frame range a property plays over. Maps the normalized progress an
/// animation clock hands out onto frame numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(alias = "ip")]
    pub start_frame: f32,
    #[serde(alias = "op")]
    pub end_frame: f32,
    #[serde(alias = "fr", default = "default_frame_rate")]
    pub frame_rate: f32,
}

fn default_frame_rate() -> f32 {
    60.0
}

impl Timeline {
    pub fn new(start_frame: f32, end_frame: f32, frame_rate: f32) -> Self {
        Self {
            start_frame,
            end_frame,
            frame_rate,
        }
    }

    pub fn duration_frames(&self) -> f32 {
        (self.end_frame - self.start_frame).max(0.0)
    }

    pub fn frame_at(&self, progress: f32) -> f32 {
        self.start_frame + progress.clamp(0.0, 1.0) * self.duration_frames()
    }

    pub fn progress_at(&self, frame: f32) -> f32 {
        let duration = self.duration_frames();
        if duration <= 0.0 {
            return 0.0;
        }
        ((frame - self.start_frame) / duration).clamp(0.0, 1.0)
    }

    pub fn frame_at_time(&self, seconds: f32) -> f32 {
        self.start_frame + seconds * self.frame_rate
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(0.0, 60.0, default_frame_rate())
    }
}

impl From<&Clip> for Timeline {
    fn from(clip: &Clip) -> Self {
        Self::new(clip.ip, clip.op, clip.fr)
    }
}
