//! Clip table и fractional frame clock

use super::{ClipEnd, Facing, FighterState};
use crate::assets::{DirectionalFrames, FrameId};
use crate::settings::DEFAULT_FRAME_INTERVAL;

/// Frames of one state plus its advance interval.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    frames: DirectionalFrames,
    interval: f32,
    /// Только у атак
    hit_frame: Option<usize>,
}

impl AnimationClip {
    pub fn new(frames: DirectionalFrames, interval: f32, hit_frame: Option<usize>) -> Self {
        let frames = if frames.right.is_empty() && frames.left.is_empty() {
            DirectionalFrames::placeholder()
        } else {
            frames
        };
        let last = frames.frame_count() - 1;
        Self {
            frames,
            interval: interval.max(1.0),
            hit_frame: hit_frame.map(|index| index.min(last)),
        }
    }

    /// Single placeholder frame at the default interval.
    pub fn placeholder() -> Self {
        Self::new(DirectionalFrames::placeholder(), DEFAULT_FRAME_INTERVAL, None)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.frame_count()
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn hit_frame(&self) -> Option<usize> {
        self.hit_frame
    }

    /// Frame for display; out-of-range indices clamp to the last frame.
    pub fn frame(&self, facing: Facing, index: usize) -> FrameId {
        let frames = self.frames.for_facing_or_any(facing);
        debug_assert!(!frames.is_empty(), "clip without frames");
        frames
            .get(index.min(frames.len().saturating_sub(1)))
            .copied()
            .unwrap_or(FrameId::PLACEHOLDER)
    }
}

/// One clip per `FighterState`, indexed by `FighterState::index`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipTable {
    clips: [AnimationClip; FighterState::COUNT],
}

impl Default for ClipTable {
    fn default() -> Self {
        Self {
            clips: std::array::from_fn(|_| AnimationClip::placeholder()),
        }
    }
}

impl ClipTable {
    pub fn new(clips: [AnimationClip; FighterState::COUNT]) -> Self {
        Self { clips }
    }

    pub fn get(&self, state: FighterState) -> &AnimationClip {
        &self.clips[state.index()]
    }
}

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStep {
    /// Interval not reached yet
    Waiting,
    Advanced,
    /// Past the last frame; index is back at 0
    Wrapped,
    /// Hold clip sitting on its last frame
    Held,
}

/// Frame index + accumulator. The remainder carries over between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationClock {
    pub frame_index: usize,
    pub timer: f32,
}

impl AnimationClock {
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.timer = 0.0;
    }

    pub fn tick(&mut self, interval: f32, frame_count: usize, end: ClipEnd) -> ClockStep {
        let last = frame_count.saturating_sub(1);
        self.timer += 1.0;

        let step = if self.timer < interval {
            ClockStep::Waiting
        } else if end == ClipEnd::Hold {
            if self.frame_index < last {
                self.timer = (self.timer - interval).max(0.0);
                self.frame_index += 1;
                ClockStep::Advanced
            } else {
                ClockStep::Held
            }
        } else {
            self.timer = (self.timer - interval).max(0.0);
            self.frame_index += 1;
            if self.frame_index >= frame_count {
                self.frame_index = 0;
                ClockStep::Wrapped
            } else {
                ClockStep::Advanced
            }
        };

        // Смена состояния без reset (run ↔ idle) может оставить индекс за концом клипа
        self.frame_index = self.frame_index.min(last);
        step
    }
}
