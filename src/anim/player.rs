/// Animation playback
///
/// The player is only a counter. Scheduling belongs to whoever owns the
/// timer: it reads [`PlaybackCursor::period`] and calls `tick` on the same
/// thread that mutates everything else.

use std::time::Duration;

use log::debug;

use super::archive::Frame;

/// One second spread evenly over the frames
const CYCLE_MILLIS: u64 = 1000;

/// Position inside a looping animation; owns the frame buffers
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackCursor {
    frames: Vec<Frame>,
    frame_index: usize,
}

impl PlaybackCursor {
    /// Start playback at frame 0, or `None` when there is nothing to play
    pub fn start(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self { frames, frame_index: 0 })
    }

    /// Advance one frame, wrapping to 0 after the last
    pub fn tick(&mut self) -> usize {
        if !self.frames.is_empty() {
            self.frame_index = (self.frame_index + 1) % self.frames.len();
        }
        self.frame_index
    }

    /// Release the frame buffers. Safe to call more than once.
    pub fn stop(&mut self) {
        self.frames = Vec::new();
        self.frame_index = 0;
    }

    pub fn is_stopped(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Timer interval between ticks (at least 1 ms)
    pub fn period(&self) -> Duration {
        let count = self.frames.len().max(1) as u64;
        Duration::from_millis((CYCLE_MILLIS / count).max(1))
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.frame_index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Holds at most one live cursor
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    cursor: Option<PlaybackCursor>,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop whatever is playing, then start on `frames`
    pub fn start(&mut self, frames: Vec<Frame>) -> Option<&PlaybackCursor> {
        self.stop();
        self.cursor = PlaybackCursor::start(frames);
        if let Some(cursor) = &self.cursor {
            debug!(
                "animation started: {} frames every {:?}",
                cursor.frame_count(),
                cursor.period()
            );
        }
        self.cursor.as_ref()
    }

    /// Advance the live cursor; `None` when nothing is playing
    pub fn tick(&mut self) -> Option<usize> {
        self.cursor.as_mut().map(PlaybackCursor::tick)
    }

    pub fn stop(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            cursor.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<&PlaybackCursor> {
        self.cursor.as_ref()
    }
}
