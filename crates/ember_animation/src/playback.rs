/// Playback position of one animated instance.
///
/// Playback always loops. When the advanced frame reaches the clip's frame
/// count the frame snaps back to exactly `0.0` instead of keeping the
/// remainder, so with `frame_count = 10` and `step = 3` the frames run
/// `3, 6, 9, 0, 3, ...`. The last segment of a loop is shortened whenever
/// `step` does not divide `frame_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    frame: f32,
    pub step: f32,
}

impl PlaybackState {
    #[must_use]
    pub fn new(step: f32) -> Self {
        Self { frame: 0.0, step }
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> f32 {
        self.frame
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.frame = 0.0;
    }

    /// Advances by one step and wraps. Returns the new frame, always in
    /// `[0, frame_count)`.
    pub fn advance(&mut self, frame_count: u32) -> f32 {
        self.frame += self.step;
        if self.frame >= frame_count as f32 {
            self.frame = 0.0;
        }
        self.frame
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_to_zero_not_remainder() {
        let mut playback = PlaybackState::new(3.0);
        let frames: Vec<f32> = (0..6).map(|_| playback.advance(10)).collect();
        assert_eq!(frames, vec![3.0, 6.0, 9.0, 0.0, 3.0, 6.0]);
    }

    #[test]
    fn landing_on_frame_count_wraps() {
        let mut playback = PlaybackState::new(5.0);
        assert_eq!(playback.advance(10), 5.0);
        assert_eq!(playback.advance(10), 0.0);
    }
}
