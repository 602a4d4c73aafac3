//! Pose interpolation.
//!
//! Turns a clip and a fractional playback frame into one local rotation and
//! translation per bone. The pair of keyframes surrounding the frame is found
//! once on the clip's global keyframe list and then applied to every track.

use glam::{Quat, Vec3};

use crate::clip::SkeletalClip;
use crate::pose::PoseBuffers;

/// Maximum keyframes scanned forward from the cursor before falling back
/// to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last bracket so sequential playback finds the next one in O(1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyframeCursor {
    last_index: usize,
}

impl KeyframeCursor {
    #[inline]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    #[inline]
    pub fn reset(&mut self) {
        self.last_index = 0;
    }
}

/// The keyframe positions surrounding a frame and the blend factor between them.
///
/// `lo == hi` with `t == 0.0` when the frame hits a keyframe exactly or lies
/// outside the keyed range (the nearest keyframe's pose is held).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeBracket {
    pub lo: usize,
    pub hi: usize,
    pub t: f32,
}

impl KeyframeBracket {
    #[inline]
    fn hold(index: usize) -> Self {
        Self {
            lo: index,
            hi: index,
            t: 0.0,
        }
    }

    /// Finds the bracket with a binary search over `keyframes`.
    ///
    /// `keyframes` must be non-empty and strictly increasing.
    #[must_use]
    pub fn find(keyframes: &[u32], frame: f32) -> Self {
        let next = keyframes.partition_point(|&k| k as f32 <= frame);
        Self::from_next(keyframes, next, frame)
    }

    /// Same result as [`find`](Self::find), starting from the cursor's last
    /// position.
    pub fn find_with_cursor(keyframes: &[u32], frame: f32, cursor: &mut KeyframeCursor) -> Self {
        let len = keyframes.len();
        let start = cursor.last_index.min(len - 1);

        let mut next = None;
        if keyframes[start] as f32 <= frame {
            for idx in start..(start + MAX_SCAN_OFFSET + 1).min(len) {
                if idx + 1 == len || frame < keyframes[idx + 1] as f32 {
                    next = Some(idx + 1);
                    break;
                }
            }
        }

        // Loop wrap or large jump
        let next = next.unwrap_or_else(|| keyframes.partition_point(|&k| k as f32 <= frame));

        cursor.last_index = next.saturating_sub(1);
        Self::from_next(keyframes, next, frame)
    }

    /// `next` is the index of the first keyframe strictly after `frame`.
    #[allow(clippy::float_cmp)]
    fn from_next(keyframes: &[u32], next: usize, frame: f32) -> Self {
        if next == 0 {
            return Self::hold(0);
        }

        let lo = next - 1;
        let k0 = keyframes[lo] as f32;
        if next == keyframes.len() || k0 == frame {
            return Self::hold(lo);
        }

        let k1 = keyframes[next] as f32;
        Self {
            lo,
            hi: next,
            t: (frame - k0) / (k1 - k0),
        }
    }
}

/// Fills `pose` with the clip's local bone poses at `frame`.
///
/// Bones whose track is empty get the identity rotation and a zero
/// translation.
///
/// # Panics
///
/// If `frame` is outside `[0, clip.frame_count())`. Callers wrap the frame
/// before sampling; an out-of-range frame means corrupted playback state.
pub fn interpolate(clip: &SkeletalClip, frame: f32, pose: &mut PoseBuffers) -> KeyframeBracket {
    check_frame(clip, frame);
    let bracket = KeyframeBracket::find(clip.keyframes(), frame);
    apply_bracket(clip, bracket, pose);
    bracket
}

/// [`interpolate`] with a cursor carried across ticks.
pub fn interpolate_with_cursor(
    clip: &SkeletalClip,
    frame: f32,
    cursor: &mut KeyframeCursor,
    pose: &mut PoseBuffers,
) -> KeyframeBracket {
    check_frame(clip, frame);
    let bracket = KeyframeBracket::find_with_cursor(clip.keyframes(), frame, cursor);
    apply_bracket(clip, bracket, pose);
    bracket
}

#[inline]
fn check_frame(clip: &SkeletalClip, frame: f32) {
    assert!(
        frame >= 0.0 && frame < clip.frame_count() as f32,
        "SkelAnim \"{}\": frame {frame} outside [0, {})",
        clip.name(),
        clip.frame_count()
    );
}

fn apply_bracket(clip: &SkeletalClip, bracket: KeyframeBracket, pose: &mut PoseBuffers) {
    assert_eq!(clip.tracks().len(), pose.len(), "pose buffers sized for another skeleton");

    let KeyframeBracket { lo, hi, t } = bracket;
    let slots = pose.rotations.iter_mut().zip(pose.translations.iter_mut());

    for (track, (rotation, translation)) in clip.tracks().iter().zip(slots) {
        if !track.is_animated() {
            *rotation = Quat::IDENTITY;
            *translation = Vec3::ZERO;
            continue;
        }

        let left = &track.poses[lo];
        if lo == hi {
            *rotation = left.rotation;
            *translation = left.translation;
        } else {
            let blended = left.blend(&track.poses[hi], t);
            *rotation = blended.rotation;
            *translation = blended.translation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [u32; 4] = [0, 4, 8, 12];

    #[test]
    fn exact_keyframe_has_zero_blend() {
        assert_eq!(KeyframeBracket::find(&KEYS, 8.0), KeyframeBracket { lo: 2, hi: 2, t: 0.0 });
    }

    #[test]
    fn between_keyframes() {
        let b = KeyframeBracket::find(&KEYS, 5.0);
        assert_eq!((b.lo, b.hi), (1, 2));
        assert!((b.t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn outside_keyed_range_holds() {
        assert_eq!(KeyframeBracket::find(&[2, 6], 1.0), KeyframeBracket::hold(0));
        assert_eq!(KeyframeBracket::find(&KEYS, 13.5), KeyframeBracket::hold(3));
    }

    #[test]
    fn single_keyframe_always_holds() {
        for frame in [0.0, 0.5, 3.0] {
            assert_eq!(KeyframeBracket::find(&[0], frame), KeyframeBracket::hold(0));
        }
    }

    #[test]
    fn cursor_matches_binary_search() {
        let mut cursor = KeyframeCursor::default();
        let frames = [0.0, 0.5, 3.9, 4.0, 6.0, 11.0, 12.5, 1.0, 9.5, 0.0];
        for frame in frames {
            let expected = KeyframeBracket::find(&KEYS, frame);
            let got = KeyframeBracket::find_with_cursor(&KEYS, frame, &mut cursor);
            assert_eq!(got, expected, "frame {frame}");
        }
    }
}
