// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use tracing::debug;

use crate::audio::SampleBuffer;

/// Samples at or below this magnitude count as silence.
pub const SILENCE_THRESHOLD: f32 = f32::EPSILON * 2.0;

/// Index one past the last frame where any channel is louder than the silence threshold.
pub fn audible_frame_count(buffer: &SampleBuffer) -> usize {
    (0..buffer.frame_count())
        .rev()
        .find(|&frame| {
            buffer
                .channels()
                .iter()
                .any(|channel| channel[frame].abs() > SILENCE_THRESHOLD)
        })
        .map_or(0, |frame| frame + 1)
}

/// Drops trailing silence from every channel. Frames before the cut are untouched.
pub fn trim_trailing_silence(mut buffer: SampleBuffer) -> SampleBuffer {
    let original = buffer.frame_count();
    let audible = audible_frame_count(&buffer);
    if audible != original {
        debug!(
            original_frames = original,
            trimmed_frames = audible,
            "Trimmed trailing silence"
        );
        buffer.set_frame_count(audible);
    }
    buffer
}
